//! Win detection logic for tic-tac-toe.

use crate::{Board, Mark, Square};
use tracing::instrument;

/// Three square indices that win when they hold the same mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line([usize; 3]);

impl Line {
    /// Returns the square indices of this line.
    pub fn cells(&self) -> [usize; 3] {
        self.0
    }
}

/// All winning lines: rows, then columns, then diagonals.
pub const LINES: [Line; 8] = [
    // Rows
    Line([0, 1, 2]),
    Line([3, 4, 5]),
    Line([6, 7, 8]),
    // Columns
    Line([0, 3, 6]),
    Line([1, 4, 7]),
    Line([2, 5, 8]),
    // Diagonals
    Line([0, 4, 8]),
    Line([2, 4, 6]),
];

/// Returns the first complete line and its mark, scanning [`LINES`] in order.
#[instrument]
pub fn winning_line(board: &Board) -> Option<(Mark, Line)> {
    LINES.into_iter().find_map(|line| {
        let [a, b, c] = line.cells();
        match board.get(a) {
            Some(Square::Occupied(mark))
                if board.get(b) == Some(Square::Occupied(mark))
                    && board.get(c) == Some(Square::Occupied(mark)) =>
            {
                Some((mark, line))
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(marks: &[(usize, Mark)]) -> Board {
        marks.iter().fold(Board::new(), |board, &(i, mark)| {
            board.place(i, mark).expect("Place failed")
        })
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(winning_line(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(&[(0, Mark::X), (1, Mark::X), (2, Mark::X)]);
        assert_eq!(winning_line(&board), Some((Mark::X, LINES[0])));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(&[(2, Mark::O), (4, Mark::O), (6, Mark::O)]);
        assert_eq!(winning_line(&board), Some((Mark::O, LINES[7])));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(&[(0, Mark::X), (1, Mark::X), (2, Mark::O)]);
        assert_eq!(winning_line(&board), None);
    }

    #[test]
    fn test_first_line_reported_when_several_complete() {
        // X holds row 0 and column 0; O holds row 2 in an impossible position.
        let board = board_with(&[
            (0, Mark::X),
            (1, Mark::X),
            (2, Mark::X),
            (3, Mark::X),
            (6, Mark::X),
            (7, Mark::O),
            (8, Mark::O),
        ]);
        assert_eq!(winning_line(&board), Some((Mark::X, LINES[0])));

        let board = board_with(&[
            (3, Mark::O),
            (4, Mark::O),
            (5, Mark::O),
            (0, Mark::X),
            (1, Mark::X),
            (2, Mark::X),
        ]);
        assert_eq!(winning_line(&board), Some((Mark::X, LINES[0])));
    }
}
