//! Draw detection logic for tic-tac-toe.

use crate::{Board, Square};
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner indicates a draw.
#[instrument]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::win::winning_line;
    use super::*;
    use crate::Mark;

    fn board(cells: &str) -> Board {
        let mut squares = [Square::Empty; 9];
        for (i, c) in cells.chars().enumerate() {
            squares[i] = match c {
                'X' => Square::Occupied(Mark::X),
                'O' => Square::Occupied(Mark::O),
                _ => Square::Empty,
            };
        }
        Board::from_squares(squares)
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        assert!(!is_full(&board("XO_______")));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let b = board("XOXXOOOXX");
        assert!(is_full(&b));
        assert_eq!(winning_line(&b), None);
    }

    #[test]
    fn test_full_board_with_line_is_not_draw() {
        let b = board("XXXOOXOXO");
        assert!(is_full(&b));
        assert!(winning_line(&b).is_some());
    }
}
