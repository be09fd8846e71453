//! Board value type for tic-tac-toe.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::rules::{self, Line};

/// Mark placed on the board.
///
/// `X` belongs to the player in slot 0, `O` to the player in slot 1.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Mark of slot 0.
    X,
    /// Mark of slot 1.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<Mark>", into = "Option<Mark>")]
pub enum Square {
    /// Nobody has played here.
    Empty,
    /// Square holds a mark.
    Occupied(Mark),
}

impl From<Option<Mark>> for Square {
    fn from(value: Option<Mark>) -> Self {
        value.map_or(Square::Empty, Square::Occupied)
    }
}

impl From<Square> for Option<Mark> {
    fn from(value: Square) -> Self {
        match value {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No triple is complete and at least one square is empty.
    Undecided,
    /// A triple holds three equal marks.
    Win {
        /// Mark that completed the line.
        mark: Mark,
        /// First completed line in row, column, diagonal order.
        line: Line,
    },
    /// Every square is occupied and no triple is complete.
    Draw,
}

impl Outcome {
    /// Returns the winning mark, if any.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Win { mark, .. } => Some(*mark),
            Outcome::Undecided | Outcome::Draw => None,
        }
    }
}

/// Error placing a mark on the board.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Index is outside 0..=8.
    #[display("Square index {} is out of range (must be 0-8)", _0)]
    InvalidIndex(usize),
}

impl std::error::Error for BoardError {}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Number of squares on the board.
    pub const SIZE: usize = 9;

    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from squares in row-major order.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Checks if the square at `index` exists and is empty.
    pub fn is_vacant(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Checks if every square is occupied.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Returns a copy of the board with `index` set to `mark`.
    ///
    /// Occupancy is not checked here; that is match policy.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidIndex`] if `index` is not in 0..=8.
    #[instrument(skip(self))]
    pub fn place(&self, index: usize, mark: Mark) -> Result<Board, BoardError> {
        if index >= Self::SIZE {
            return Err(BoardError::InvalidIndex(index));
        }
        let mut next = *self;
        next.squares[index] = Square::Occupied(mark);
        Ok(next)
    }

    /// Evaluates the position.
    ///
    /// All eight triples are scanned in fixed order and the first complete
    /// one wins, so the result is deterministic even for positions that
    /// cannot arise from legal play.
    pub fn evaluate(&self) -> Outcome {
        if let Some((mark, line)) = rules::winning_line(self) {
            Outcome::Win { mark, line }
        } else if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::Undecided
        }
    }

    /// Returns the board with every X swapped for O and vice versa.
    pub fn swap_marks(&self) -> Board {
        let mut next = *self;
        for square in next.squares.iter_mut() {
            if let Square::Occupied(mark) = square {
                *mark = mark.opponent();
            }
        }
        next
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => pos.to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_returns_new_board() {
        let board = Board::new();
        let next = board.place(4, Mark::X).expect("Place failed");
        assert_eq!(next.get(4), Some(Square::Occupied(Mark::X)));
        assert!(board.is_vacant(4));
    }

    #[test]
    fn test_place_out_of_range() {
        let board = Board::new();
        assert_eq!(board.place(9, Mark::O), Err(BoardError::InvalidIndex(9)));
    }

    #[test]
    fn test_place_does_not_check_occupancy() {
        let board = Board::new().place(0, Mark::X).expect("Place failed");
        let next = board.place(0, Mark::O).expect("Place failed");
        assert_eq!(next.get(0), Some(Square::Occupied(Mark::O)));
    }

    #[test]
    fn test_squares_serialize_as_nullable_marks() {
        let board = Board::new().place(2, Mark::O).expect("Place failed");
        let json = serde_json::to_string(&board).expect("Serialize failed");
        assert_eq!(json, r#"[null,null,"O",null,null,null,null,null,null]"#);
        let back: Board = serde_json::from_str(&json).expect("Deserialize failed");
        assert_eq!(back, board);
    }

    #[test]
    fn test_display() {
        let board = Board::new().place(0, Mark::X).expect("Place failed");
        assert_eq!(board.display(), "X|1|2\n-+-+-\n3|4|5\n-+-+-\n6|7|8");
    }
}
