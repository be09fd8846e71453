//! Tests for board evaluation.

use matchplay::rules::LINES;
use matchplay::{Board, Mark, Outcome, Square};

/// Every one of the 3^9 assignments of Empty/X/O to the nine squares.
fn all_boards() -> impl Iterator<Item = Board> {
    (0..3u32.pow(9)).map(|mut n| {
        let mut squares = [Square::Empty; 9];
        for square in squares.iter_mut() {
            *square = match n % 3 {
                0 => Square::Empty,
                1 => Square::Occupied(Mark::X),
                _ => Square::Occupied(Mark::O),
            };
            n /= 3;
        }
        Board::from_squares(squares)
    })
}

fn parse(cells: &str) -> Board {
    let mut squares = [Square::Empty; 9];
    for (i, c) in cells.chars().filter(|c| !c.is_whitespace()).enumerate() {
        squares[i] = match c {
            'X' => Square::Occupied(Mark::X),
            'O' => Square::Occupied(Mark::O),
            _ => Square::Empty,
        };
    }
    Board::from_squares(squares)
}

fn has_complete_line(board: &Board) -> bool {
    LINES.iter().any(|line| {
        let [a, b, c] = line.cells();
        let sq = board.get(a);
        sq != Some(Square::Empty) && sq == board.get(b) && sq == board.get(c)
    })
}

#[test]
fn test_row_win_example() {
    let board = parse("XXX OO_ ___");
    assert_eq!(
        board.evaluate(),
        Outcome::Win {
            mark: Mark::X,
            line: LINES[0],
        }
    );
    assert_eq!(LINES[0].cells(), [0, 1, 2]);
}

#[test]
fn test_draw_example() {
    let board = parse("XOX XOO OXX");
    assert_eq!(board.evaluate(), Outcome::Draw);
}

#[test]
fn test_empty_board_undecided() {
    assert_eq!(Board::new().evaluate(), Outcome::Undecided);
}

#[test]
fn test_column_and_diagonal_wins() {
    let board = parse("_O_ _O_ XOX");
    assert_eq!(board.evaluate().winner(), Some(Mark::O));

    let board = parse("X_O _XO __X");
    assert_eq!(
        board.evaluate(),
        Outcome::Win {
            mark: Mark::X,
            line: LINES[6],
        }
    );
}

#[test]
fn test_evaluation_symmetric_under_relabeling() {
    for board in all_boards() {
        let swapped = board.swap_marks();
        match (board.evaluate(), swapped.evaluate()) {
            (Outcome::Win { mark, line }, Outcome::Win { mark: m2, line: l2 }) => {
                assert_eq!(m2, mark.opponent(), "winner not swapped for {:?}", board);
                assert_eq!(line, l2, "line changed for {:?}", board);
            }
            (a, b) => assert_eq!(a, b, "classification changed for {:?}", board),
        }
    }
}

#[test]
fn test_draw_iff_full_without_line() {
    for board in all_boards() {
        let is_draw = board.evaluate() == Outcome::Draw;
        assert_eq!(
            is_draw,
            board.is_full() && !has_complete_line(&board),
            "draw classification wrong for {:?}",
            board
        );
    }
}

#[test]
fn test_reported_line_is_first_complete_line() {
    for board in all_boards() {
        if let Outcome::Win { mark, line } = board.evaluate() {
            let first = LINES
                .iter()
                .position(|l| {
                    let [a, b, c] = l.cells();
                    let sq = board.get(a);
                    sq != Some(Square::Empty) && sq == board.get(b) && sq == board.get(c)
                })
                .expect("win reported without a complete line");
            assert_eq!(line, LINES[first]);
            assert_eq!(board.get(line.cells()[0]), Some(Square::Occupied(mark)));
        }
    }
}
