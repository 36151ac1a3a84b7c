//! Legal move generation.
//!
//! Captures are compulsory: if any piece of the side to move can jump, only
//! capture sequences are legal. A capture sequence must be continued while the
//! jumping piece can keep capturing, except that a man which crowns ends its
//! turn immediately.
//!
//! There is no rule forcing the longest sequence overall; every maximal
//! sequence is returned, including a short one that branches off early.

use std::fmt;

use thiserror::Error;

use crate::constants::{
    BLACK_FORWARD, BOARD_IMAX, BOARD_IMIN, KING_DIRECTIONS, MAX_STEP, WHITE_FORWARD,
};
use crate::position::{notation_to_square, square_to_notation, Board, Point, Side, Square};

/// A move: the sequence of squares visited by the moving piece.
///
/// A two-square sequence with a diagonal offset is a simple step; anything
/// longer, or a two-square sequence spanning a jump, is a capture. The captured
/// piece between two consecutive squares sits at their midpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    squares: Vec<Point>,
}

impl Move {
    /// Create a move from its visited squares (at least two).
    pub fn new(squares: Vec<Point>) -> Self {
        debug_assert!(squares.len() >= 2, "a move needs an origin and a destination");
        Move { squares }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.squares[0]
    }

    /// The square the piece finally rests on.
    #[inline]
    pub fn destination(&self) -> Point {
        self.squares[self.squares.len() - 1]
    }

    #[inline]
    pub fn squares(&self) -> &[Point] {
        &self.squares
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// True if the move visits no squares.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Check if the move contains one or more jumps.
    pub fn is_capture(&self) -> bool {
        self.squares.len() > 2 || self.origin().abs_diff(self.destination()) > MAX_STEP
    }

    /// Addresses of the captured pieces, one per jump.
    pub fn captured(&self) -> impl Iterator<Item = Point> + '_ {
        self.squares.windows(2).map(|pair| (pair[0] + pair[1]) / 2)
    }
}

/// Formats as `11-15` for a step and `9x18x25` for a capture (1-32 notation).
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { "x" } else { "-" };
        for (i, &pt) in self.squares.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", square_to_notation(pt))?;
        }
        Ok(())
    }
}

/// Error returned when a move cannot be matched to a legal move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    #[error("malformed move '{0}' (expected e.g. 11-15 or 9x18x27)")]
    Malformed(String),
    #[error("no such square: {0}")]
    BadSquare(usize),
    #[error("illegal move: {0}")]
    Illegal(String),
    #[error("ambiguous move '{0}', give every square of the capture")]
    Ambiguous(String),
}

/// Generate all legal moves for `side`.
///
/// An empty result means `side` has lost.
pub fn generate(board: &Board, side: Side) -> Vec<Move> {
    let jumps = generate_jumps(board, side);
    if !jumps.is_empty() {
        return jumps;
    }
    generate_steps(board, side)
}

/// Parse move text in 1-32 notation and resolve it against the legal moves.
///
/// `from-to` (or `fromxto`) selects the unique legal move with that origin and
/// destination; a longer list must match a capture square by square.
pub fn parse_move(board: &Board, side: Side, text: &str) -> Result<Move, ParseMoveError> {
    let text = text.trim();
    let mut squares = Vec::new();
    for part in text.split(['-', 'x', 'X']) {
        let n: usize = part
            .trim()
            .parse()
            .map_err(|_| ParseMoveError::Malformed(text.to_string()))?;
        squares.push(notation_to_square(n).ok_or(ParseMoveError::BadSquare(n))?);
    }
    if squares.len() < 2 {
        return Err(ParseMoveError::Malformed(text.to_string()));
    }

    let legal = generate(board, side);
    let mut candidates: Vec<Move> = if squares.len() == 2 {
        legal
            .into_iter()
            .filter(|m| m.origin() == squares[0] && m.destination() == squares[1])
            .collect()
    } else {
        legal.into_iter().filter(|m| m.squares() == squares.as_slice()).collect()
    };

    match candidates.len() {
        0 => Err(ParseMoveError::Illegal(text.to_string())),
        1 => Ok(candidates.remove(0)),
        _ => Err(ParseMoveError::Ambiguous(text.to_string())),
    }
}

/// Directions a piece may move in.
fn directions(sq: Square) -> &'static [isize] {
    match sq {
        Square::BlackMan => &BLACK_FORWARD,
        Square::WhiteMan => &WHITE_FORWARD,
        Square::BlackKing | Square::WhiteKing => &KING_DIRECTIONS,
        Square::Empty | Square::Border => &[],
    }
}

#[inline]
fn offset(pt: Point, d: isize) -> Point {
    (pt as isize + d) as Point
}

/// Non-capturing steps for every piece of `side`.
fn generate_steps(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::new();
    for pt in BOARD_IMIN..=BOARD_IMAX {
        if !board.belongs_to(pt, side) {
            continue;
        }
        for &d in directions(board.square_at(pt)) {
            let to = offset(pt, d);
            if board.is_empty(to) {
                moves.push(Move::new(vec![pt, to]));
            }
        }
    }
    moves
}

/// Maximal capture sequences for every piece of `side`.
fn generate_jumps(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::new();
    for pt in BOARD_IMIN..=BOARD_IMAX {
        if board.belongs_to(pt, side) {
            let mut path = vec![pt];
            extend_jumps(board, &mut path, &mut moves);
        }
    }
    moves
}

/// Extend the capture sequence in `path` by every available jump.
///
/// `board` is the hypothetical position with `path` already played. Each jump is
/// tried on a copy; a sequence is only recorded once it cannot be extended or
/// the man has just crowned.
fn extend_jumps(board: &Board, path: &mut Vec<Point>, out: &mut Vec<Move>) {
    let from = path[path.len() - 1];
    let piece = board.square_at(from);
    let Some(side) = piece.side() else {
        return;
    };
    let opponent = side.opponent();

    for &d in directions(piece) {
        let over = offset(from, d);
        let to = offset(over, d);
        if !board.belongs_to(over, opponent) || !board.is_empty(to) {
            continue;
        }

        let mut next = *board;
        let event = next.apply_move(&Move::new(vec![from, to]));
        path.push(to);

        if event.promoted {
            out.push(Move::new(path.clone()));
        } else {
            let before = out.len();
            extend_jumps(&next, path, out);
            if out.len() == before {
                out.push(Move::new(path.clone()));
            }
        }

        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(pieces: &[(Point, Square)]) -> Board {
        let mut board = Board::empty();
        for &(pt, sq) in pieces {
            board.place(pt, sq);
        }
        board
    }

    #[test]
    fn test_opening_moves() {
        let board = Board::new();
        assert_eq!(generate(&board, Side::Black).len(), 7);
        assert_eq!(generate(&board, Side::White).len(), 7);
    }

    #[test]
    fn test_man_moves_forward_only() {
        let board = board_with(&[(30, Square::BlackMan)]);
        let moves = generate(&board, Side::Black);
        let dests: Vec<Point> = moves.iter().map(Move::destination).collect();
        assert_eq!(dests, vec![26, 25]);
    }

    #[test]
    fn test_king_moves_all_directions() {
        let board = board_with(&[(30, Square::WhiteKing)]);
        assert_eq!(generate(&board, Side::White).len(), 4);
    }

    #[test]
    fn test_edge_step_hits_border() {
        // Square 12 (address 32) sits on the left edge; one diagonal leads to border 27.
        let board = board_with(&[(32, Square::BlackMan)]);
        let moves = generate(&board, Side::Black);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].destination(), 28);
    }

    #[test]
    fn test_capture_is_forced() {
        let board = board_with(&[
            (30, Square::BlackMan),
            (26, Square::WhiteMan),
            (40, Square::BlackMan),
        ]);
        let moves = generate(&board, Side::Black);
        assert_eq!(moves, vec![Move::new(vec![30, 22])]);
        assert!(moves[0].is_capture());
        assert_eq!(moves[0].captured().collect::<Vec<_>>(), vec![26]);
    }

    #[test]
    fn test_double_jump_must_continue() {
        let board = board_with(&[
            (39, Square::BlackMan),
            (35, Square::WhiteMan),
            (26, Square::WhiteMan),
        ]);
        let moves = generate(&board, Side::Black);
        assert_eq!(moves, vec![Move::new(vec![39, 31, 21])]);
    }

    #[test]
    fn test_crowning_ends_capture() {
        // Black man jumps 20 -> 12 and crowns; as a king it could go on over 17.
        let board = board_with(&[
            (20, Square::BlackMan),
            (16, Square::WhiteMan),
            (17, Square::WhiteMan),
        ]);
        let moves = generate(&board, Side::Black);
        assert_eq!(moves, vec![Move::new(vec![20, 12])]);

        // The same jump by a king continues.
        let board = board_with(&[
            (20, Square::BlackKing),
            (16, Square::WhiteMan),
            (17, Square::WhiteMan),
        ]);
        let moves = generate(&board, Side::Black);
        assert_eq!(moves, vec![Move::new(vec![20, 12, 22])]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::new(vec![33, 29]).to_string(), "11-15");
        assert_eq!(Move::new(vec![39, 31, 21]).to_string(), "6x13x22");
    }

    #[test]
    fn test_parse_move() {
        let board = Board::new();
        let mv = parse_move(&board, Side::Black, "11-15").unwrap();
        assert_eq!(mv, Move::new(vec![33, 29]));
        assert_eq!(
            parse_move(&board, Side::Black, "11-14"),
            Err(ParseMoveError::Illegal("11-14".to_string()))
        );
        assert_eq!(
            parse_move(&board, Side::Black, "40-44"),
            Err(ParseMoveError::BadSquare(40))
        );
        assert!(matches!(
            parse_move(&board, Side::Black, "eleven"),
            Err(ParseMoveError::Malformed(_))
        ));
    }
}
