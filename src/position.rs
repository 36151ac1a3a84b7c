//! Draughts position representation and move execution.
//!
//! This module provides the core board state for English draughts:
//! - Square contents and side classification
//! - Board state using a 1D mailbox array with border padding
//! - Move application, including captures and crowning
//! - Conversion between internal addresses and 1-32 square notation
//!
//! Black always starts on the high addresses (32-44) and moves towards the
//! low ones; White starts on 10-22 and moves the other way.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::*;
use crate::movegen::Move;

/// A square on the board, represented as an index into the 1D board array.
pub type Point = usize;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Moves first, starts at the bottom of the board.
    Black,
    /// Starts at the top of the board.
    White,
}

impl Side {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Index for per-side arrays (Black = 0, White = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }

    /// Whether a man of this side crowns on `pt`.
    #[inline]
    pub fn is_crowning_square(self, pt: Point) -> bool {
        match self {
            Side::Black => pt < 14,
            Side::White => pt > 40,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

/// Error returned when a side name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown side '{0}' (expected black or white)")]
pub struct ParseSideError(String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Side::Black),
            "white" | "w" => Ok(Side::White),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    Empty,
    /// Padding outside the playing area.
    Border,
    BlackMan,
    WhiteMan,
    BlackKing,
    WhiteKing,
}

impl Square {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Square::Empty
    }

    #[inline]
    pub fn is_border(self) -> bool {
        self == Square::Border
    }

    #[inline]
    pub fn is_man(self) -> bool {
        matches!(self, Square::BlackMan | Square::WhiteMan)
    }

    #[inline]
    pub fn is_king(self) -> bool {
        matches!(self, Square::BlackKing | Square::WhiteKing)
    }

    /// The side owning the piece on this square, if any.
    #[inline]
    pub fn side(self) -> Option<Side> {
        match self {
            Square::BlackMan | Square::BlackKing => Some(Side::Black),
            Square::WhiteMan | Square::WhiteKing => Some(Side::White),
            Square::Empty | Square::Border => None,
        }
    }

    /// Check if the square holds a piece of the given side.
    #[inline]
    pub fn belongs_to(self, side: Side) -> bool {
        self.side() == Some(side)
    }

    /// The king of the same side for a man; anything else is returned unchanged.
    #[inline]
    pub fn crowned(self) -> Square {
        match self {
            Square::BlackMan => Square::BlackKing,
            Square::WhiteMan => Square::WhiteKing,
            other => other,
        }
    }

    /// Single-character symbol used by the text renderer.
    pub fn symbol(self) -> char {
        match self {
            Square::Empty => '.',
            Square::Border => ' ',
            Square::BlackMan => 'b',
            Square::WhiteMan => 'w',
            Square::BlackKing => 'B',
            Square::WhiteKing => 'W',
        }
    }
}

/// What changed on the board when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEvent {
    pub origin: Point,
    pub destination: Point,
    /// Addresses of the pieces removed, in capture order.
    pub captured: Vec<Point>,
    /// True if a man was crowned on `destination`.
    pub promoted: bool,
}

/// A draughts position (board state only; the side to move is tracked by the caller).
///
/// The board is a fixed-size array, so copies are cheap and fully independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Square; BOARDSIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a board in the standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup();
        board
    }

    /// Create a board with borders in place and every playable square empty.
    pub fn empty() -> Self {
        let mut squares = [Square::Border; BOARDSIZE];
        for (pt, sq) in squares.iter_mut().enumerate() {
            if is_playable(pt) {
                *sq = Square::Empty;
            }
        }
        Board { squares }
    }

    /// Reset to the starting position: 12 White men on 10-22, 12 Black men on 32-44.
    pub fn setup(&mut self) {
        *self = Self::empty();
        for pt in playable_points() {
            if pt <= 22 {
                self.squares[pt] = Square::WhiteMan;
            } else if pt >= 32 {
                self.squares[pt] = Square::BlackMan;
            }
        }
    }

    #[inline]
    pub fn square_at(&self, pt: Point) -> Square {
        self.squares[pt]
    }

    #[inline]
    pub fn belongs_to(&self, pt: Point, side: Side) -> bool {
        self.squares[pt].belongs_to(side)
    }

    /// True if `pt` holds no piece and is not a border cell.
    #[inline]
    pub fn is_empty(&self, pt: Point) -> bool {
        self.squares[pt].is_empty()
    }

    /// Put a piece (or `Square::Empty`) on a playable square.
    ///
    /// Intended for building positions; normal play goes through [`Board::apply_move`].
    pub fn place(&mut self, pt: Point, sq: Square) {
        debug_assert!(is_playable(pt), "cannot place on border cell {pt}");
        debug_assert!(!sq.is_border(), "cannot place a border cell");
        self.squares[pt] = sq;
    }

    /// Iterate over the playable squares holding pieces of `side`.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Point> + '_ {
        playable_points().filter(move |&pt| self.belongs_to(pt, side))
    }

    /// Apply a move without checking legality.
    ///
    /// The origin and every captured midpoint become empty and the piece ends on
    /// the final square, crowned if it is a man reaching the far back rank.
    pub fn apply_move(&mut self, mv: &Move) -> MoveEvent {
        let origin = mv.origin();
        let destination = mv.destination();
        let piece = self.squares[origin];
        debug_assert!(piece.side().is_some(), "no piece on origin {origin}");

        self.squares[origin] = Square::Empty;

        let captured: Vec<Point> = if mv.is_capture() {
            mv.captured().collect()
        } else {
            Vec::new()
        };
        for &pt in &captured {
            self.squares[pt] = Square::Empty;
        }

        let promoted = piece.is_man()
            && piece
                .side()
                .is_some_and(|side| side.is_crowning_square(destination));
        self.squares[destination] = if promoted { piece.crowned() } else { piece };

        MoveEvent {
            origin,
            destination,
            captured,
            promoted,
        }
    }

    /// Count (men, kings) for a side.
    pub fn material(&self, side: Side) -> (usize, usize) {
        self.pieces(side).fold((0, 0), |(men, kings), pt| {
            if self.squares[pt].is_king() {
                (men, kings + 1)
            } else {
                (men + 1, kings)
            }
        })
    }
}

/// Render the board as text, White at the top.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "+---+---+---+---+---+---+---+---+";
        writeln!(f, "              WHITE")?;
        writeln!(f, "{RULE}")?;
        for row in 0..8 {
            let start = row_start(row);
            write!(f, "|")?;
            for col in 0..8 {
                // Even rows begin with a light square, odd rows with a dark one.
                if (row + col) % 2 == 1 {
                    let pt = start + col / 2;
                    write!(f, " {} |", self.squares[pt].symbol())?;
                } else {
                    write!(f, "   |")?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{RULE}")?;
        }
        writeln!(f, "              BLACK")
    }
}

/// First internal address of a board row (row 0 is White's back rank).
#[inline]
fn row_start(row: usize) -> Point {
    BOARD_IMIN + (row / 2) * 9 + (row % 2) * 4
}

/// Check if an address is one of the 32 playable squares.
#[inline]
pub fn is_playable(pt: Point) -> bool {
    (BOARD_IMIN..=BOARD_IMAX).contains(&pt) && !INNER_BORDER.contains(&pt)
}

/// Iterate over all playable addresses in ascending order.
pub fn playable_points() -> impl Iterator<Item = Point> {
    (BOARD_IMIN..=BOARD_IMAX).filter(|&pt| is_playable(pt))
}

/// Convert an internal address to standard 1-32 notation.
///
/// Returns 0 for an address that is not playable.
pub fn square_to_notation(pt: Point) -> usize {
    NOTATION_TO_ADDRESS
        .iter()
        .position(|&addr| addr == pt)
        .map_or(0, |i| i + 1)
}

/// Convert a 1-32 square number to an internal address.
///
/// Returns `None` for numbers outside 1-32.
pub fn notation_to_square(n: usize) -> Option<Point> {
    n.checked_sub(1)
        .and_then(|i| NOTATION_TO_ADDRESS.get(i))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_counts() {
        let board = Board::new();
        assert_eq!(board.material(Side::Black), (MEN_PER_SIDE, 0));
        assert_eq!(board.material(Side::White), (MEN_PER_SIDE, 0));
        for pt in 23..=31 {
            if is_playable(pt) {
                assert!(board.is_empty(pt), "{pt} should be empty");
            }
        }
    }

    #[test]
    fn test_borders() {
        let board = Board::new();
        assert_eq!(playable_points().count(), PLAYABLE_SQUARES);
        for pt in 0..BOARDSIZE {
            assert_eq!(board.square_at(pt).is_border(), !is_playable(pt));
        }
    }

    #[test]
    fn test_notation_roundtrip() {
        for n in 1..=32 {
            let pt = notation_to_square(n).unwrap();
            assert!(is_playable(pt));
            assert_eq!(square_to_notation(pt), n);
        }
        assert_eq!(notation_to_square(0), None);
        assert_eq!(notation_to_square(33), None);
    }

    #[test]
    fn test_notation_corners() {
        assert_eq!(square_to_notation(44), 1);
        assert_eq!(square_to_notation(41), 4);
        assert_eq!(square_to_notation(13), 29);
        assert_eq!(square_to_notation(10), 32);
        assert_eq!(square_to_notation(27), 0);
        assert_eq!(square_to_notation(BOARDSIZE - 1), 0);
    }

    #[test]
    fn test_simple_step() {
        let mut board = Board::new();
        let event = board.apply_move(&Move::new(vec![33, 29]));
        assert!(board.is_empty(33));
        assert_eq!(board.square_at(29), Square::BlackMan);
        assert!(event.captured.is_empty());
        assert!(!event.promoted);
    }

    #[test]
    fn test_crowning() {
        let mut board = Board::empty();
        board.place(15, Square::BlackMan);
        let event = board.apply_move(&Move::new(vec![15, 11]));
        assert!(event.promoted);
        assert_eq!(board.square_at(11), Square::BlackKing);

        // A king reaching the back rank is unchanged.
        let mut board = Board::empty();
        board.place(16, Square::WhiteKing);
        let event = board.apply_move(&Move::new(vec![16, 12]));
        assert!(!event.promoted);
        assert_eq!(board.square_at(12), Square::WhiteKing);
    }

    #[test]
    fn test_copy_is_independent() {
        let board = Board::new();
        let mut copy = board;
        copy.apply_move(&Move::new(vec![33, 29]));
        assert_eq!(board.square_at(33), Square::BlackMan);
        assert_ne!(board, copy);
    }

    #[test]
    fn test_side_parse() {
        assert_eq!("Black".parse::<Side>(), Ok(Side::Black));
        assert_eq!("w".parse::<Side>(), Ok(Side::White));
        assert!("red".parse::<Side>().is_err());
    }

    #[test]
    fn test_render() {
        let text = Board::new().to_string();
        assert!(text.starts_with("              WHITE"));
        assert!(text.trim_end().ends_with("BLACK"));
        assert_eq!(text.matches('b').count(), 12);
        assert_eq!(text.matches('w').count(), 12);
    }
}
