//! Constants for board geometry, evaluation weights, and search limits.
//!
//! The board uses a 1D "mailbox" array padded with border cells so that
//! diagonal steps never need bounds checks: stepping off the playing area
//! always lands on a border cell.
//!
//! ```text
//!        White                      Internal addresses
//!    32  31  30  29               10  11  12  13
//!  28  27  26  25               14  15  16  17
//!    24  23  22  21               19  20  21  22
//!  20  19  18  17               23  24  25  26
//!    16  15  14  13               28  29  30  31
//!  12  11  10   9               32  33  34  35
//!     8   7   6   5               37  38  39  40
//!   4   3   2   1               41  42  43  44
//!        Black
//! ```
//!
//! Addresses 18, 27 and 36 sit between rows and are permanently border.

// =============================================================================
// Board Geometry
// =============================================================================

/// Total board array size including all padding.
pub const BOARDSIZE: usize = 55;

/// First playable board index (skips top padding).
pub const BOARD_IMIN: usize = 10;

/// Last playable board index (before bottom padding).
pub const BOARD_IMAX: usize = 44;

/// Border cells inside the playable index range.
pub const INNER_BORDER: [usize; 3] = [18, 27, 36];

/// Number of playable squares.
pub const PLAYABLE_SQUARES: usize = 32;

/// Men per side in the starting position.
pub const MEN_PER_SIDE: usize = 12;

/// Internal address of each square in standard 1-32 notation (index `n - 1`).
pub const NOTATION_TO_ADDRESS: [usize; PLAYABLE_SQUARES] = [
    44, 43, 42, 41, 40, 39, 38, 37, // 1-8
    35, 34, 33, 32, 31, 30, 29, 28, // 9-16
    26, 25, 24, 23, 22, 21, 20, 19, // 17-24
    17, 16, 15, 14, 13, 12, 11, 10, // 25-32
];

// =============================================================================
// Direction Offsets
// =============================================================================

/// Forward diagonals for a Black man (towards White's back rank).
pub const BLACK_FORWARD: [isize; 2] = [-4, -5];

/// Forward diagonals for a White man (towards Black's back rank).
pub const WHITE_FORWARD: [isize; 2] = [4, 5];

/// All four diagonals, used by kings.
pub const KING_DIRECTIONS: [isize; 4] = [4, 5, -4, -5];

/// Largest single-step offset. Two addresses further apart than this are a jump.
pub const MAX_STEP: usize = 5;

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Material value of a man.
pub const MAN_WORTH: i32 = 100;

/// Material value of a king.
pub const KING_WORTH: i32 = 130;

/// Bonus for keeping the two guarding back-rank men at home.
pub const BACK_RANK_WORTH: i32 = 10;

/// Scale of the material-ratio term added to the raw material difference.
pub const MATERIAL_RATIO_SCALE: i32 = 200;

// =============================================================================
// Search Parameters
// =============================================================================

/// Score bound; a side with no legal moves scores close to `-INFINITY`.
pub const INFINITY: i32 = 10_000;

/// Hard cap on plies from the root, limiting single-reply extensions.
pub const MAX_DEPTH: u32 = 40;

/// Default search depth (level) in plies.
pub const DEFAULT_DEPTH: u32 = 5;

/// Plies after which an unattended game is declared drawn.
pub const MAX_GAME_LEN: usize = 200;
