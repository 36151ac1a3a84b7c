//! Draughts-Rust: an English draughts (checkers) engine.
//!
//! This crate provides the rules of English draughts on a padded mailbox
//! board, a legal move generator with forced captures and multi-jump chains,
//! and a fixed-depth alpha-beta search.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation weights and search limits
//! - [`position`] - Board state, squares, sides and move application
//! - [`movegen`] - Moves and legal move generation
//! - [`search`] - Evaluation and negamax alpha-beta search
//! - [`game`] - Game sessions with undo history and background search
//! - [`console`] - Text command loop for playing from a terminal
//!
//! ## Example
//!
//! ```
//! use draughts_rust::movegen::generate;
//! use draughts_rust::position::{Board, Side};
//! use draughts_rust::search::best_move;
//!
//! let mut board = Board::new();
//! assert_eq!(generate(&board, Side::Black).len(), 7);
//!
//! // Ask the engine for a move and play it
//! let mv = best_move(&board, Side::Black, 4).expect("Black can move");
//! board.apply_move(&mv);
//! println!("Engine played {mv}");
//! ```

pub mod console;
pub mod constants;
pub mod game;
pub mod movegen;
pub mod position;
pub mod search;
