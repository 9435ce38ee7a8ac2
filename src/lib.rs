//! A Connect 4 game core with a computer opponent of tunable strength
//!
//! The opponent picks its moves with a depth-limited minimax search using
//! alpha-beta pruning, scoring the positions at the search horizon with a
//! window-counting heuristic. Difficulty levels trade search depth, heuristic
//! weights and a chance of playing a random move.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::{board::Board, difficulty::DifficultyProfile, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = Board::from_layout(&[
//!     ".......",
//!     ".......",
//!     ".......",
//!     ".......",
//!     "O......",
//!     "OX.....",
//!     "OX....X",
//! ])?;
//! let mut solver = Solver::seeded(7);
//! let result = solver.best_move(&board, &DifficultyProfile::hard());
//!
//! assert_eq!(result.column, 0);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;

pub mod board;

pub mod config;

pub mod difficulty;

pub mod error;

pub mod evaluation;

pub mod game;

pub mod solver;


/// The number of rows of a board created without explicit dimensions
pub const DEFAULT_ROWS: usize = 7;

/// The number of columns of a board created without explicit dimensions
pub const DEFAULT_COLUMNS: usize = 7;

/// The number of aligned pieces needed to win
pub const WIN_LENGTH: usize = 4;

// a default board must be able to hold a winning line in every orientation
const_assert!(DEFAULT_ROWS >= WIN_LENGTH && DEFAULT_COLUMNS >= WIN_LENGTH);
