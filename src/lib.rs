//! Shortest-solution solver for a 5x4 sliding-block puzzle: one 2x2 block,
//! one horizontal and four vertical 2x1 blocks, four 1x1 blocks and two
//! empty cells. The 2x2 block has to be brought to the bottom centre.
//!
//! The search is a plain breadth-first search over [`BoardState`]s, so the
//! first solution found is a shortest one.

pub mod board;
pub mod config;
pub mod error;
pub mod piece;
pub mod search;

pub use board::{BoardState, Move, StateKey};
pub use config::SearchConfig;
pub use error::{ConfigError, SearchError};
pub use piece::{Cell, CellSet, Direction, Piece, Shape};
pub use search::{
    big_at, big_at_exit, solve, solve_layout, Search, SearchStats, SearchStatus, Solution,
};
