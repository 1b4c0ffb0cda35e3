//! Giganten simulation library.
//!
//! Exposes the board, the constrained movement search, destination scoring,
//! game orchestration and simulation modules for use by the binaries,
//! integration tests and benchmarks.

pub mod board;
pub mod config;
pub mod eval;
pub mod game;
pub mod logging;
pub mod protocol;
pub mod search;
pub mod simulate;
