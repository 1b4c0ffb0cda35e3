//! Board text IO.
//!
//! Reading the board text format into raw cell rows, and writing boards and
//! search results back out as text.

pub mod board_text;
pub mod render;

pub use board_text::{parse_cell, read_board, BoardTextError};
pub use render::{dump_raw_board, render_board};
