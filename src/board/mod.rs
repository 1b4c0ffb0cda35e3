//! Board representation.
//!
//! Contains the cell type, cell and player identities, and the grid that
//! owns the cells and their adjacency.

pub mod cell;
pub mod grid;

pub use cell::{Cell, CellId, CellSpec, CellVariant, PlayerId, Terrain};
pub use grid::{Board, ConsistencyError, Extraction};
