//! Movement search.
//!
//! Computes which cells a truck can reach this turn, at what cost and along
//! which path, under the game's movement restrictions.

pub mod constrained;
pub mod drill_sites;

pub use constrained::{constrained_search, search_from, SearchError, SearchState, UNREACHED};
pub use drill_sites::{all_drill_sites, drill_sites, DrillSite};
