//! Destination evaluation.
//!
//! Turns the cells a movement search reached into scores and picks where the
//! truck should go.

pub mod destination;

pub use destination::{
    choose_destination, score_all, score_cell, train_columns_affordable, ScoreRequest,
    ScoredCell, ScoringWeights,
};
