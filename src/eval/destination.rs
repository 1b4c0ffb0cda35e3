//! Destination scoring.
//!
//! Scores every cell a search reached and picks the truck's destination:
//!
//! ```text
//! score = (col - start_col)            * column
//!       + goal_count                   * goal
//!       + sum(goal_count of ancestors) * prev_goal
//!       + train columns still affordable * train_column
//! ```
//!
//! The train term applies only when the player's train is behind the
//! candidate column. It spends the movement left over after the truck's
//! walk on the per-column train cost table, greedily, column by column.

use serde::{Deserialize, Serialize};

use crate::board::{Board, CellId, ConsistencyError};
use crate::search::SearchState;

/// Weights of the destination score terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Per column the truck moves right.
    pub column: i64,
    /// Per undrilled well next to the destination.
    pub goal: i64,
    /// Per goal passed on the way to the destination.
    pub prev_goal: i64,
    /// Per column the train could still advance.
    pub train_column: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            column: 10,
            goal: 20,
            prev_goal: 3,
            train_column: 6,
        }
    }
}

/// Per-player inputs to the score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRequest<'a> {
    /// Cell the truck starts from.
    pub start: CellId,
    /// Movement points for this turn.
    pub budget: i32,
    /// Column of the player's train.
    pub train_col: usize,
    /// Cost to move the train into each column, non-decreasing.
    pub train_costs: &'a [i32],
}

/// A candidate destination and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCell {
    pub cell: CellId,
    pub score: i64,
    pub distance: i32,
}

/// Returns how many columns a train at `train_col` can advance with
/// `points` movement points. Column `c` costs `costs[c]` to enter.
pub fn train_columns_affordable(train_col: usize, points: i32, costs: &[i32]) -> usize {
    let mut points = points;
    let mut dest = train_col;
    while let Some(&needed) = costs.get(dest + 1) {
        if needed > points {
            break;
        }
        points -= needed;
        dest += 1;
    }
    dest - train_col
}

/// Sums the goal counts of every ancestor of `id` on the predecessor chain.
fn predecessor_goal_sum(
    board: &Board,
    search: &SearchState,
    id: CellId,
) -> Result<u32, ConsistencyError> {
    let limit = search.visited().len();
    let mut sum = 0u32;
    let mut steps = 0usize;
    let mut prev = search.predecessor(id);
    while let Some(p) = prev {
        steps += 1;
        if steps > limit {
            log::error!("predecessor loop from {}", board.cell(id));
            return Err(ConsistencyError::PredecessorCycle { cell: id });
        }
        sum += board.cell(p).goal_count as u32;
        prev = search.predecessor(p);
    }
    Ok(sum)
}

/// Scores a single cell.
pub fn score_cell(
    board: &Board,
    search: &SearchState,
    request: &ScoreRequest<'_>,
    weights: &ScoringWeights,
    id: CellId,
) -> Result<i64, ConsistencyError> {
    let cell = board.cell(id);
    let start = board.cell(request.start);

    let mut score = (cell.col as i64 - start.col as i64) * weights.column;
    score += cell.goal_count as i64 * weights.goal;
    score += predecessor_goal_sum(board, search, id)? as i64 * weights.prev_goal;

    if request.train_col < cell.col {
        let points = search
            .distance(id)
            .map_or(0, |d| request.budget.saturating_sub(d));
        let cols = train_columns_affordable(request.train_col, points, request.train_costs);
        score += cols as i64 * weights.train_column;
    }
    Ok(score)
}

/// Scores every visited cell, in settle order.
pub fn score_all(
    board: &Board,
    search: &SearchState,
    request: &ScoreRequest<'_>,
    weights: &ScoringWeights,
) -> Result<Vec<ScoredCell>, ConsistencyError> {
    search
        .visited()
        .iter()
        .map(|&cell| {
            let score = score_cell(board, search, request, weights, cell)?;
            Ok(ScoredCell {
                cell,
                score,
                distance: search.distance(cell).unwrap_or(0),
            })
        })
        .collect()
}

/// Picks the highest-scoring visited cell. Ties go to the cell settled first.
pub fn choose_destination(
    board: &Board,
    search: &SearchState,
    request: &ScoreRequest<'_>,
    weights: &ScoringWeights,
) -> Result<ScoredCell, ConsistencyError> {
    let mut best: Option<ScoredCell> = None;
    for scored in score_all(board, search, request, weights)? {
        match best {
            Some(b) if b.score >= scored.score => {}
            _ => best = Some(scored),
        }
    }
    let best = best.ok_or(ConsistencyError::NoSearchResult)?;
    log::debug!(
        "destination {} score {} distance {}",
        board.cell(best.cell),
        best.score,
        best.distance
    );
    Ok(best)
}
