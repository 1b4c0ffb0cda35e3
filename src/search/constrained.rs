//! Budget-limited movement search.
//!
//! A label-setting (Dijkstra) search from the truck's cell that respects the
//! Giganten movement rules:
//!
//! - cells with a derrick or another truck are never entered;
//! - a cell with undrilled wells is only entered when budget is left over
//!   after paying for it, so the truck never ends its move on a well;
//! - nothing is relaxed beyond the movement budget.
//!
//! The frontier is keyed on `(distance, CellId)`, so equal distances settle
//! in row-major order and every run on the same board gives the same
//! distances, predecessors, and settle order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::board::{Board, CellId, ConsistencyError};

/// Distance value for cells the search has not reached.
pub const UNREACHED: i32 = i32::MAX;

/// Errors raised before a search can start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("root cell {root} is outside a board of {cells} cells")]
    RootOutOfBounds { root: CellId, cells: usize },
}

/// Per-search arena of distances, predecessors, and visit flags, indexed
/// by `CellId`. Owned by the caller and reused across searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    distance: Vec<i32>,
    predecessor: Vec<Option<CellId>>,
    visited: Vec<bool>,
    /// Cells in the order they were settled.
    order: Vec<CellId>,
    /// Settled cells with a positive goal count, in settle order.
    goals: Vec<CellId>,
    root: Option<CellId>,
    budget: i32,
}

impl SearchState {
    /// Creates a reset state for a board with `cells` cells.
    pub fn new(cells: usize) -> Self {
        SearchState {
            distance: vec![UNREACHED; cells],
            predecessor: vec![None; cells],
            visited: vec![false; cells],
            order: Vec::new(),
            goals: Vec::new(),
            root: None,
            budget: 0,
        }
    }

    /// Forgets everything the last search found.
    pub fn reset_search_state(&mut self) {
        self.distance.fill(UNREACHED);
        self.predecessor.fill(None);
        self.visited.fill(false);
        self.order.clear();
        self.goals.clear();
        self.root = None;
        self.budget = 0;
    }

    /// Resizes the arena for a board of `cells` cells and resets it.
    fn prepare(&mut self, cells: usize) {
        if self.distance.len() != cells {
            *self = SearchState::new(cells);
        } else {
            self.reset_search_state();
        }
    }

    /// Cost to reach `id`, or `None` if it was not reached.
    #[inline]
    pub fn distance(&self, id: CellId) -> Option<i32> {
        match self.distance[id.index()] {
            UNREACHED => None,
            d => Some(d),
        }
    }

    /// The cell `id` was reached from.
    #[inline]
    pub fn predecessor(&self, id: CellId) -> Option<CellId> {
        self.predecessor[id.index()]
    }

    #[inline]
    pub fn is_visited(&self, id: CellId) -> bool {
        self.visited[id.index()]
    }

    /// Settled cells in settle order.
    pub fn visited(&self) -> &[CellId] {
        &self.order
    }

    /// Settled goal cells in settle order.
    pub fn goals(&self) -> &[CellId] {
        &self.goals
    }

    pub fn root(&self) -> Option<CellId> {
        self.root
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    /// Returns the path from the root to `id`, both ends included. Empty if
    /// `id` was not visited.
    pub fn path_to(&self, id: CellId) -> Result<Vec<CellId>, ConsistencyError> {
        if !self.is_visited(id) {
            return Ok(Vec::new());
        }
        let mut path = vec![id];
        let mut current = id;
        while let Some(prev) = self.predecessor(current) {
            if path.len() > self.order.len() {
                return Err(ConsistencyError::PredecessorCycle { cell: id });
            }
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Ok(path)
    }
}

/// Runs the constrained search from `root` with a movement budget of
/// `budget`, writing results into `state`.
///
/// `state` is reset first. A zero or negative budget settles only the root.
pub fn constrained_search(
    board: &Board,
    state: &mut SearchState,
    root: CellId,
    budget: i32,
) -> Result<(), SearchError> {
    if root.index() >= board.len() {
        return Err(SearchError::RootOutOfBounds {
            root,
            cells: board.len(),
        });
    }

    state.prepare(board.len());
    state.root = Some(root);
    state.budget = budget;
    state.distance[root.index()] = 0;

    let mut frontier: BinaryHeap<Reverse<(i32, CellId)>> = BinaryHeap::new();
    frontier.push(Reverse((0, root)));

    while let Some(Reverse((dist, current))) = frontier.pop() {
        let ci = current.index();
        if state.visited[ci] {
            continue;
        }
        state.visited[ci] = true;
        state.order.push(current);

        let cell = board.cell(current);
        if cell.is_goal() {
            state.goals.push(current);
        }
        log::trace!("settled {} at distance {}", cell, dist);

        if dist >= budget {
            log::trace!("    stopping at distance {}", dist);
            continue;
        }

        for &next in &cell.adjacent {
            let ni = next.index();
            if state.visited[ni] {
                continue;
            }
            let neighbor = board.cell(next);
            if neighbor.is_blocked() {
                log::trace!("    skipping {}: derrick or truck", neighbor);
                continue;
            }
            let new_dist = dist.saturating_add(neighbor.terrain.cost());
            // The truck may not stop on a well.
            if neighbor.wells > 0 && new_dist >= budget {
                log::trace!("    skipping {}: wells", neighbor);
                continue;
            }
            if new_dist < state.distance[ni] && new_dist <= budget {
                log::trace!(
                    "    updated {}: {} -> {}",
                    neighbor,
                    state.distance[ni],
                    new_dist
                );
                state.distance[ni] = new_dist;
                state.predecessor[ni] = Some(current);
                frontier.push(Reverse((new_dist, next)));
            }
        }
    }

    Ok(())
}

/// Runs a search into a freshly allocated state.
pub fn search_from(board: &Board, root: CellId, budget: i32) -> Result<SearchState, SearchError> {
    let mut state = board.search_state();
    constrained_search(board, &mut state, root, budget)?;
    Ok(state)
}
