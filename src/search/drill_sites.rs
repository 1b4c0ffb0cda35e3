//! Drill sites along a searched path.
//!
//! Given a goal cell from a finished search, walks back along the
//! predecessor chain and lists every undrilled well the truck could drill
//! from a cell it passes, paired with the cell it would stop on.

use crate::board::{Board, CellId, ConsistencyError};

use super::constrained::SearchState;

/// An undrilled well and the path cell to stop on to drill it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillSite {
    pub well: CellId,
    pub stop: CellId,
}

/// Lists drill sites on the path to `goal`, starting at `goal` and walking
/// back to the root. Cells with wells are skipped as stops since the truck
/// may not stop on them.
pub fn drill_sites(
    board: &Board,
    state: &SearchState,
    goal: CellId,
) -> Result<Vec<DrillSite>, ConsistencyError> {
    let mut sites = Vec::new();
    if !state.is_visited(goal) {
        return Ok(sites);
    }

    let limit = state.visited().len();
    let mut steps = 0usize;
    let mut node = Some(goal);
    while let Some(stop) = node {
        sites.extend(
            board
                .adjacent_undrilled_wells(stop)
                .map(|well| DrillSite { well, stop }),
        );
        node = state.predecessor(stop);
        while let Some(n) = node {
            if board.cell(n).wells == 0 {
                break;
            }
            node = state.predecessor(n);
            steps += 1;
            if steps > limit {
                return Err(ConsistencyError::PredecessorCycle { cell: goal });
            }
        }
        steps += 1;
        if steps > limit {
            return Err(ConsistencyError::PredecessorCycle { cell: goal });
        }
    }
    Ok(sites)
}

/// Drill sites for every goal of the search, in goal settle order.
pub fn all_drill_sites(
    board: &Board,
    state: &SearchState,
) -> Result<Vec<(CellId, Vec<DrillSite>)>, ConsistencyError> {
    state
        .goals()
        .iter()
        .map(|&goal| drill_sites(board, state, goal).map(|sites| (goal, sites)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search_from;

    #[test]
    fn sites_along_a_corridor() {
        // Wells above (0,1) and (0,3); truck walks the bottom row.
        let b = Board::from_text("1 .1 1 .2\n1 1 1 1\n", false, false).unwrap();
        let s = search_from(&b, b.id(1, 0).unwrap(), 3).unwrap();
        let goal = b.id(1, 3).unwrap();
        let sites = drill_sites(&b, &s, goal).unwrap();
        assert_eq!(
            sites,
            vec![
                DrillSite {
                    well: b.id(0, 3).unwrap(),
                    stop: goal
                },
                DrillSite {
                    well: b.id(0, 1).unwrap(),
                    stop: b.id(1, 1).unwrap()
                },
            ]
        );
    }

    #[test]
    fn well_cells_on_the_path_are_not_stops() {
        // Only route from (0,0) to (0,2) crosses the well at (0,1).
        let b = Board::from_text("1 .1 1 1\n", false, false).unwrap();
        let s = search_from(&b, CellId(0), 3).unwrap();
        let sites = drill_sites(&b, &s, CellId(2)).unwrap();
        assert_eq!(
            sites,
            vec![
                DrillSite {
                    well: CellId(1),
                    stop: CellId(2)
                },
                DrillSite {
                    well: CellId(1),
                    stop: CellId(0)
                },
            ]
        );
    }

    #[test]
    fn unvisited_goal_has_no_sites() {
        let b = Board::from_text("1 1 1 .1\n", false, false).unwrap();
        let s = search_from(&b, CellId(0), 1).unwrap();
        assert!(drill_sites(&b, &s, CellId(2)).unwrap().is_empty());
    }

    #[test]
    fn all_sites_follow_goal_order() {
        let b = Board::from_text("1 1 1\n1 .1 1\n1 1 1\n", false, false).unwrap();
        let s = search_from(&b, CellId(0), 3).unwrap();
        let all = all_drill_sites(&b, &s).unwrap();
        let goals: Vec<CellId> = all.iter().map(|(g, _)| *g).collect();
        assert_eq!(goals, s.goals());
        assert!(all.iter().all(|(_, sites)| !sites.is_empty()));
    }
}
