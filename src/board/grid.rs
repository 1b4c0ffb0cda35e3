//! The board grid.
//!
//! Owns every cell, wires 4-directional adjacency at build time, keeps goal
//! counts in step with derrick changes, and exposes the handful of mutations
//! the game applies between searches.

use super::cell::{Cell, CellId, CellSpec, CellVariant, PlayerId};
use crate::protocol::board_text::{parse_cell, read_board, BoardTextError};
use crate::search::SearchState;

/// Internal-consistency failures. These mean the engine broke one of its own
/// invariants, not that the input was bad.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("predecessor chain from cell {cell} loops back on itself")]
    PredecessorCycle { cell: CellId },

    #[error("goal count of cell {cell} would drop below zero")]
    GoalUnderflow { cell: CellId },

    #[error("cell {cell} already has a derrick")]
    DerrickAlreadyBuilt { cell: CellId },

    #[error("cell {cell} has no derrick")]
    NoDerrick { cell: CellId },

    #[error("cell {cell} has no wells to drill")]
    NoWells { cell: CellId },

    #[error("cell {cell} is occupied by {occupant}")]
    CellOccupied { cell: CellId, occupant: PlayerId },

    #[error("no search result to score")]
    NoSearchResult,
}

/// Outcome of pumping one unit of oil out of a derrick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    /// Barrels produced (0 or 1).
    pub barrels: u32,
    /// True if the derrick ran dry and was removed.
    pub exhausted: bool,
}

/// A rectangular board of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from raw cell text laid out by rows.
    ///
    /// With `exclude_three_player_wells` set, wells marked `x` are removed.
    /// Cells marked `d` start with a derrick and do not count toward their
    /// neighbours' goals.
    pub fn build<S: AsRef<str>>(
        raw_rows: &[Vec<S>],
        exclude_three_player_wells: bool,
    ) -> Result<Board, BoardTextError> {
        let rows = raw_rows.len();
        if rows == 0 {
            return Err(BoardTextError::EmptyBoard);
        }
        let cols = raw_rows[0].len();
        if cols == 0 {
            return Err(BoardTextError::EmptyBoard);
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (r, raw_row) in raw_rows.iter().enumerate() {
            if raw_row.len() != cols {
                return Err(BoardTextError::RowLengthMismatch {
                    line: r + 1,
                    found: raw_row.len(),
                    expected: cols,
                });
            }
            for (c, raw) in raw_row.iter().enumerate() {
                let text = raw.as_ref();
                let mut spec = parse_cell(text).ok_or_else(|| BoardTextError::MalformedCell {
                    row: r,
                    col: c,
                    text: text.to_string(),
                })?;
                if exclude_three_player_wells
                    && spec.variant == Some(CellVariant::ThreePlayerExcluded)
                {
                    spec.wells = 0;
                }
                let id = CellId((r * cols + c) as u32);
                let mut cell = Cell::new(id, r, c, spec, text);
                cell.derrick = spec.variant == Some(CellVariant::Derrick);
                cells.push(cell);
            }
        }

        let mut board = Board { rows, cols, cells };
        board.wire_adjacency();
        Ok(board)
    }

    /// Parses board text (see `protocol::board_text`) and builds the board.
    pub fn from_text(
        text: &str,
        by_cols: bool,
        exclude_three_player_wells: bool,
    ) -> Result<Board, BoardTextError> {
        let rows = read_board(text, by_cols)?;
        Board::build(&rows, exclude_three_player_wells)
    }

    /// Connects each cell to its up/left/right/down neighbours and credits
    /// goal counts around undrilled wells.
    fn wire_adjacency(&mut self) {
        for idx in 0..self.cells.len() {
            let (row, col) = (idx / self.cols, idx % self.cols);
            let mut adjacent = Vec::with_capacity(4);
            if row > 0 {
                adjacent.push(CellId((idx - self.cols) as u32));
            }
            if col > 0 {
                adjacent.push(CellId((idx - 1) as u32));
            }
            if col + 1 < self.cols {
                adjacent.push(CellId((idx + 1) as u32));
            }
            if row + 1 < self.rows {
                adjacent.push(CellId((idx + self.cols) as u32));
            }
            self.cells[idx].adjacent = adjacent;
        }

        for idx in 0..self.cells.len() {
            if !self.cells[idx].has_undrilled_wells() {
                continue;
            }
            for n in 0..self.cells[idx].adjacent.len() {
                let neighbor = self.cells[idx].adjacent[n].index();
                if self.cells[neighbor].wells == 0 {
                    self.cells[neighbor].goal_count += 1;
                }
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    /// Returns the id of the cell at `(row, col)`, or `None` off the board.
    pub fn id(&self, row: usize, col: usize) -> Option<CellId> {
        if row < self.rows && col < self.cols {
            Some(CellId((row * self.cols + col) as u32))
        } else {
            None
        }
    }

    /// Returns a fresh search context sized for this board.
    pub fn search_state(&self) -> SearchState {
        SearchState::new(self.cells.len())
    }

    /// Sets the oil reserve under a cell's tile.
    pub fn set_oil_reserve(&mut self, id: CellId, barrels: u32) {
        self.cells[id.index()].oil_reserve = barrels;
    }

    /// Places or clears a truck on a cell.
    pub fn set_occupant(&mut self, id: CellId, occupant: Option<PlayerId>) {
        self.cells[id.index()].occupant = occupant;
    }

    /// Moves a player's truck between cells.
    pub fn move_occupant(
        &mut self,
        from: CellId,
        to: CellId,
        player: PlayerId,
    ) -> Result<(), ConsistencyError> {
        if from == to {
            return Ok(());
        }
        if let Some(occupant) = self.cells[to.index()].occupant {
            return Err(ConsistencyError::CellOccupied { cell: to, occupant });
        }
        if self.cells[from.index()].occupant == Some(player) {
            self.cells[from.index()].occupant = None;
        }
        self.cells[to.index()].occupant = Some(player);
        Ok(())
    }

    /// Neighbours of `id` that still hold undrilled wells.
    pub fn adjacent_undrilled_wells(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.cells[id.index()]
            .adjacent
            .iter()
            .copied()
            .filter(move |n| self.cells[n.index()].has_undrilled_wells())
    }

    /// Builds a derrick on a well cell, which makes it impassable and stops
    /// its well-less neighbours from counting it as a goal.
    pub fn build_derrick(&mut self, id: CellId) -> Result<(), ConsistencyError> {
        let cell = &self.cells[id.index()];
        if cell.derrick {
            return Err(ConsistencyError::DerrickAlreadyBuilt { cell: id });
        }
        if cell.wells == 0 {
            return Err(ConsistencyError::NoWells { cell: id });
        }
        // Check every neighbour before touching any of them.
        for n in &cell.adjacent {
            let neighbor = &self.cells[n.index()];
            if neighbor.wells == 0 && neighbor.goal_count == 0 {
                return Err(ConsistencyError::GoalUnderflow { cell: *n });
            }
        }

        let adjacent = self.cells[id.index()].adjacent.clone();
        for n in adjacent {
            let neighbor = &mut self.cells[n.index()];
            if neighbor.wells == 0 {
                neighbor.goal_count -= 1;
            }
        }
        self.cells[id.index()].derrick = true;
        log::debug!("derrick built at {}", self.cells[id.index()]);
        Ok(())
    }

    /// Removes an exhausted derrick. The cell becomes passable, loses its
    /// wells for good, and starts counting its own well neighbours as goals.
    pub fn remove_derrick(&mut self, id: CellId) -> Result<(), ConsistencyError> {
        if !self.cells[id.index()].derrick {
            return Err(ConsistencyError::NoDerrick { cell: id });
        }
        let goals = self.adjacent_undrilled_wells(id).count() as u8;
        let cell = &mut self.cells[id.index()];
        cell.derrick = false;
        cell.exhausted = true;
        cell.wells = 0;
        cell.oil_reserve = 0;
        cell.goal_count = goals;
        log::debug!("derrick at {} exhausted", cell);
        Ok(())
    }

    /// Pumps one unit of oil from the derrick on `id`, removing the derrick
    /// once the reserve runs out.
    pub fn extract_oil(&mut self, id: CellId) -> Result<Extraction, ConsistencyError> {
        let cell = &mut self.cells[id.index()];
        if !cell.derrick {
            return Err(ConsistencyError::NoDerrick { cell: id });
        }
        let barrels = if cell.oil_reserve > 0 {
            cell.oil_reserve -= 1;
            1
        } else {
            0
        };
        let exhausted = cell.oil_reserve == 0;
        if exhausted {
            self.remove_derrick(id)?;
        }
        Ok(Extraction { barrels, exhausted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        Board::from_text(text, false, false).unwrap()
    }

    #[test]
    fn dimensions_and_ids() {
        let b = board("1 1 1\n1 1 1\n");
        assert_eq!(b.rows(), 2);
        assert_eq!(b.cols(), 3);
        assert_eq!(b.len(), 6);
        assert_eq!(b.id(1, 2), Some(CellId(5)));
        assert_eq!(b.id(2, 0), None);
        assert_eq!(b.id(0, 3), None);
    }

    #[test]
    fn adjacency_is_clipped_at_edges() {
        let b = board("1 1 1\n1 1 1\n1 1 1\n");
        let corner = b.cell(b.id(0, 0).unwrap());
        assert_eq!(corner.adjacent, vec![CellId(1), CellId(3)]);
        let centre = b.cell(b.id(1, 1).unwrap());
        assert_eq!(
            centre.adjacent,
            vec![CellId(1), CellId(3), CellId(5), CellId(7)]
        );
        let right_edge = b.cell(b.id(1, 2).unwrap());
        assert_eq!(right_edge.adjacent, vec![CellId(2), CellId(4), CellId(8)]);
    }

    #[test]
    fn terrain_and_wells_are_parsed() {
        let b = board("2 .3\n3.1 1\n");
        assert_eq!(b.cell(CellId(0)).terrain.cost(), 2);
        assert_eq!(b.cell(CellId(1)).wells, 3);
        assert_eq!(b.cell(CellId(1)).terrain.cost(), 1);
        assert_eq!(b.cell(CellId(2)).terrain.cost(), 3);
        assert_eq!(b.cell(CellId(2)).wells, 1);
    }

    #[test]
    fn goal_counts_surround_wells() {
        // Wells at (0,1) and (1,0); (0,0) touches both.
        let b = board("1 .1 1\n.1 1 1\n1 1 1\n");
        assert_eq!(b.cell(b.id(0, 0).unwrap()).goal_count, 2);
        assert_eq!(b.cell(b.id(1, 1).unwrap()).goal_count, 2);
        assert_eq!(b.cell(b.id(0, 2).unwrap()).goal_count, 1);
        assert_eq!(b.cell(b.id(2, 0).unwrap()).goal_count, 1);
        assert_eq!(b.cell(b.id(2, 2).unwrap()).goal_count, 0);
        // Well cells themselves are never goals.
        assert_eq!(b.cell(b.id(0, 1).unwrap()).goal_count, 0);
    }

    #[test]
    fn three_player_marker_removes_wells() {
        let four = Board::from_text("1 .2x 1\n", false, false).unwrap();
        assert_eq!(four.cell(CellId(1)).wells, 2);
        assert_eq!(four.cell(CellId(0)).goal_count, 1);

        let three = Board::from_text("1 .2x 1\n", false, true).unwrap();
        assert_eq!(three.cell(CellId(1)).wells, 0);
        assert_eq!(three.cell(CellId(0)).goal_count, 0);
    }

    #[test]
    fn forced_derrick_does_not_create_goals() {
        let b = board("1 .1d 1\n");
        assert!(b.cell(CellId(1)).derrick);
        assert_eq!(b.cell(CellId(0)).goal_count, 0);
        assert_eq!(b.cell(CellId(2)).goal_count, 0);
    }

    #[test]
    fn malformed_cell_reports_position() {
        let err = Board::from_text("1 1\n1 7\n", false, false).unwrap_err();
        assert_eq!(
            err,
            BoardTextError::MalformedCell {
                row: 1,
                col: 1,
                text: "7".to_string()
            }
        );
    }

    #[test]
    fn build_rejects_ragged_rows() {
        let rows = vec![vec!["1", "1"], vec!["1"]];
        let err = Board::build(&rows, false).unwrap_err();
        assert!(matches!(err, BoardTextError::RowLengthMismatch { .. }));
    }

    #[test]
    fn build_derrick_decrements_goals() {
        let mut b = board("1 .1 1\n1 1 1\n");
        let well = b.id(0, 1).unwrap();
        b.build_derrick(well).unwrap();
        assert!(b.cell(well).derrick);
        for n in b.cell(well).adjacent.clone() {
            assert_eq!(b.cell(n).goal_count, 0);
        }
        assert_eq!(
            b.build_derrick(well),
            Err(ConsistencyError::DerrickAlreadyBuilt { cell: well })
        );
    }

    #[test]
    fn build_derrick_on_plain_cell_fails() {
        let mut b = board("1 1\n");
        assert_eq!(
            b.build_derrick(CellId(0)),
            Err(ConsistencyError::NoWells { cell: CellId(0) })
        );
    }

    #[test]
    fn goal_underflow_is_detected_without_partial_update() {
        let mut b = board("1 .1 1\n");
        // Corrupt one neighbour's count.
        b.cells[2].goal_count = 0;
        assert_eq!(
            b.build_derrick(CellId(1)),
            Err(ConsistencyError::GoalUnderflow { cell: CellId(2) })
        );
        assert_eq!(b.cell(CellId(0)).goal_count, 1);
        assert!(!b.cell(CellId(1)).derrick);
    }

    #[test]
    fn remove_derrick_exhausts_cell() {
        let mut b = board(".1 1 .2\n");
        let well = CellId(0);
        b.build_derrick(well).unwrap();
        b.remove_derrick(well).unwrap();
        let cell = b.cell(well);
        assert!(!cell.derrick);
        assert!(cell.exhausted);
        assert_eq!(cell.wells, 0);
        assert_eq!(cell.goal_count, 0);
        assert_eq!(b.cell(CellId(1)).goal_count, 1);
        assert_eq!(
            b.remove_derrick(well),
            Err(ConsistencyError::NoDerrick { cell: well })
        );
    }

    #[test]
    fn exhausted_cell_counts_remaining_well_neighbours() {
        // Two wells side by side; the first runs dry, then the second is drilled.
        let mut b = board(".1 .1 1\n");
        b.build_derrick(CellId(0)).unwrap();
        b.remove_derrick(CellId(0)).unwrap();
        assert_eq!(b.cell(CellId(0)).goal_count, 1);
        b.build_derrick(CellId(1)).unwrap();
        assert_eq!(b.cell(CellId(0)).goal_count, 0);
        assert_eq!(b.cell(CellId(2)).goal_count, 0);
    }

    #[test]
    fn extract_oil_drains_then_exhausts() {
        let mut b = board("1 .1\n");
        let well = CellId(1);
        b.set_oil_reserve(well, 2);
        b.build_derrick(well).unwrap();
        assert_eq!(
            b.extract_oil(well).unwrap(),
            Extraction {
                barrels: 1,
                exhausted: false
            }
        );
        assert_eq!(
            b.extract_oil(well).unwrap(),
            Extraction {
                barrels: 1,
                exhausted: true
            }
        );
        assert!(b.cell(well).exhausted);
        assert!(b.extract_oil(well).is_err());
    }

    #[test]
    fn move_occupant_refuses_taken_cell() {
        let mut b = board("1 1 1\n");
        b.set_occupant(CellId(0), Some(PlayerId(0)));
        b.set_occupant(CellId(2), Some(PlayerId(1)));
        assert_eq!(
            b.move_occupant(CellId(0), CellId(2), PlayerId(0)),
            Err(ConsistencyError::CellOccupied {
                cell: CellId(2),
                occupant: PlayerId(1)
            })
        );
        b.move_occupant(CellId(0), CellId(1), PlayerId(0)).unwrap();
        assert_eq!(b.cell(CellId(0)).occupant, None);
        assert_eq!(b.cell(CellId(1)).occupant, Some(PlayerId(0)));
    }

    #[test]
    fn adjacent_undrilled_wells_skips_derricks() {
        let mut b = board(".1 1 .2\n");
        let middle = CellId(1);
        assert_eq!(
            b.adjacent_undrilled_wells(middle).collect::<Vec<_>>(),
            vec![CellId(0), CellId(2)]
        );
        b.build_derrick(CellId(2)).unwrap();
        assert_eq!(
            b.adjacent_undrilled_wells(middle).collect::<Vec<_>>(),
            vec![CellId(0)]
        );
    }
}
