//! Board cells and their identities.
//!
//! A cell is one square of the Giganten board: its terrain, the wells under
//! it, any derrick built on it, and the truck parked on it. Search state is
//! deliberately not stored here; see `search::SearchState`.

use std::fmt;

use serde::Serialize;

/// Stable identity of a cell: its row-major index on the board.
///
/// Ordering follows row-major order, which the search uses as its
/// deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellId(pub u32);

impl CellId {
    /// Returns the index into the board's cell array.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Seat of a player at the table. Also identifies their truck and train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Terrain class of a cell. The discriminant is the movement cost to enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Terrain {
    Flat = 1,
    Hilly = 2,
    Mountain = 3,
}

impl Terrain {
    /// Movement points needed to enter a cell of this terrain.
    #[inline]
    pub const fn cost(self) -> i32 {
        self as i32
    }

    /// Parses a terrain digit from the board text format.
    pub fn from_digit(c: char) -> Option<Terrain> {
        match c {
            '1' => Some(Terrain::Flat),
            '2' => Some(Terrain::Hilly),
            '3' => Some(Terrain::Mountain),
            _ => None,
        }
    }

    /// Glyph used when rendering the board.
    pub const fn glyph(self) -> &'static str {
        match self {
            Terrain::Flat => "-",
            Terrain::Hilly => "~",
            Terrain::Mountain => "^",
        }
    }
}

/// Trailing marker after a well count in the board text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellVariant {
    /// `x`: the wells are not in play in three-player games.
    ThreePlayerExcluded,
    /// `d`: a derrick stands on the cell from the start (test fixtures).
    Derrick,
}

impl CellVariant {
    pub fn from_char(c: char) -> Option<CellVariant> {
        match c {
            'x' => Some(CellVariant::ThreePlayerExcluded),
            'd' => Some(CellVariant::Derrick),
            _ => None,
        }
    }
}

/// A parsed cell description, before it is placed on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpec {
    pub terrain: Terrain,
    pub wells: u8,
    pub variant: Option<CellVariant>,
}

impl Default for CellSpec {
    fn default() -> Self {
        CellSpec {
            terrain: Terrain::Flat,
            wells: 0,
            variant: None,
        }
    }
}

/// One square of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub id: CellId,
    pub row: usize,
    pub col: usize,
    pub terrain: Terrain,
    /// Number of undrilled wells (0-3). Zeroed when the cell is exhausted.
    pub wells: u8,
    /// Barrels under the tile, or markers left under the derrick.
    pub oil_reserve: u32,
    pub derrick: bool,
    pub exhausted: bool,
    /// Truck currently parked here.
    pub occupant: Option<PlayerId>,
    /// Count of adjacent cells holding undrilled wells.
    pub goal_count: u8,
    /// Neighbours in ascending `CellId` order, fixed at build time.
    pub adjacent: Vec<CellId>,
    /// The cell text this cell was built from.
    pub raw: String,
}

impl Cell {
    pub(crate) fn new(id: CellId, row: usize, col: usize, spec: CellSpec, raw: &str) -> Self {
        Cell {
            id,
            row,
            col,
            terrain: spec.terrain,
            wells: spec.wells,
            oil_reserve: 0,
            derrick: false,
            exhausted: false,
            occupant: None,
            goal_count: 0,
            adjacent: Vec::with_capacity(4),
            raw: raw.to_string(),
        }
    }

    /// Returns true if the cell holds wells nobody has drilled yet.
    #[inline]
    pub fn has_undrilled_wells(&self) -> bool {
        self.wells > 0 && !self.derrick
    }

    /// Returns true if a truck may not pass through this cell.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.derrick || self.occupant.is_some()
    }

    /// Returns true if stopping here puts the truck next to an undrilled well.
    #[inline]
    pub fn is_goal(&self) -> bool {
        self.goal_count > 0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_from_digit() {
        assert_eq!(Terrain::from_digit('1'), Some(Terrain::Flat));
        assert_eq!(Terrain::from_digit('2'), Some(Terrain::Hilly));
        assert_eq!(Terrain::from_digit('3'), Some(Terrain::Mountain));
        assert_eq!(Terrain::from_digit('0'), None);
        assert_eq!(Terrain::from_digit('4'), None);
    }

    #[test]
    fn terrain_cost_matches_digit() {
        assert_eq!(Terrain::Flat.cost(), 1);
        assert_eq!(Terrain::Hilly.cost(), 2);
        assert_eq!(Terrain::Mountain.cost(), 3);
    }

    #[test]
    fn cell_id_orders_row_major() {
        assert!(CellId(3) < CellId(4));
        assert_eq!(CellId(7).index(), 7);
    }

    #[test]
    fn blocked_and_goal_flags() {
        let mut cell = Cell::new(CellId(0), 0, 0, CellSpec::default(), "1");
        assert!(!cell.is_blocked());
        cell.occupant = Some(PlayerId(1));
        assert!(cell.is_blocked());
        cell.occupant = None;
        cell.derrick = true;
        assert!(cell.is_blocked());
        assert!(!cell.is_goal());
        cell.goal_count = 2;
        assert!(cell.is_goal());
    }

    #[test]
    fn undrilled_wells_clear_once_derrick_stands() {
        let spec = CellSpec {
            terrain: Terrain::Hilly,
            wells: 2,
            variant: None,
        };
        let mut cell = Cell::new(CellId(5), 1, 2, spec, "2.2");
        assert!(cell.has_undrilled_wells());
        cell.derrick = true;
        assert!(!cell.has_undrilled_wells());
        assert_eq!(cell.to_string(), "<1,2>");
    }
}
