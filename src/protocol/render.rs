//! Plain-text board rendering.
//!
//! `render_board` draws one five-character token per cell:
//!
//! ```text
//! <terrain><distance:2><well><arrow><goal>
//! ```
//!
//! Terrain is `-` flat, `~` hilly, `^` mountain. Distance is blank for
//! cells the search never reached. Well is `w` (undrilled), `D` (derrick),
//! `X` (exhausted) or a space. The arrow points at the predecessor, `*` marks
//! the root. Goal is the goal count, or the truck's seat when occupied.
//!
//! `dump_raw_board` writes the board back in the text format it was read in.

use std::fmt::Write;

use crate::board::{Board, Cell};
use crate::search::SearchState;

fn well_marker(cell: &Cell) -> char {
    if cell.derrick {
        'D'
    } else if cell.exhausted {
        'X'
    } else if cell.wells > 0 {
        'w'
    } else {
        ' '
    }
}

fn arrow(board: &Board, search: &SearchState, cell: &Cell) -> char {
    if !search.is_visited(cell.id) {
        return ' ';
    }
    let Some(prev) = search.predecessor(cell.id) else {
        return '*';
    };
    let p = board.cell(prev);
    if p.row < cell.row {
        '^'
    } else if p.row > cell.row {
        'v'
    } else if p.col < cell.col {
        '<'
    } else {
        '>'
    }
}

/// Renders the board as a grid, with search results when a state is given.
pub fn render_board(board: &Board, search: Option<&SearchState>) -> String {
    let mut out = String::new();
    out.push_str("    ");
    for c in 0..board.cols() {
        let _ = write!(out, " {:>5}", c);
    }
    out.push('\n');

    for r in 0..board.rows() {
        let _ = write!(out, "{:>3} ", r);
        for c in 0..board.cols() {
            let Some(id) = board.id(r, c) else { continue };
            let cell = board.cell(id);
            let distance = match search.and_then(|s| s.distance(id)) {
                Some(d) if d > 99 => "**".to_string(),
                Some(d) => format!("{:>2}", d),
                None => "  ".to_string(),
            };
            let arrow = search.map_or(' ', |s| arrow(board, s, cell));
            let goal = match cell.occupant {
                Some(p) => char::from_digit(p.0 as u32 % 10, 10).unwrap_or('?'),
                None if cell.goal_count > 0 => {
                    char::from_digit(cell.goal_count as u32, 10).unwrap_or('+')
                }
                None => '.',
            };
            let _ = write!(
                out,
                " {}{}{}{}{}",
                cell.terrain.glyph(),
                distance,
                well_marker(cell),
                arrow,
                goal
            );
        }
        out.push('\n');
    }
    out
}

/// Writes the cell text the board was read from, row by row. Three-player
/// exclusion and play do not change the output, so a `--bycols` file dumps
/// to an equivalent row-wise file.
pub fn dump_raw_board(board: &Board) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} rows x {} columns", board.rows(), board.cols());
    for r in 0..board.rows() {
        let row: Vec<&str> = (0..board.cols())
            .filter_map(|c| board.id(r, c))
            .map(|id| board.cell(id).raw.as_str())
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}
