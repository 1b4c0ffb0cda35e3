//! Board text format.
//!
//! A board file lists one board row per line (or one column per line with
//! `by_cols`). Cells are separated by whitespace or commas. Lines starting
//! with `#` and blank lines are skipped. Each cell follows:
//!
//! ```text
//! <cell>      ::= <terrain>? ( "." <wellcount>? <variant>? )?
//! <terrain>   ::= "1" | "2" | "3"          (default 1)
//! <wellcount> ::= "1" | "2" | "3"          (default 0)
//! <variant>   ::= "x" | "d"
//! ```
//!
//! `x` marks wells that are not in play in three-player games; `d` places a
//! derrick on the cell from the start.

use crate::board::cell::{CellSpec, CellVariant, Terrain};

/// Errors raised while reading board text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardTextError {
    #[error("in row {row}, col {col}, '{text}' is not a valid cell")]
    MalformedCell {
        row: usize,
        col: usize,
        text: String,
    },

    #[error("line {line} has {found} cells, {expected} expected")]
    RowLengthMismatch {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("board has no cells")]
    EmptyBoard,
}

/// Parses a single cell description. Returns `None` if it does not match
/// the grammar. Matching is case-insensitive.
pub fn parse_cell(text: &str) -> Option<CellSpec> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }
    let mut chars = lower.chars().peekable();
    let mut spec = CellSpec::default();

    if let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            spec.terrain = Terrain::from_digit(c)?;
            chars.next();
        }
    }

    match chars.next() {
        None => return Some(spec),
        Some('.') => {}
        Some(_) => return None,
    }

    if let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            spec.wells = match c {
                '1'..='3' => c as u8 - b'0',
                _ => return None,
            };
            chars.next();
        }
    }

    if let Some(c) = chars.next() {
        spec.variant = Some(CellVariant::from_char(c)?);
    }

    if chars.next().is_some() {
        return None;
    }
    Some(spec)
}

/// Splits board text into rows of raw cell strings.
///
/// All data lines must hold the same number of cells. With `by_cols` each
/// line is a board column and the result is transposed into rows.
pub fn read_board(text: &str, by_cols: bool) -> Result<Vec<Vec<String>>, BoardTextError> {
    let mut lines: Vec<Vec<String>> = Vec::new();
    let mut expected = 0usize;

    for (nline, line) in text.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let cells: Vec<String> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if cells.is_empty() {
            continue;
        }
        if lines.is_empty() {
            expected = cells.len();
        }
        if cells.len() != expected {
            return Err(BoardTextError::RowLengthMismatch {
                line: nline + 1,
                found: cells.len(),
                expected,
            });
        }
        lines.push(cells);
    }

    if lines.is_empty() {
        return Err(BoardTextError::EmptyBoard);
    }

    if by_cols {
        let transposed = (0..expected)
            .map(|r| lines.iter().map(|col| col[r].clone()).collect())
            .collect();
        Ok(transposed)
    } else {
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(terrain: Terrain, wells: u8, variant: Option<CellVariant>) -> CellSpec {
        CellSpec {
            terrain,
            wells,
            variant,
        }
    }

    #[test]
    fn parse_terrain_only() {
        assert_eq!(parse_cell("1"), Some(spec(Terrain::Flat, 0, None)));
        assert_eq!(parse_cell("2"), Some(spec(Terrain::Hilly, 0, None)));
        assert_eq!(parse_cell("3"), Some(spec(Terrain::Mountain, 0, None)));
    }

    #[test]
    fn parse_wells_with_default_terrain() {
        assert_eq!(parse_cell(".2"), Some(spec(Terrain::Flat, 2, None)));
        assert_eq!(parse_cell("3.1"), Some(spec(Terrain::Mountain, 1, None)));
        assert_eq!(parse_cell("."), Some(spec(Terrain::Flat, 0, None)));
    }

    #[test]
    fn parse_variants_case_insensitive() {
        assert_eq!(
            parse_cell("2.3x"),
            Some(spec(Terrain::Hilly, 3, Some(CellVariant::ThreePlayerExcluded)))
        );
        assert_eq!(
            parse_cell(".1D"),
            Some(spec(Terrain::Flat, 1, Some(CellVariant::Derrick)))
        );
    }

    #[test]
    fn parse_rejects_bad_cells() {
        for bad in ["", "0", "4", "12", ".4", ".0", ".1y", ".1xx", "a", "1.2.3", "1x"] {
            assert_eq!(parse_cell(bad), None, "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn read_skips_comments_and_blank_lines() {
        let text = "# a board\n\n1 .1 2\n\n# trailer\n3 1 1\n";
        let rows = read_board(text, false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", ".1", "2"]);
        assert_eq!(rows[1], vec!["3", "1", "1"]);
    }

    #[test]
    fn read_accepts_commas() {
        let rows = read_board("1,.2,3\n1, 1 ,1\n", false).unwrap();
        assert_eq!(rows[0], vec!["1", ".2", "3"]);
        assert_eq!(rows[1], vec!["1", "1", "1"]);
    }

    #[test]
    fn read_reports_ragged_line() {
        let err = read_board("# header\n1 1 1\n1 1\n", false).unwrap_err();
        assert_eq!(
            err,
            BoardTextError::RowLengthMismatch {
                line: 3,
                found: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn read_empty_board_fails() {
        assert_eq!(read_board("# nothing\n\n", false), Err(BoardTextError::EmptyBoard));
    }

    #[test]
    fn read_by_columns_transposes() {
        // Two lines, each a column of three cells.
        let rows = read_board("1 2 3\n.1 .2 .3\n", true).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["1", ".1"]);
        assert_eq!(rows[2], vec!["3", ".3"]);
    }

    #[test]
    fn error_messages_carry_context() {
        let err = BoardTextError::MalformedCell {
            row: 2,
            col: 5,
            text: "9".to_string(),
        };
        assert_eq!(err.to_string(), "in row 2, col 5, '9' is not a valid cell");
    }
}
