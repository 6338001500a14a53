//! Delimited text layout format
//!
//! One line per grid row, every cell written as its room name followed by
//! `", "`, then the starting-location line after the last row:
//!
//! ```text
//! CLR, ES, SW, CLR, ...
//! ...
//! Starting row is 4 and col is 6
//! ```

use dg_core::GenerationResult;
use dg_core::dungeon::{Grid, Position, RoomVariant};

use crate::ExportError;

/// Separator written after every cell
pub const DELIMITER: &str = ", ";

const START_PREFIX: &str = "Starting row is ";
const START_INFIX: &str = " and col is ";

/// Render a layout in the delimited text format
pub fn format_csv(result: &GenerationResult) -> String {
    let grid = &result.grid;
    let mut out = String::with_capacity(grid.len() * 6 + 64);

    for row in grid.rows() {
        for room in row {
            out.push_str(room.name());
            out.push_str(DELIMITER);
        }
        out.push('\n');
    }
    out.push_str(&result.start_location_text());
    out
}

/// Parse the delimited text format back into a layout
///
/// The layout must pass [`GenerationResult::check`]. The imported result
/// reports a single attempt, since the attempt count is not stored in the
/// file.
pub fn parse_csv(text: &str) -> Result<GenerationResult, ExportError> {
    let mut rows: Vec<Vec<RoomVariant>> = Vec::new();
    let mut start = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if start.is_some() {
            return Err(ExportError::Parse {
                line: line_no,
                reason: "content after starting location".to_string(),
            });
        }
        if line.starts_with(START_PREFIX) {
            start = Some(parse_start(line, line_no)?);
            continue;
        }

        let row = line
            .split(',')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(|cell| {
                cell.parse::<RoomVariant>()
                    .map_err(|_| ExportError::UnknownRoom(cell.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    let start = start.ok_or_else(|| ExportError::Parse {
        line: text.lines().count(),
        reason: "missing starting location".to_string(),
    })?;

    let result = GenerationResult {
        grid: Grid::try_from(rows)?,
        start,
        attempts: 1,
    };
    result.check()?;
    Ok(result)
}

fn parse_start(line: &str, line_no: usize) -> Result<Position, ExportError> {
    let bad = |reason: &str| ExportError::Parse {
        line: line_no,
        reason: reason.to_string(),
    };

    let rest = line
        .strip_prefix(START_PREFIX)
        .ok_or_else(|| bad("expected starting location"))?;
    let (row, col) = rest
        .split_once(START_INFIX)
        .ok_or_else(|| bad("expected \"and col is\""))?;
    let row: usize = row.trim().parse().map_err(|_| bad("bad start row"))?;
    let col: usize = col.trim().parse().map_err(|_| bad("bad start column"))?;

    if row == 0 || col == 0 {
        return Err(bad("start coordinates are 1-based"));
    }
    Ok(Position::new(row - 1, col - 1))
}
