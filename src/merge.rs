//! Column-append merge of sample summaries into the master grid.
//!
//! The master grid has fixed row roles, independent of column:
//! row 0 date, row 1 sample name, row 2 thickness, row 3 reserved blank,
//! rows 4–12 the nine stress values in target order.

use log::debug;

use crate::grid::{Cell, Grid};
use crate::scanner::SampleSummary;

/// Minimum row count of the merge record layout (rows 0–13).
pub const MERGE_RECORD_ROWS: usize = 14;

const DATE_ROW: usize = 0;
const NAME_ROW: usize = 1;
const THICKNESS_ROW: usize = 2;
const STRESS_START_ROW: usize = 4;

/// Write one summary into the first free column at or after `cursor`.
///
/// A column is occupied iff its name-row cell is non-blank. Returns the
/// cursor for the next append: one past the column just written, so a
/// merge pass never rescans columns it has already consumed.
pub fn append_summary(grid: &mut Grid, summary: &SampleSummary, mut cursor: usize) -> usize {
    while !grid.cell(NAME_ROW, cursor).is_blank() {
        cursor += 1;
    }

    debug!(
        "appending sample {:?} at column {cursor}",
        summary.sample_name
    );

    grid.set(DATE_ROW, cursor, Cell::Text(summary.test_date.clone()));
    grid.set(NAME_ROW, cursor, Cell::Text(summary.sample_name.clone()));
    grid.set(THICKNESS_ROW, cursor, summary.thickness.clone());
    // Row 3 stays untouched (reserved gap between header and values)
    for (k, value) in summary.stress_values.iter().enumerate() {
        grid.set(STRESS_START_ROW + k, cursor, value.as_cell());
    }

    cursor + 1
}

/// Merge every summary into `grid`, in input order.
///
/// The column cursor starts at 0 once per pass and only moves forward, so
/// merge order == input order == final column order.
pub fn merge_summaries(grid: &mut Grid, summaries: &[SampleSummary]) {
    grid.ensure_rows(MERGE_RECORD_ROWS);

    let mut cursor = 0;
    for summary in summaries {
        cursor = append_summary(grid, summary, cursor);
    }
}
