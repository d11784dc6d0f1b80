//! Sample block scanning over a source grid.
//!
//! Instrument sheets lay samples out side by side in fixed-width column
//! blocks: sample 1 at column A, sample 2 at column G, and so on. A block
//! is recognized by a non-blank name cell in its first column; unused
//! slots are skipped without ending the scan, so ragged or partially-used
//! sheets still yield every valid sample, left to right.

use log::debug;
use serde::Serialize;

use crate::grid::{Cell, Grid};
use crate::sampler::{max_strain, sample_targets, StressValue};

/// Column width of one sample block.
pub const SAMPLE_STRIDE: usize = 6;

/// Row of the sample name cell within a block's first column.
const NAME_ROW: usize = 1;
/// Row of the thickness cell within a block's first column.
const THICKNESS_ROW: usize = 2;
/// Column offset of the strain series within a block.
const STRAIN_OFFSET: usize = 3;
/// Column offset of the stress series within a block.
const STRESS_OFFSET: usize = 4;

/// Compact per-sample summary, one per recognized block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSummary {
    /// Date label derived from the source filename.
    pub test_date: String,
    pub sample_name: String,
    /// Specimen thickness; empty text when the sheet leaves it out.
    pub thickness: Cell,
    /// One entry per target strain, in target order.
    pub stress_values: Vec<StressValue>,
}

/// Scan every sample block in `grid`, in increasing start-column order.
///
/// Pure over the grid; decoding and date-label derivation happen upstream.
#[must_use]
pub fn scan_samples(grid: &Grid, test_date: &str) -> Vec<SampleSummary> {
    let width = grid.width();
    let mut samples = Vec::new();

    let mut start_col = 0;
    while start_col < width {
        if let Some(sample) = scan_block(grid, test_date, start_col) {
            samples.push(sample);
        }
        start_col += SAMPLE_STRIDE;
    }

    samples
}

fn scan_block(grid: &Grid, test_date: &str, start_col: usize) -> Option<SampleSummary> {
    let name_cell = grid.cell(NAME_ROW, start_col);
    if name_cell.is_blank() {
        return None; // unused slot; later blocks may still be valid
    }

    let sample_name = name_cell.display_text();
    let thickness = match grid.cell(THICKNESS_ROW, start_col) {
        Cell::Empty => Cell::Text(String::new()),
        cell => cell.clone(),
    };

    let strain_col = start_col + STRAIN_OFFSET;
    let stress_col = start_col + STRESS_OFFSET;

    let max = max_strain(grid, strain_col);
    let stress_values = sample_targets(grid, strain_col, stress_col, max);

    debug!("block at column {start_col}: sample {sample_name:?}, max strain {max}");

    Some(SampleSummary {
        test_date: test_date.to_string(),
        sample_name,
        thickness,
        stress_values,
    })
}

/// One measured point of a sample's raw series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub strain: f64,
    pub load: f64,
}

/// Read-only projection of one sample's full series, consumed by the
/// presentation layer and the prose-analysis service. Never fed back into
/// extraction or merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleReport {
    pub label: String,
    pub max_load: f64,
    pub max_strain: f64,
    pub series: Vec<SeriesPoint>,
}

/// Build the analysis projection for every recognized block.
#[must_use]
pub fn scan_reports(grid: &Grid) -> Vec<SampleReport> {
    let width = grid.width();
    let mut reports = Vec::new();

    let mut start_col = 0;
    while start_col < width {
        if let Some(report) = block_report(grid, start_col) {
            reports.push(report);
        }
        start_col += SAMPLE_STRIDE;
    }

    reports
}

fn block_report(grid: &Grid, start_col: usize) -> Option<SampleReport> {
    let name_cell = grid.cell(NAME_ROW, start_col);
    if name_cell.is_blank() {
        return None;
    }

    let strain_col = start_col + STRAIN_OFFSET;
    let stress_col = start_col + STRESS_OFFSET;

    let mut series = Vec::new();
    for row in grid.rows() {
        let strain = row.get(strain_col).and_then(Cell::as_number);
        let load = row.get(stress_col).and_then(Cell::as_number);
        if let (Some(strain), Some(load)) = (strain, load) {
            series.push(SeriesPoint { strain, load });
        }
    }

    let max_load = series.iter().map(|p| p.load).fold(f64::NEG_INFINITY, f64::max);
    let max_strain = series
        .iter()
        .map(|p| p.strain)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(SampleReport {
        label: name_cell.display_text(),
        max_load: if series.is_empty() { 0.0 } else { max_load },
        max_strain: if series.is_empty() { 0.0 } else { max_strain },
        series,
    })
}
