//! Nearest-strain sampling of a sample's stress series.
//!
//! Source rows are not guaranteed sorted by strain, so each target gets a
//! full linear scan. O(rows × targets) per sample; instrument files are
//! small enough that this never matters.

use serde::ser::Serializer;
use serde::Serialize;

use crate::grid::{Cell, Grid};

/// The fixed strain levels at which stress is summarized. Shared between
/// extraction and the merge record layout; changing one without the other
/// corrupts the report.
pub const TARGET_STRAINS: [f64; 9] = [5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];

/// Marker written into the report when a sample never reaches a target
/// strain.
pub const GAP_SENTINEL: &str = "-";

/// One summarized stress entry: a measured value, or the gap marker when
/// the sample's recorded strain never reaches the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StressValue {
    Value(f64),
    Missing,
}

impl StressValue {
    /// Grid cell form: numbers stay numbers, gaps become the sentinel text.
    #[must_use]
    pub fn as_cell(&self) -> Cell {
        match self {
            StressValue::Value(n) => Cell::Number(*n),
            StressValue::Missing => Cell::Text(GAP_SENTINEL.to_string()),
        }
    }
}

// JSON form matches the grid form: a number or "-".
impl Serialize for StressValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            StressValue::Value(n) => serializer.serialize_f64(*n),
            StressValue::Missing => serializer.serialize_str(GAP_SENTINEL),
        }
    }
}

/// Largest numeric strain value in `strain_col`, or `-inf` when the column
/// holds no numbers at all.
#[must_use]
pub fn max_strain(grid: &Grid, strain_col: usize) -> f64 {
    let mut max = f64::NEG_INFINITY;
    for row in grid.rows() {
        if let Some(v) = row.get(strain_col).and_then(Cell::as_number) {
            if v > max {
                max = v;
            }
        }
    }
    max
}

/// Produce one stress entry per target strain, in [`TARGET_STRAINS`] order.
#[must_use]
pub fn sample_targets(
    grid: &Grid,
    strain_col: usize,
    stress_col: usize,
    max_strain: f64,
) -> Vec<StressValue> {
    TARGET_STRAINS
        .iter()
        .map(|&target| sample_target(grid, strain_col, stress_col, max_strain, target))
        .collect()
}

fn sample_target(
    grid: &Grid,
    strain_col: usize,
    stress_col: usize,
    max_strain: f64,
    target: f64,
) -> StressValue {
    // No extrapolation past the recorded maximum
    if max_strain < target {
        return StressValue::Missing;
    }

    // Strictly-smaller comparison: ties keep the earliest row
    let mut closest_diff = f64::MAX;
    let mut closest_row: Option<usize> = None;

    for (i, row) in grid.rows().iter().enumerate() {
        if let Some(v) = row.get(strain_col).and_then(Cell::as_number) {
            let diff = (v - target).abs();
            if diff < closest_diff {
                closest_diff = diff;
                closest_row = Some(i);
            }
        }
    }

    match closest_row {
        // A non-numeric stress cell at the matched row reads as zero, not
        // as a gap. Long-standing report behavior; keep it.
        Some(i) => match grid.cell(i, stress_col) {
            Cell::Number(n) => StressValue::Value(*n),
            _ => StressValue::Value(0.0),
        },
        None => StressValue::Missing,
    }
}
