//! Batch orchestration: parallel per-file extraction, deterministic
//! ordering, and the single-threaded merge fan-in.
//!
//! Extraction is read-only per source file, so files are processed in
//! parallel. Results are ordered by filename (not completion order) before
//! the merge, and any single failure aborts the whole batch; the merge is
//! never attempted against partial results.

use log::{debug, info};
use rayon::prelude::*;

use crate::error::{MergeError, Result};
use crate::grid::SheetGrid;
use crate::reader::read_first_sheet;
use crate::scanner::{scan_reports, scan_samples, SampleReport, SampleSummary};
use crate::writer::write_workbook;

/// One source workbook: original filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl SourceFile {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Date label for the report's date row: the filename up to its first
/// underscore ("240101_a.xlsx" → "240101"), or the whole name when there
/// is none.
#[must_use]
pub fn date_label(file_name: &str) -> &str {
    file_name.split('_').next().unwrap_or(file_name)
}

/// Extract sample summaries from every source file.
///
/// Files are sorted by name first, so column order in the final report is
/// stable across runs regardless of which extraction finishes first. Fails
/// with [`MergeError::EmptySummary`] when the combined batch recognizes no
/// sample blocks at all; a single file yielding zero blocks is not by
/// itself an error.
pub fn extract_all(sources: &[SourceFile]) -> Result<Vec<SampleSummary>> {
    let mut ordered: Vec<&SourceFile> = sources.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let batches: Vec<Vec<SampleSummary>> = ordered
        .par_iter()
        .map(|source| {
            let sheet = read_first_sheet(&source.data)?;
            let samples = scan_samples(&sheet.grid, date_label(&source.name));
            debug!("{}: {} sample block(s)", source.name, samples.len());
            Ok(samples)
        })
        .collect::<Result<_>>()?;

    let combined: Vec<SampleSummary> = batches.into_iter().flatten().collect();
    if combined.is_empty() {
        return Err(MergeError::EmptySummary);
    }

    info!(
        "extracted {} sample(s) from {} file(s)",
        combined.len(),
        sources.len()
    );
    Ok(combined)
}

/// Build the analysis projections for every source file, filename order.
///
/// An empty result is fine here; the projection feeds presentation and
/// prose analysis, not the report itself.
pub fn extract_reports(sources: &[SourceFile]) -> Result<Vec<SampleReport>> {
    let mut ordered: Vec<&SourceFile> = sources.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let batches: Vec<Vec<SampleReport>> = ordered
        .par_iter()
        .map(|source| {
            let sheet = read_first_sheet(&source.data)?;
            Ok(scan_reports(&sheet.grid))
        })
        .collect::<Result<_>>()?;

    Ok(batches.into_iter().flatten().collect())
}

/// Append `summaries` to the target workbook's first sheet and reserialize
/// it, preserving the sheet name. Runs on a single thread; there is exactly
/// one merge grid per operation.
pub fn merge_into_target(target_data: &[u8], summaries: &[SampleSummary]) -> Result<Vec<u8>> {
    let SheetGrid { name, mut grid } = read_first_sheet(target_data)?;
    crate::merge::merge_summaries(&mut grid, summaries);
    info!(
        "merged {} sample(s) into sheet {name:?}",
        summaries.len()
    );
    write_workbook(&grid, &name)
}

/// Full pipeline: extract every source, then merge everything into the
/// target workbook. All-or-nothing; the merge step never runs unless every
/// extraction succeeded.
pub fn process(sources: &[SourceFile], target_data: &[u8]) -> Result<Vec<u8>> {
    let summaries = extract_all(sources)?;
    merge_into_target(target_data, &summaries)
}
