//! strainmerge - instrument spreadsheet summarizer
//!
//! Converts raw compression-test XLSX files into compact per-sample
//! summaries and appends them, side by side, into a master report
//! workbook:
//! - Fixed-stride sample block scanning over arbitrarily-laid-out sheets
//! - Nearest-strain stress sampling at the nine target strain levels
//! - Forward-only free-column allocation in the master grid
//! - Deterministic output across repeated runs and parallel extraction
//!
//! # Usage
//!
//! ```no_run
//! use strainmerge::{process, SourceFile};
//!
//! let source = SourceFile::new("240101_run.xlsx", std::fs::read("240101_run.xlsx").unwrap());
//! let target = std::fs::read("report.xlsx").unwrap();
//! let merged = process(&[source], &target).unwrap();
//! std::fs::write("report_out.xlsx", merged).unwrap();
//! ```

pub mod batch;
pub mod cell_ref;
pub mod error;
pub mod grid;
pub mod merge;
pub mod reader;
pub mod sampler;
pub mod scanner;
pub mod writer;

pub use batch::{date_label, extract_all, extract_reports, merge_into_target, process, SourceFile};
pub use error::{MergeError, Result};
pub use grid::{Cell, Grid, SheetGrid};
pub use sampler::{StressValue, GAP_SENTINEL, TARGET_STRAINS};
pub use scanner::{SampleReport, SampleSummary, SAMPLE_STRIDE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
