//! Structured error types for strainmerge.
//!
//! Every failure is terminal for the whole batch; there is no retry layer.

/// All errors that can occur while extracting and merging workbooks.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Input bytes are not a readable workbook.
    #[error("workbook decode failed: {0}")]
    Decode(String),

    /// The combined batch produced zero recognized sample blocks.
    ///
    /// Distinct from [`MergeError::Decode`]: the inputs were well-formed
    /// workbooks, they just held no sample data where the scanner looks.
    #[error("no valid samples found in the source files; check the column layout")]
    EmptySummary,

    /// Serialization of the merged workbook failed.
    #[error("workbook write failed: {0}")]
    Write(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MergeError>;
