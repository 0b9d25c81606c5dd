//! Report error types and formatting
//!
//! `ReportError` is a typed enum for the conditions a report run can hit.
//! Every variant is recoverable: reports warn about it and skip the affected
//! source, document or chart.
//!
//! Unparsable rows are deliberately not an error variant: they canonicalize to
//! `NaN` and are dropped during extraction.

use std::path::PathBuf;

/// Domain errors for loading and charting benchmark results.
///
/// ```ignore
/// match load_file(&path) {
///     Ok(document) => extract(&document, &groups),
///     Err(ReportError::MissingInput { .. }) => continue, // skip this source
///     Err(err) => return Err(err),
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReportError {
    /// Expected input file is absent or unreadable
    #[error("missing {file}")]
    MissingInput {
        file: String,
        /// Where the file was looked for
        searched: PathBuf,
    },

    /// Document content could not be decoded after skipping the preamble
    #[error("malformed input{}: {reason}", path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default())]
    MalformedInput {
        path: Option<PathBuf>,
        reason: String,
    },

    /// Nothing left to plot after extraction and alignment
    #[error("no usable data for {what}")]
    EmptyResult { what: String },
}

impl ReportError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ReportError::MalformedInput {
            path: None,
            reason: reason.into(),
        }
    }

    /// Attach the document path to a `MalformedInput` error.
    pub(crate) fn at(self, file: PathBuf) -> Self {
        match self {
            ReportError::MalformedInput { path: None, reason } => ReportError::MalformedInput {
                path: Some(file),
                reason,
            },
            other => other,
        }
    }
}
