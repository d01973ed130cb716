//! Error types.

use thiserror::Error;

/// Errors reported by a [`TextEditor`](crate::TextEditor) host.
///
/// The table engine itself never fails: malformed tables are normalized and out-of-range
/// cursors make a command a no-op. Everything here originates in the host and is propagated
/// to the caller unchanged.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("row {row} is out of range (last row is {last_row})")]
    /// A line operation addressed a row past the end of the document.
    RowOutOfRange {
        /// Requested row.
        row: usize,
        /// Last valid row.
        last_row: usize,
    },

    #[error("invalid line range {start}..{end}")]
    /// A line range was inverted or extended past the end of the document.
    InvalidRange {
        /// Inclusive start row.
        start: usize,
        /// Exclusive end row.
        end: usize,
    },

    #[error("transaction aborted: {0}")]
    /// The host rolled back the transaction.
    TransactionAborted(String),

    #[error("host error: {0}")]
    /// Any other host-specific failure.
    Host(#[from] Box<dyn std::error::Error + Send + Sync>),
}
