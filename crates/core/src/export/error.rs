//! Export error types.

use thiserror::Error;

use super::types::ExportKind;
use crate::budget::BudgetError;

/// Errors raised while validating or producing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Start date is after the end date.
    #[error("Start date cannot be after end date")]
    InvalidDateRange,

    /// Range is longer than the five-year cap.
    #[error("Date range cannot exceed 5 years")]
    RangeTooLong {
        /// Days between start and end.
        days: i64,
    },

    /// Unknown export format.
    #[error("Invalid export format. Supported formats: PDF, CSV, Excel")]
    InvalidFormat(String),

    /// Budget period is invalid.
    #[error(transparent)]
    Period(#[from] BudgetError),

    /// Rendered file exceeds the limit for its kind.
    #[error("{kind} is too large: {size} bytes exceeds the limit of {limit} bytes")]
    TooLarge {
        /// Export that overflowed.
        kind: ExportKind,
        /// Rendered size in bytes.
        size: usize,
        /// Allowed size in bytes.
        limit: usize,
    },

    /// CSV writer failed.
    #[error("CSV generation failed: {0}")]
    Csv(#[from] csv::Error),

    /// PDF writer failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// Spreadsheet writer failed.
    #[error("Excel generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Output could not be finalized.
    #[error("Export encoding failed: {0}")]
    Encoding(String),
}

impl ExportError {
    /// Whether the error is caused by the request rather than by rendering.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateRange | Self::RangeTooLong { .. } | Self::InvalidFormat(_) | Self::Period(_)
        )
    }
}
