//! Export formats, kinds, and date ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::ExportError;
use crate::budget::{month_bounds, month_name};

const MB: usize = 1024 * 1024;

/// File format requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Portable Document Format.
    Pdf,
    /// Comma-separated values.
    Csv,
    /// Office Open XML workbook.
    Excel,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            "excel" => Ok(Self::Excel),
            _ => Err(ExportError::InvalidFormat(s.to_string())),
        }
    }
}

/// Each downloadable document the service produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Transactions as a PDF report.
    TransactionsPdf,
    /// Transactions as CSV.
    TransactionsCsv,
    /// Analytics PDF.
    AnalyticsPdf,
    /// Full financial report PDF.
    ComprehensivePdf,
    /// Multi-sheet workbook.
    Excel,
    /// Monthly budget PDF.
    BudgetPdf,
    /// Savings goals PDF.
    SavingsGoalsPdf,
}

impl ExportKind {
    /// Largest accepted output in bytes.
    #[must_use]
    pub const fn max_bytes(self) -> usize {
        match self {
            Self::TransactionsCsv => 10 * MB,
            Self::TransactionsPdf | Self::AnalyticsPdf | Self::BudgetPdf | Self::SavingsGoalsPdf => {
                25 * MB
            }
            Self::ComprehensivePdf => 50 * MB,
            Self::Excel => 100 * MB,
        }
    }

    /// MIME type of the output.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::TransactionsCsv => "text/csv",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            _ => "application/pdf",
        }
    }

    /// Human-readable name used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TransactionsPdf => "Transactions PDF",
            Self::TransactionsCsv => "Transactions CSV",
            Self::AnalyticsPdf => "Analytics PDF",
            Self::ComprehensivePdf => "Comprehensive report",
            Self::Excel => "Excel export",
            Self::BudgetPdf => "Budget report",
            Self::SavingsGoalsPdf => "Savings goals report",
        }
    }

    /// Rejects outputs larger than [`Self::max_bytes`].
    ///
    /// # Errors
    ///
    /// Returns `ExportError::TooLarge` when `size` exceeds the limit.
    pub const fn check_size(self, size: usize) -> Result<(), ExportError> {
        let limit = self.max_bytes();
        if size > limit {
            return Err(ExportError::TooLarge {
                kind: self,
                size,
                limit,
            });
        }
        Ok(())
    }

    /// Download filename for range-based and dated exports.
    ///
    /// Range-based exports carry `-<start>-to-<end>` when both bounds are set
    /// and `-<today>` otherwise. Budget reports are named after the month
    /// they cover.
    #[must_use]
    pub fn filename(self, range: &DateRange, today: NaiveDate) -> String {
        let (stem, ext) = match self {
            Self::TransactionsPdf => ("transactions", "pdf"),
            Self::TransactionsCsv => ("transactions", "csv"),
            Self::ComprehensivePdf => ("comprehensive-financial-report", "pdf"),
            Self::Excel => ("financial-data", "xlsx"),
            Self::AnalyticsPdf => return format!("financial-analytics-{}.pdf", iso(today)),
            Self::SavingsGoalsPdf => return format!("savings-goals-report-{}.pdf", iso(today)),
            Self::BudgetPdf => {
                let (month, year) = range.month_of(today);
                return Self::budget_filename(month, year);
            }
        };

        match range.bounds() {
            Some((start, end)) => format!("{stem}-{}-to-{}.{ext}", iso(start), iso(end)),
            None => format!("{stem}-{}.{ext}", iso(today)),
        }
    }

    /// Download filename for a monthly budget report.
    #[must_use]
    pub fn budget_filename(month: u32, year: i32) -> String {
        format!(
            "budget-report-{}-{year}.pdf",
            month_name(month).to_ascii_lowercase()
        )
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Optional inclusive date bounds for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: Option<NaiveDate>,
    /// Last day included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range from optional bounds.
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A range with no bounds.
    #[must_use]
    pub const fn all_time() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// The calendar month from its first to its last day.
    #[must_use]
    pub fn month(year: i32, month: u32) -> Option<Self> {
        month_bounds(year, month).map(|(first, last)| Self::new(Some(first), Some(last)))
    }

    /// Month and year of the start bound, or of `today` when unbounded.
    #[must_use]
    pub fn month_of(&self, today: NaiveDate) -> (u32, i32) {
        let day = self.start.unwrap_or(today);
        (day.month(), day.year())
    }

    /// Both bounds, when both are set.
    #[must_use]
    pub const fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Checks that the range is ordered.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidDateRange` when start is after end.
    pub fn validate(&self) -> Result<(), ExportError> {
        match self.bounds() {
            Some((start, end)) if start > end => Err(ExportError::InvalidDateRange),
            _ => Ok(()),
        }
    }

    /// Days from start to end (end exclusive), when both are set.
    #[must_use]
    pub fn days(&self) -> Option<i64> {
        self.bounds()
            .map(|(start, end)| end.signed_duration_since(start).num_days())
    }

    /// Whether a date falls within the range. Missing bounds are open.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    /// Period line used in report headers.
    #[must_use]
    pub fn period_label(&self) -> String {
        let fmt = |d: NaiveDate| d.format("%b %d, %Y").to_string();
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!("Period: {} to {}", fmt(start), fmt(end)),
            (Some(start), None) => format!("Period: From {}", fmt(start)),
            (None, Some(end)) => format!("Period: Until {}", fmt(end)),
            (None, None) => "Period: All Time".to_string(),
        }
    }
}
