//! Pre-flight checks and estimates for export requests.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::ExportError;
use super::types::{DateRange, ExportFormat};

/// Longest range accepted, in days (five years).
pub const MAX_RANGE_DAYS: i64 = 1825;

/// Ranges longer than this draw a slow-export warning.
pub const LARGE_RANGE_DAYS: i64 = 365;

/// Estimated output size grows by this many kilobytes per day of range.
const KB_PER_DAY: i64 = 2;

/// Rough size estimate, e.g. `"730 KB"` or `"3.6 MB"`.
#[must_use]
pub fn estimate_file_size(days: i64) -> String {
    let kb = days.max(0) * KB_PER_DAY;
    if kb < 1024 {
        format!("{kb} KB")
    } else if kb < 1024 * 1024 {
        format!("{:.1} MB", one_decimal(Decimal::from(kb) / Decimal::from(1024)))
    } else {
        format!("{:.1} GB", one_decimal(Decimal::from(kb) / Decimal::from(1024 * 1024)))
    }
}

fn one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Rough processing-time bucket for a range length.
#[must_use]
pub const fn estimate_processing_time(days: i64) -> &'static str {
    if days <= 30 {
        "< 30 seconds"
    } else if days <= LARGE_RANGE_DAYS {
        "30-60 seconds"
    } else if days <= MAX_RANGE_DAYS {
        "1-3 minutes"
    } else {
        "> 3 minutes"
    }
}

/// Validates ordering and the five-year cap.
///
/// # Errors
///
/// Returns `ExportError::InvalidDateRange` or `ExportError::RangeTooLong`.
pub fn check_range(range: &DateRange) -> Result<(), ExportError> {
    range.validate()?;
    match range.days() {
        Some(days) if days > MAX_RANGE_DAYS => Err(ExportError::RangeTooLong { days }),
        _ => Ok(()),
    }
}

/// Outcome of validating an export request without producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportValidation {
    /// No errors were found.
    pub valid: bool,
    /// Blocking problems.
    pub errors: Vec<String>,
    /// Non-blocking notes.
    pub warnings: Vec<String>,
    /// Processing-time bucket, when the range is bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_processing_time: Option<String>,
    /// Size estimate, when the range is bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_file_size: Option<String>,
}

/// Collects every problem with a request instead of stopping at the first.
#[must_use]
pub fn validate_request(range: &DateRange, format: Option<&str>) -> ExportValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = range.validate() {
        errors.push(e.to_string());
    }

    if let Some(days) = range.days() {
        if days > MAX_RANGE_DAYS {
            errors.push(ExportError::RangeTooLong { days }.to_string());
        } else if days > LARGE_RANGE_DAYS {
            warnings.push("Large date range may result in slower export processing".to_string());
        }
    }

    if let Some(Err(e)) = format.map(str::parse::<ExportFormat>) {
        errors.push(e.to_string());
    }

    let days = range.days();
    ExportValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
        estimated_processing_time: days.map(|d| estimate_processing_time(d).to_string()),
        estimated_file_size: days.map(estimate_file_size),
    }
}

/// What an export for the given range would contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPreview {
    /// Start date or `All time`.
    pub start_date: String,
    /// End date or `All time`.
    pub end_date: String,
    /// Requesting user.
    pub username: String,
    /// Date of the preview.
    pub export_date: NaiveDate,
    /// Days in the range, when bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<i64>,
    /// Size estimate, when bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_size: Option<String>,
}

impl ExportPreview {
    /// Builds a preview.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidDateRange` when start is after end.
    pub fn new(range: &DateRange, username: &str, today: NaiveDate) -> Result<Self, ExportError> {
        range.validate()?;
        let show = |d: Option<NaiveDate>| d.map_or_else(|| "All time".to_string(), |d| d.to_string());
        let days = range.days();

        Ok(Self {
            start_date: show(range.start),
            end_date: show(range.end),
            username: username.to_string(),
            export_date: today,
            estimated_days: days,
            estimated_size: days.map(estimate_file_size),
        })
    }
}
