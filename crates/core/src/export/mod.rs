//! Report and data exports.
//!
//! Builders in [`reports`] describe each PDF as a [`ReportDocument`], which
//! [`pdf::render`] lays out. CSV and Excel are written straight from the
//! records. Every output is checked against the size limit of its
//! [`ExportKind`].

pub mod delimited;
pub mod document;
pub mod error;
pub mod format;
pub mod pdf;
pub mod reports;
pub mod types;
pub mod validation;
pub mod xlsx;


pub use document::{Block, Cell, ReportDocument, Section, Table, Tone};
pub use error::ExportError;
pub use format::{format_long_date, format_money, format_percent};
pub use reports::{
    ExportContext, ExportDataset, analytics_report, budget_report, comprehensive_report,
    savings_goals_report, transactions_report,
};
pub use types::{DateRange, ExportFormat, ExportKind};
pub use validation::{
    ExportPreview, ExportValidation, MAX_RANGE_DAYS, check_range, estimate_file_size,
    estimate_processing_time, validate_request,
};

/// Produces the bytes of a range-based export.
///
/// [`ExportKind::BudgetPdf`] covers the month the range starts in, or the
/// current month for an unbounded range.
///
/// # Errors
///
/// Returns the renderer's error, or `ExportError::TooLarge` when the output
/// exceeds the kind's limit.
pub fn generate(kind: ExportKind, data: &ExportDataset) -> Result<Vec<u8>, ExportError> {
    let bytes = match kind {
        ExportKind::TransactionsPdf => pdf::render(&transactions_report(data))?,
        ExportKind::TransactionsCsv => delimited::transactions_csv(&data.transactions)?,
        ExportKind::AnalyticsPdf => pdf::render(&analytics_report(data))?,
        ExportKind::ComprehensivePdf => pdf::render(&comprehensive_report(data))?,
        ExportKind::Excel => xlsx::financial_workbook(data)?,
        ExportKind::SavingsGoalsPdf => {
            pdf::render(&savings_goals_report(&data.context, &data.goals))?
        }
        ExportKind::BudgetPdf => {
            let (month, year) = data.range.month_of(data.context.today);
            pdf::render(&budget_report(
                &data.context,
                month,
                year,
                &data.budgets_for(month, year),
            ))?
        }
    };
    kind.check_size(bytes.len())?;
    Ok(bytes)
}
