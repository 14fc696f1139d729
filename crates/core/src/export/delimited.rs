//! CSV export of transactions.

use crate::transaction::TransactionRecord;

use super::error::ExportError;

/// Header row of the transactions CSV.
pub const TRANSACTION_HEADERS: [&str; 6] =
    ["Date", "Title", "Category", "Type", "Amount", "Description"];

/// Writes transactions as CSV: one header row, then one row per record in
/// the order given. Amounts use two decimals without grouping.
///
/// # Errors
///
/// Returns `ExportError::Csv` if a record cannot be written.
pub fn transactions_csv(records: &[TransactionRecord]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(TRANSACTION_HEADERS)?;

    for r in records {
        let date = r.date.format("%Y-%m-%d").to_string();
        let amount = format!("{:.2}", r.amount.round_dp(2));
        wtr.write_record([
            date.as_str(),
            r.title.as_str(),
            r.category.as_str(),
            r.kind.as_str(),
            amount.as_str(),
            r.description.as_deref().unwrap_or_default(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    wtr.into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))
}
