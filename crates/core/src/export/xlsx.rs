//! Multi-sheet Excel workbook export.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, ExcelDateTime, Format, FormatBorder, Workbook, Worksheet, XlsxError};

use super::error::ExportError;
use super::format::format_long_date;
use super::reports::ExportDataset;
use crate::analytics::FinancialSummary;
use crate::budget::BudgetProgress;
use crate::goals::GoalRecord;
use crate::transaction::TransactionRecord;

/// Sheet names in workbook order.
pub const SHEET_NAMES: [&str; 4] = ["Transactions", "Budgets", "Savings Goals", "Summary"];

struct Formats {
    header: Format,
    money: Format,
    percent: Format,
    date: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x1F_38_64))
                .set_border(FormatBorder::Thin),
            money: Format::new().set_num_format("#,##0.00"),
            percent: Format::new().set_num_format("0.0"),
            date: Format::new().set_num_format("dd/mm/yyyy"),
        }
    }
}

/// Builds the workbook: transactions in range, every budget, every goal and a
/// summary sheet.
///
/// # Errors
///
/// Returns `ExportError::Spreadsheet` if the workbook cannot be written.
pub fn financial_workbook(data: &ExportDataset) -> Result<Vec<u8>, ExportError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    write_transactions(
        workbook.add_worksheet().set_name(SHEET_NAMES[0])?,
        &data.transactions,
        &formats,
    )?;
    write_budgets(
        workbook.add_worksheet().set_name(SHEET_NAMES[1])?,
        &data.budgets,
        &formats,
    )?;
    write_goals(
        workbook.add_worksheet().set_name(SHEET_NAMES[2])?,
        &data.goals,
        &formats,
    )?;
    write_summary(
        workbook.add_worksheet().set_name(SHEET_NAMES[3])?,
        data,
        &formats,
    )?;

    Ok(workbook.save_to_buffer()?)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], formats: &Formats) -> Result<(), XlsxError> {
    for (col, header) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *header, &formats.header)?;
    }
    Ok(())
}

fn number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, XlsxError> {
    // Out-of-range years map to 0, which `from_ymd` rejects.
    ExcelDateTime::from_ymd(
        u16::try_from(date.year()).unwrap_or(0),
        u8::try_from(date.month()).unwrap_or(0),
        u8::try_from(date.day()).unwrap_or(0),
    )
}

fn write_transactions(
    sheet: &mut Worksheet,
    records: &[TransactionRecord],
    formats: &Formats,
) -> Result<(), XlsxError> {
    write_headers(
        sheet,
        &["Date", "Title", "Category", "Type", "Amount", "Description"],
        formats,
    )?;

    for (row, r) in (1u32..).zip(records) {
        sheet.write_datetime_with_format(row, 0, &excel_date(r.date)?, &formats.date)?;
        sheet.write_string(row, 1, &r.title)?;
        sheet.write_string(row, 2, &r.category)?;
        sheet.write_string(row, 3, r.kind.as_str())?;
        sheet.write_number_with_format(row, 4, number(r.amount), &formats.money)?;
        sheet.write_string(row, 5, r.description.as_deref().unwrap_or_default())?;
    }

    sheet.autofit();
    Ok(())
}

fn write_budgets(
    sheet: &mut Worksheet,
    budgets: &[BudgetProgress],
    formats: &Formats,
) -> Result<(), XlsxError> {
    write_headers(
        sheet,
        &[
            "Category",
            "Month",
            "Year",
            "Budget",
            "Spent",
            "Remaining",
            "Progress %",
            "Status",
        ],
        formats,
    )?;

    for (row, b) in (1u32..).zip(budgets) {
        sheet.write_string(row, 0, &b.category)?;
        sheet.write_string(row, 1, b.month_name())?;
        sheet.write_number(row, 2, b.year)?;
        sheet.write_number_with_format(row, 3, number(b.budget_amount), &formats.money)?;
        sheet.write_number_with_format(row, 4, number(b.spent_amount), &formats.money)?;
        sheet.write_number_with_format(row, 5, number(b.remaining_amount), &formats.money)?;
        sheet.write_number_with_format(row, 6, number(b.progress_percent), &formats.percent)?;
        sheet.write_string(row, 7, b.status_label())?;
    }

    sheet.autofit();
    Ok(())
}

fn write_goals(sheet: &mut Worksheet, goals: &[GoalRecord], formats: &Formats) -> Result<(), XlsxError> {
    write_headers(
        sheet,
        &[
            "Name",
            "Description",
            "Target",
            "Current",
            "Remaining",
            "Progress %",
            "Target Date",
            "Status",
        ],
        formats,
    )?;

    for (row, g) in (1u32..).zip(goals) {
        let progress = g.progress();
        sheet.write_string(row, 0, &g.name)?;
        sheet.write_string(row, 1, g.description.as_deref().unwrap_or_default())?;
        sheet.write_number_with_format(row, 2, number(g.target_amount), &formats.money)?;
        sheet.write_number_with_format(row, 3, number(g.current_amount), &formats.money)?;
        sheet.write_number_with_format(row, 4, number(progress.remaining_amount), &formats.money)?;
        sheet.write_number_with_format(row, 5, number(progress.progress_percent), &formats.percent)?;
        if let Some(date) = g.target_date {
            sheet.write_datetime_with_format(row, 6, &excel_date(date)?, &formats.date)?;
        }
        sheet.write_string(row, 7, g.status.label())?;
    }

    sheet.autofit();
    Ok(())
}

fn write_summary(sheet: &mut Worksheet, data: &ExportDataset, formats: &Formats) -> Result<(), XlsxError> {
    let summary = FinancialSummary::from_records(&data.transactions);
    write_headers(sheet, &["Metric", "Value"], formats)?;

    let text_rows = [
        ("Account", data.context.username.clone()),
        ("Currency", data.context.currency.clone()),
        ("Period", data.range.period_label()),
        ("Generated", format_long_date(data.context.today)),
    ];
    let mut row = 1u32;
    for (label, value) in &text_rows {
        sheet.write_string(row, 0, *label)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
    }

    let money_rows = [
        ("Total Income", summary.total_income),
        ("Total Expenses", summary.total_expenses),
        ("Net Balance", summary.balance),
    ];
    for (label, value) in money_rows {
        sheet.write_string(row, 0, label)?;
        sheet.write_number_with_format(row, 1, number(value), &formats.money)?;
        row += 1;
    }

    let count_rows = [
        ("Transactions", data.transactions.len()),
        ("Budgets", data.budgets.len()),
        ("Savings Goals", data.goals.len()),
    ];
    for (label, count) in count_rows {
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, u32::try_from(count).unwrap_or(u32::MAX))?;
        row += 1;
    }

    sheet.autofit();
    Ok(())
}
