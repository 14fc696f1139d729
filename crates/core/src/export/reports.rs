//! Report builders: turn a user's data into [`ReportDocument`]s.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::document::{Cell, ReportDocument, Section, Table, Tone};
use super::format::{format_long_date, format_money, format_percent};
use super::types::DateRange;
use crate::analytics::{
    FinancialHealth, FinancialSummary, HealthRating, TransactionStatistics, category_breakdown,
    monthly_trends,
};
use crate::budget::{BudgetProgress, BudgetTotals, month_name};
use crate::goals::{GoalRecord, GoalStatus, GoalSummary};
use crate::transaction::{TransactionKind, TransactionRecord};

/// Months shown in trend tables.
pub const TREND_MONTHS: u32 = 6;

/// Transactions listed in the comprehensive report.
pub const RECENT_TRANSACTIONS: usize = 10;

const NO_TRANSACTIONS: &str = "No transactions found for the selected period.";
const NO_EXPENSES: &str = "No expense data available.";
const NO_GOALS: &str = "No savings goals found.";

/// Who a report is for and how to print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContext {
    /// Account username.
    pub username: String,
    /// Currency code printed before amounts.
    pub currency: String,
    /// Generation date.
    pub today: NaiveDate,
}

impl ExportContext {
    fn money(&self, amount: Decimal) -> String {
        format_money(&self.currency, amount)
    }

    fn generated_on(&self) -> String {
        format!("Generated on {}", format_long_date(self.today))
    }
}

/// Everything the range-based reports draw from.
#[derive(Debug, Clone)]
pub struct ExportDataset {
    /// Recipient and formatting.
    pub context: ExportContext,
    /// Requested period.
    pub range: DateRange,
    /// Transactions within the range, newest first.
    pub transactions: Vec<TransactionRecord>,
    /// Every transaction of the user, newest first.
    pub all_transactions: Vec<TransactionRecord>,
    /// Every budget of the user with derived spending.
    pub budgets: Vec<BudgetProgress>,
    /// Every savings goal of the user.
    pub goals: Vec<GoalRecord>,
}

impl ExportDataset {
    /// Summary of the in-range transactions.
    #[must_use]
    pub fn summary(&self) -> FinancialSummary {
        FinancialSummary::from_records(&self.transactions)
    }

    /// Budgets for one month.
    #[must_use]
    pub fn budgets_for(&self, month: u32, year: i32) -> Vec<BudgetProgress> {
        self.budgets
            .iter()
            .filter(|b| b.year == year && b.month == month)
            .cloned()
            .collect()
    }

    /// Budgets for the month containing `context.today`.
    #[must_use]
    pub fn current_month_budgets(&self) -> Vec<BudgetProgress> {
        let today = self.context.today;
        self.budgets_for(today.month(), today.year())
    }

    /// Health assessment over the whole history, this month's budgets and
    /// all goals. The requested range does not affect it.
    #[must_use]
    pub fn health(&self) -> FinancialHealth {
        FinancialHealth::assess(
            &FinancialSummary::from_records(&self.all_transactions),
            &self.current_month_budgets(),
            &self.goals,
        )
    }
}

fn sign_tone(amount: Decimal) -> Tone {
    if amount.is_sign_negative() && !amount.is_zero() {
        Tone::Negative
    } else {
        Tone::Positive
    }
}

fn kind_tone(kind: TransactionKind) -> Tone {
    match kind {
        TransactionKind::Income => Tone::Positive,
        TransactionKind::Expense => Tone::Negative,
    }
}

fn rating_tone(rating: HealthRating) -> Tone {
    match rating {
        HealthRating::Excellent => Tone::Positive,
        HealthRating::Good => Tone::Warning,
        HealthRating::NeedsAttention => Tone::Negative,
    }
}

fn summary_pairs(ctx: &ExportContext, summary: &FinancialSummary) -> Vec<(&'static str, Cell)> {
    vec![
        (
            "Total Income",
            Cell::toned(ctx.money(summary.total_income), Tone::Positive),
        ),
        (
            "Total Expenses",
            Cell::toned(ctx.money(summary.total_expenses), Tone::Negative),
        ),
        (
            "Net Balance",
            Cell::toned(ctx.money(summary.balance), sign_tone(summary.balance)),
        ),
        (
            "Total Transactions",
            Cell::from(summary.transaction_count.to_string()),
        ),
    ]
}

fn transaction_table<'a>(
    ctx: &ExportContext,
    records: impl IntoIterator<Item = &'a TransactionRecord>,
) -> Table {
    let mut table = Table::new(
        &["Date", "Title", "Category", "Type", "Amount"],
        &[16, 30, 20, 14, 20],
    );
    for r in records {
        table.push([
            Cell::from(r.date.format("%Y-%m-%d").to_string()),
            Cell::from(r.title.as_str()),
            Cell::from(r.category.as_str()),
            Cell::toned(r.kind.as_str(), kind_tone(r.kind)),
            Cell::toned(ctx.money(r.amount), kind_tone(r.kind)),
        ]);
    }
    table
}

fn category_table(ctx: &ExportContext, records: &[TransactionRecord]) -> Table {
    let mut table = Table::new(
        &["Category", "Amount", "Transactions", "Percentage"],
        &[34, 26, 18, 22],
    );
    for c in category_breakdown(records, TransactionKind::Expense) {
        table.push([
            c.category,
            ctx.money(c.amount),
            c.transaction_count.to_string(),
            format_percent(c.percentage),
        ]);
    }
    table
}

fn trend_table(ctx: &ExportContext, records: &[TransactionRecord]) -> Table {
    let mut table = Table::new(&["Month", "Income", "Expenses", "Net"], &[19, 27, 27, 27]);
    for t in monthly_trends(records, TREND_MONTHS, ctx.today) {
        table.push([
            Cell::from(t.label()),
            Cell::toned(ctx.money(t.total_income), Tone::Positive),
            Cell::toned(ctx.money(t.total_expenses), Tone::Negative),
            Cell::toned(ctx.money(t.net), sign_tone(t.net)),
        ]);
    }
    table
}

fn goal_table(ctx: &ExportContext, goals: &[GoalRecord], with_remaining: bool) -> Table {
    let mut table = if with_remaining {
        Table::new(
            &["Goal", "Target", "Current", "Remaining", "Progress", "Target Date", "Status"],
            &[20, 15, 15, 15, 10, 13, 12],
        )
    } else {
        Table::new(
            &["Goal", "Target", "Current", "Progress", "Target Date", "Status"],
            &[24, 17, 17, 11, 16, 15],
        )
    };

    for g in goals {
        let progress = g.progress();
        let status_tone = match g.status {
            GoalStatus::Completed => Tone::Positive,
            GoalStatus::InProgress => Tone::Normal,
            GoalStatus::Paused | GoalStatus::Cancelled => Tone::Muted,
        };
        let mut row = vec![
            Cell::from(g.name.as_str()),
            Cell::from(ctx.money(g.target_amount)),
            Cell::from(ctx.money(g.current_amount)),
        ];
        if with_remaining {
            row.push(Cell::from(ctx.money(progress.remaining_amount)));
        }
        row.push(Cell::from(format_percent(progress.progress_percent)));
        row.push(Cell::from(g.target_date.map_or_else(
            || "No deadline".to_string(),
            |d| d.format("%Y-%m-%d").to_string(),
        )));
        row.push(Cell::toned(g.status.label(), status_tone));
        table.push(row);
    }
    table
}

fn budget_table(ctx: &ExportContext, budgets: &[BudgetProgress], with_progress: bool) -> Table {
    let mut table = if with_progress {
        Table::new(
            &["Category", "Budget", "Spent", "Remaining", "Progress", "Status"],
            &[22, 17, 17, 17, 11, 16],
        )
    } else {
        Table::new(
            &["Category", "Budget", "Spent", "Remaining", "Status"],
            &[24, 19, 19, 19, 19],
        )
    };

    for b in budgets {
        let status = if b.over_budget {
            Tone::Negative
        } else {
            Tone::Positive
        };
        let mut row = vec![
            Cell::from(b.category.as_str()),
            Cell::from(ctx.money(b.budget_amount)),
            Cell::from(ctx.money(b.spent_amount)),
            Cell::toned(ctx.money(b.remaining_amount), sign_tone(b.remaining_amount)),
        ];
        if with_progress {
            row.push(Cell::from(format_percent(b.progress_percent)));
        }
        row.push(Cell::toned(b.status_label(), status));
        table.push(row);
    }
    table
}

/// "Financial Report": summary, transaction list and expense breakdown for
/// the requested period.
#[must_use]
pub fn transactions_report(data: &ExportDataset) -> ReportDocument {
    let ctx = &data.context;

    ReportDocument::new("Financial Report")
        .line(data.range.period_label())
        .line(format!("Account: {}", ctx.username))
        .line(ctx.generated_on())
        .section(Section::new("Summary").key_values(summary_pairs(ctx, &data.summary())))
        .section(
            Section::new("Transaction Details")
                .table_or(transaction_table(ctx, &data.transactions), NO_TRANSACTIONS),
        )
        .section(
            Section::new("Expense Breakdown by Category")
                .table_or(category_table(ctx, &data.transactions), NO_EXPENSES),
        )
}

/// "Financial Analytics Report" over the user's whole history.
#[must_use]
pub fn analytics_report(data: &ExportDataset) -> ReportDocument {
    let ctx = &data.context;
    let summary = FinancialSummary::from_records(&data.all_transactions);

    let mut overview = summary_pairs(ctx, &summary);
    overview.push((
        "Savings Rate",
        Cell::from(
            summary
                .savings_rate()
                .map_or_else(|| "N/A".to_string(), format_percent),
        ),
    ));

    ReportDocument::new("Financial Analytics Report")
        .line(ctx.generated_on())
        .line(format!("Account: {}", ctx.username))
        .section(Section::new("Financial Overview").key_values(overview))
        .section(
            Section::new("Expense Breakdown")
                .table_or(category_table(ctx, &data.all_transactions), NO_EXPENSES),
        )
        .section(
            Section::new("Monthly Trends")
                .table_or(trend_table(ctx, &data.all_transactions), NO_TRANSACTIONS),
        )
}

/// The full report: summary, health, transactions, budgets, goals, trends,
/// categories and recommendations.
#[must_use]
pub fn comprehensive_report(data: &ExportDataset) -> ReportDocument {
    let ctx = &data.context;
    let summary = data.summary();
    let health = data.health();
    let stats = TransactionStatistics::from_records(&data.transactions);
    let goals = GoalSummary::from_goals(&data.goals);
    let budgets = data.current_month_budgets();

    let executive = {
        let mut pairs = summary_pairs(ctx, &summary);
        pairs.push((
            "Savings Rate",
            Cell::from(
                summary
                    .savings_rate()
                    .map_or_else(|| "N/A".to_string(), format_percent),
            ),
        ));
        pairs.push(("Active Savings Goals", Cell::from(goals.active_goals.to_string())));
        pairs
    };

    let health_section = Section::new("FINANCIAL HEALTH ANALYSIS")
        .paragraph(Cell::toned(
            format!(
                "Financial Health Score: {}/100 ({})",
                health.health_score,
                health.rating.label()
            ),
            rating_tone(health.rating),
        ))
        .key_values(
            health
                .factor_scores
                .named()
                .into_iter()
                .map(|(name, score)| (name, format!("{score}/100"))),
        );

    let transaction_section = Section::new("TRANSACTION ANALYSIS")
        .key_values([
            ("Total Transactions", stats.total_transactions.to_string()),
            (
                "Income Transactions",
                format!(
                    "{} ({})",
                    stats.income_transactions,
                    format_percent(stats.income_percentage)
                ),
            ),
            (
                "Expense Transactions",
                format!(
                    "{} ({})",
                    stats.expense_transactions,
                    format_percent(stats.expense_percentage)
                ),
            ),
        ])
        .paragraph("Recent Transactions")
        .table_or(
            transaction_table(ctx, data.transactions.iter().take(RECENT_TRANSACTIONS)),
            NO_TRANSACTIONS,
        );

    let budget_section = Section::new("BUDGET PERFORMANCE")
        .paragraph(format!(
            "{} {}",
            month_name(ctx.today.month()),
            ctx.today.year()
        ))
        .table_or(
            budget_table(ctx, &budgets, false),
            "No budgets set for the current month.",
        );

    ReportDocument::new("COMPREHENSIVE FINANCIAL REPORT")
        .line(format!("Prepared for: {}", ctx.username))
        .line(ctx.generated_on())
        .line(data.range.period_label())
        .line(format!("Currency: {}", ctx.currency))
        .section(Section::new("EXECUTIVE SUMMARY").key_values(executive))
        .section(health_section)
        .section(transaction_section)
        .section(budget_section)
        .section(
            Section::new("SAVINGS GOALS PROGRESS")
                .table_or(goal_table(ctx, &data.goals, false), NO_GOALS),
        )
        .section(
            Section::new("MONTHLY TRENDS ANALYSIS")
                .table_or(trend_table(ctx, &data.all_transactions), NO_TRANSACTIONS),
        )
        .section(
            Section::new("CATEGORY ANALYSIS")
                .table_or(category_table(ctx, &data.transactions), NO_EXPENSES),
        )
        .section(Section::new("FINANCIAL RECOMMENDATIONS").numbered(health.recommendations))
}

/// "BUDGET PERFORMANCE REPORT" for one month.
#[must_use]
pub fn budget_report(
    ctx: &ExportContext,
    month: u32,
    year: i32,
    budgets: &[BudgetProgress],
) -> ReportDocument {
    let mut doc = ReportDocument::new("BUDGET PERFORMANCE REPORT")
        .line(format!("Period: {} {year}", month_name(month)))
        .line(format!("Account: {}", ctx.username))
        .line(ctx.generated_on())
        .section(Section::new("Budget Details").table_or(
            budget_table(ctx, budgets, true),
            "No budgets found for the selected period.",
        ));

    if !budgets.is_empty() {
        let totals = BudgetTotals::from_progress(budgets);
        doc = doc.section(Section::new("Overall Summary").key_values([
            ("Total Budget", Cell::from(ctx.money(totals.total_budget))),
            ("Total Spent", Cell::from(ctx.money(totals.total_spent))),
            (
                "Remaining",
                Cell::toned(ctx.money(totals.remaining), sign_tone(totals.remaining)),
            ),
            (
                "Categories Over Budget",
                Cell::from(totals.over_budget_count.to_string()),
            ),
        ]));
    }
    doc
}

/// "SAVINGS GOALS PROGRESS REPORT" over every goal.
#[must_use]
pub fn savings_goals_report(ctx: &ExportContext, goals: &[GoalRecord]) -> ReportDocument {
    let summary = GoalSummary::from_goals(goals);

    ReportDocument::new("SAVINGS GOALS PROGRESS REPORT")
        .line(format!("Account: {}", ctx.username))
        .line(ctx.generated_on())
        .section(Section::new("Overview").key_values([
            ("Total Goals", summary.total_goals.to_string()),
            ("Active Goals", summary.active_goals.to_string()),
            ("Completed Goals", summary.completed_goals.to_string()),
            ("Active Target", ctx.money(summary.total_target_amount)),
            ("Active Saved", ctx.money(summary.total_current_amount)),
        ]))
        .section(Section::new("Goal Details").table_or(goal_table(ctx, goals, true), NO_GOALS))
}
