//! Text formatting shared by every export format.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Formats money as `<CODE> 1,234,567.89`.
#[must_use]
pub fn format_money(currency: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{currency} {sign}{grouped}.{fraction}")
}

/// Formats a percentage with one decimal place, e.g. `42.5%`.
#[must_use]
pub fn format_percent(value: Decimal) -> String {
    format!("{:.1}%", value.round_dp(1))
}

/// Long date used in report bodies, e.g. `Jan 05, 2024`.
#[must_use]
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money("INR", dec!(1234567.891)), "INR 1,234,567.89");
        assert_eq!(format_money("USD", dec!(999)), "USD 999.00");
        assert_eq!(format_money("USD", dec!(1000)), "USD 1,000.00");
        assert_eq!(format_money("EUR", dec!(-250.5)), "EUR -250.50");
        assert_eq!(format_money("EUR", Decimal::ZERO), "EUR 0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(42.46)), "42.5%");
        assert_eq!(format_percent(dec!(100)), "100.0%");
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_long_date(date), "Jan 05, 2024");
    }
}
