//! Display formatting for money, dates and identifiers.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Shown wherever a value is missing.
pub const PLACEHOLDER: &str = "-";

/// US-dollar rendering: `$1,234.50`, `-$12.00`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{}${}.{}", sign, group_thousands(whole), fraction)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `Mar 5, 2024`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// `Mar 5, 2024, 02:30 PM`
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// First eight characters of an identifier followed by an ellipsis.
pub fn short_id(id: &str) -> String {
    if id.chars().count() <= 8 {
        return id.to_string();
    }
    let head: String = id.chars().take(8).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn currency_groups_and_rounds() {
        assert_eq!(format_currency(dec("0")), "$0.00");
        assert_eq!(format_currency(dec("12.5")), "$12.50");
        assert_eq!(format_currency(dec("1234.567")), "$1,234.57");
        assert_eq!(format_currency(dec("1000000")), "$1,000,000.00");
        assert_eq!(format_currency(dec("999.995")), "$1,000.00");
    }

    #[test]
    fn currency_negative_sign_leads() {
        assert_eq!(format_currency(dec("-42.1")), "-$42.10");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }

    #[test]
    fn dates() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(format_date(&at), "Mar 5, 2024");
        assert_eq!(format_datetime(&at), "Mar 5, 2024, 02:30 PM");
    }

    #[test]
    fn short_ids() {
        assert_eq!(
            short_id("3f2a9c1e-0000-4000-8000-000000000000"),
            "3f2a9c1e..."
        );
        assert_eq!(short_id("A1"), "A1");
    }
}
