//! Display helpers for amounts and durations

use crate::models::Amount;

const CURRENCY_SYMBOL: &str = "₹";

/// Format whole currency units with a symbol and thousands separators
pub fn format_currency(amount: Amount) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{}{}", CURRENCY_SYMBOL, grouped)
    } else {
        format!("{}{}", CURRENCY_SYMBOL, grouped)
    }
}

/// Render a month count as whole years plus remainder months
pub fn format_months(total_months: u32) -> String {
    let years = total_months / 12;
    let months = total_months % 12;

    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (years, months) {
        (0, m) => plural(m, "month"),
        (y, 0) => plural(y, "year"),
        (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
    }
}
