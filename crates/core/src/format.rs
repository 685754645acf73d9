//! Numeric display formatting for prices, quantities, and percentages.
//!
//! These are pure string renderers for the presentation boundary. They
//! never alter the underlying numbers — formatted output must not be fed
//! back into any computation. Decimal digits are truncated, not rounded,
//! so a displayed value never claims more than was actually there.

/// Format a monetary price.
///
/// The integer part is grouped with thousands separators. Values with
/// `|value| >= 1` (and exact integers) always show 2 decimal places;
/// values below 1 show up to 4 decimals with trailing zeros trimmed,
/// keeping at least one digit so "0.5" never collapses to "0.".
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let (whole, frac) = split_grouped(value);
    if frac.is_empty() {
        return format!("{whole}.00");
    }

    if value.abs() < 1.0 {
        // Sub-unit prices need extra precision (e.g., "0.0001" for SHIB-like assets)
        format!("{whole}.{}", truncate_and_trim(&frac, 4))
    } else {
        let mut decimals: String = frac.chars().take(2).collect();
        while decimals.len() < 2 {
            decimals.push('0');
        }
        format!("{whole}.{decimals}")
    }
}

/// Format an asset quantity.
///
/// Single-trade amounts (`is_transaction_level = true`) show up to 8
/// decimals; aggregated holding amounts cap at 4. Trailing zeros are
/// trimmed and at least one decimal digit is kept.
pub fn format_quantity(value: f64, is_transaction_level: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let max_decimals = if is_transaction_level { 8 } else { 4 };
    let (whole, frac) = split_grouped(value);
    if frac.is_empty() {
        return format!("{whole}.0");
    }
    format!("{whole}.{}", truncate_and_trim(&frac, max_decimals))
}

/// Format a gain/loss percentage with fixed 2 decimals, e.g. "33.33%".
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Split a float's shortest decimal representation into a thousands-grouped
/// (signed) integer part and the raw fraction digits.
fn split_grouped(value: f64) -> (String, String) {
    let repr = value.to_string();
    let (int_part, frac_part) = match repr.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (repr, String::new()),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    (grouped, frac_part)
}

/// Cut fraction digits at `max_decimals`, drop trailing zeros, and keep
/// at least one digit.
fn truncate_and_trim(frac: &str, max_decimals: usize) -> String {
    let truncated: String = frac.chars().take(max_decimals).collect();
    let trimmed = truncated.trim_end_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
