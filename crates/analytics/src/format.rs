// In crates/analytics/src/format.rs

use rust_decimal::Decimal;

/// Shown wherever a value is missing or not a finite number.
pub const UNAVAILABLE: &str = "--";

/// `$1,234.56` / `-$5.00`.
pub fn fmt_currency(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return UNAVAILABLE.to_string();
    };
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}", sign, group_decimal(&format!("{:.2}", rounded.abs())))
}

/// `+1.23%`, `-0.50%`, `0.00%`.
pub fn fmt_percent(value: Option<f64>, decimals: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let sign = if v > 0.0 { "+" } else { "" };
            format!("{}{:.*}%", sign, decimals, v)
        }
        None => UNAVAILABLE.to_string(),
    }
}

pub fn fmt_latency(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{} ms", v.round()),
        None => UNAVAILABLE.to_string(),
    }
}

/// Book price with two decimals and thousands separators.
pub fn fmt_book_price(value: Option<Decimal>) -> String {
    match value {
        Some(v) => group_decimal(&format!("{:.2}", v.round_dp(2))),
        None => UNAVAILABLE.to_string(),
    }
}

/// Book quantity with four to six decimals.
pub fn fmt_book_qty(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return UNAVAILABLE.to_string();
    };
    let rounded = value.round_dp(6).normalize();
    let text = if rounded.scale() < 4 {
        format!("{:.4}", rounded)
    } else {
        rounded.to_string()
    };
    group_decimal(&text)
}

/// Inserts `,` every three digits in the integer part of a plain decimal string.
fn group_decimal(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
