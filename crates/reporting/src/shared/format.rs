/// Decimal places for money and percentages in every rendered report
pub const DISPLAY_DECIMALS: usize = 2;

/// Round to 2 decimal places. Presentation only: sums are never rounded.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid rendering "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Insert thousands separators into a run of digits
fn group_digits(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Format an integer with thousands separators
///
/// # Examples
/// ```
/// use reporting::shared::format::format_count;
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(-42), "-42");
/// ```
pub fn format_count(n: i64) -> String {
    let grouped = group_digits(&n.unsigned_abs().to_string());
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format an amount rounded to 2 decimals with thousands separators
///
/// # Examples
/// ```
/// use reporting::shared::format::format_amount;
/// assert_eq!(format_amount(1234567.891), "1,234,567.89");
/// assert_eq!(format_amount(-0.004), "0.00");
/// ```
pub fn format_amount(value: f64) -> String {
    let rounded = round2(value);
    let text = format!("{:.*}", DISPLAY_DECIMALS, rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}.{frac_part}", group_digits(int_part))
}
