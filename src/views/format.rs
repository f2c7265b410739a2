//! Display formatting for prices.

/// Format an amount as whole US dollars: `$1,250`, `-$5`.
///
/// Rounds half away from zero. Non-finite input is printed as-is after the sign.
pub fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return if amount.is_nan() {
            "$NaN".to_string()
        } else if amount > 0.0 {
            "$∞".to_string()
        } else {
            "-$∞".to_string()
        };
    }

    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        grouped.push('-');
    }
    grouped.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
