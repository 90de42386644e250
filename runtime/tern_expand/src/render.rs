//! Functor text of primitive values.
//!
//! Characters and strings are quoted but not escaped.

/// Significant digits of a rendered float.
const FLOAT_DIGITS: i32 = 15;
/// Digits after the point in scientific form.
const FLOAT_PRECISION: usize = 14;

pub fn render_int(value: i64) -> String {
    value.to_string()
}

/// Render with 15 significant digits, trailing zeros kept and a decimal
/// point always present, matching C's `%#.15g`.
pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    let scientific = format!("{value:.prec$e}", prec = FLOAT_PRECISION);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..FLOAT_DIGITS).contains(&exponent) {
        #[expect(clippy::cast_sign_loss, reason = "exponent < FLOAT_DIGITS")]
        let decimals = (FLOAT_DIGITS - 1 - exponent) as usize;
        let mut fixed = format!("{value:.decimals$}");
        if !fixed.contains('.') {
            fixed.push('.');
        }
        fixed
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

pub fn render_char(value: char) -> String {
    format!("'{value}'")
}

pub fn render_string(value: &str) -> String {
    format!("\"{value}\"")
}
