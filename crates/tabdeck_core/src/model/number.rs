//! Numeric text conversions used by the calculator display.
//!
//! # Responsibility
//! - Parse display text with longest-valid-prefix semantics.
//! - Format `f64` results in the same shape the web shell shows them.
//!
//! # Invariants
//! - `parse_float` never fails; unparseable text yields `NaN`.
//! - `format_number` output always parses back to the same value
//!   (except `-0`, which is shown as `0`).

/// Largest decimal exponent rendered without scientific notation.
const MAX_PLAIN_EXPONENT: i32 = 21;
/// Smallest decimal exponent rendered without scientific notation.
const MIN_PLAIN_EXPONENT: i32 = -6;

/// Parses the longest numeric prefix of `text`.
///
/// Mirrors how the display is read back as an operand:
/// - `"1.2.3"` -> `1.2`
/// - `"3."` -> `3`
/// - `"."` and `""` -> `NaN`
/// - `"Infinity"` / `"-Infinity"` -> infinities
/// - `"1e+21"` -> `1e21`
pub fn parse_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if trimmed[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    end = skip_digits(bytes, end);
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, end + 1);
        let frac_digits = frac_end - (end + 1);
        if mantissa_digits + frac_digits > 0 {
            end = frac_end;
            mantissa_digits += frac_digits;
        }
    }

    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exp_end = skip_digits(bytes, cursor);
        if exp_end > cursor {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Formats `value` using shortest round-trip digits.
///
/// Plain notation is used for decimal exponents in `[-6, 21)`, scientific
/// notation (`1e+21`, `1.5e-7`) outside of it. Non-finite values render as
/// `NaN`, `Infinity` and `-Infinity`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields shortest digits, e.g. `1.2345e3` or `3.0000000000000004e-1`.
    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digit_count = digits.len() as i32;
    let point = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }

    if digit_count <= point && point <= MAX_PLAIN_EXPONENT {
        out.push_str(&digits);
        out.push_str(&"0".repeat((point - digit_count) as usize));
    } else if 0 < point && point <= MAX_PLAIN_EXPONENT {
        let split = point as usize;
        out.push_str(&digits[..split]);
        out.push('.');
        out.push_str(&digits[split..]);
    } else if MIN_PLAIN_EXPONENT < point && point <= 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat((-point) as usize));
        out.push_str(&digits);
    } else {
        out.push_str(&digits[..1]);
        if digit_count > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if exponent >= 0 { '+' } else { '-' });
        out.push_str(&exponent.abs().to_string());
    }

    out
}

fn skip_digits(bytes: &[u8], mut cursor: usize) -> usize {
    while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
        cursor += 1;
    }
    cursor
}
