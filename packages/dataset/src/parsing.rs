//! Lenient property parsing.
//!
//! Area properties come from hand-edited GIS exports: counts are sometimes
//! numbers, sometimes strings, sometimes missing. Parsing never fails;
//! anything that cannot be read as a number becomes `0`.

use serde_json::Value;

/// Reads an integer the way a leading-digits parser would.
///
/// JSON integers are taken as is, floats are truncated, and strings are
/// read from their leading (optionally signed) digit run, so `"12 jiwa"`
/// is `12` and `"3.7"` is `3`. Returns `None` when no digits are found.
#[must_use]
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().and_then(truncate_f64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Reads a floating-point number from a JSON number or the longest numeric
/// prefix of a string. Returns `None` for non-finite or missing values.
#[must_use]
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    }
}

/// A non-negative count; missing, malformed, or negative values are `0`.
#[must_use]
pub fn count_or_zero(value: Option<&Value>) -> u64 {
    value
        .and_then(parse_int)
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

/// A signed integer; missing or malformed values are `0`.
#[must_use]
pub fn int_or_zero(value: Option<&Value>) -> i64 {
    value.and_then(parse_int).unwrap_or(0)
}

/// A float; missing or malformed values are `0.0`.
#[must_use]
pub fn float_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(parse_float).unwrap_or(0.0)
}

/// A trimmed, non-empty string. Numbers are rendered as text.
#[must_use]
pub fn text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_f64(f: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds.
    f.is_finite().then(|| f.trunc() as i64)
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_digits = digits_from(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits_from(end + 1);
        end += 1 + fraction_digits;
    }
    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent_digits = digits_from(end + 1 + sign);
        if exponent_digits > 0 {
            end += 1 + sign + exponent_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_json_integers() {
        assert_eq!(parse_int(&json!(24_512)), Some(24_512));
        assert_eq!(parse_int(&json!(-3)), Some(-3));
    }

    #[test]
    fn truncates_json_floats() {
        assert_eq!(parse_int(&json!(1234.9)), Some(1234));
        assert_eq!(parse_int(&json!(-2.5)), Some(-2));
    }

    #[test]
    fn reads_leading_digits_of_strings() {
        assert_eq!(parse_int(&json!("  42 ")), Some(42));
        assert_eq!(parse_int(&json!("12 jiwa")), Some(12));
        assert_eq!(parse_int(&json!("3.7")), Some(3));
        assert_eq!(parse_int(&json!("+8")), Some(8));
        assert_eq!(parse_int(&json!("-15")), Some(-15));
        assert_eq!(parse_int(&json!("0x1A")), Some(0));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert_eq!(parse_int(&json!("n/a")), None);
        assert_eq!(parse_int(&json!("")), None);
        assert_eq!(parse_int(&json!("-")), None);
        assert_eq!(parse_int(&json!(true)), None);
        assert_eq!(parse_int(&Value::Null), None);
        assert_eq!(parse_int(&json!({"value": 3})), None);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(parse_int(&json!("99999999999999999999999")), Some(i64::MAX));
        assert_eq!(parse_int(&json!(u64::MAX)), Some(i64::MAX));
    }

    #[test]
    fn counts_default_to_zero() {
        assert_eq!(count_or_zero(None), 0);
        assert_eq!(count_or_zero(Some(&json!("banyak"))), 0);
        assert_eq!(count_or_zero(Some(&json!(-4))), 0);
        assert_eq!(count_or_zero(Some(&json!("7"))), 7);
    }

    #[test]
    fn signed_values_keep_sign() {
        assert_eq!(int_or_zero(Some(&json!("-2"))), -2);
        assert_eq!(int_or_zero(Some(&json!(null))), 0);
    }

    #[test]
    fn reads_floats() {
        assert!((float_or_zero(Some(&json!(12_345.6))) - 12_345.6).abs() < 1e-9);
        assert!((float_or_zero(Some(&json!("9876.5 /km2"))) - 9_876.5).abs() < 1e-9);
        assert!((float_or_zero(Some(&json!("1e3x"))) - 1_000.0).abs() < 1e-9);
        assert!(float_or_zero(Some(&json!("padat"))).abs() < f64::EPSILON);
        assert!(float_or_zero(None).abs() < f64::EPSILON);
    }

    #[test]
    fn float_prefixes_stop_at_the_first_non_numeric_part() {
        assert_eq!(parse_float(&json!("-.5 km")), Some(-0.5));
        assert_eq!(parse_float(&json!("7.")), Some(7.0));
        assert_eq!(parse_float(&json!("2e")), Some(2.0));
        assert_eq!(parse_float(&json!("2e+x")), Some(2.0));
        assert_eq!(parse_float(&json!("1.5e-1.2")), Some(0.15));
        assert_eq!(parse_float(&json!("3-4")), Some(3.0));
        assert_eq!(parse_float(&json!(".")), None);
        assert_eq!(parse_float(&json!("+e5")), None);
        assert_eq!(parse_float(&json!("1e999")), None);
    }

    #[test]
    fn long_numeric_looking_strings() {
        let signs = format!("12{}", "e-".repeat(100_000));
        assert_eq!(parse_float(&Value::String(signs)), Some(12.0));

        let fraction = format!("4.{}1 /km2", "0".repeat(200_000));
        assert_eq!(parse_float(&Value::String(fraction)), Some(4.0));
    }
}
