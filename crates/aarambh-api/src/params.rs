//! Lenient numeric parsing for query strings and loosely-typed JSON fields.
//!
//! Clients send counts as numbers, numeric strings, or strings with trailing
//! junk (`"5px"`). The leading integer wins; anything unparseable or not
//! positive falls back to a default.

use serde_json::Value;

/// Parse the leading base-10 integer of `s`, skipping leading whitespace.
/// `None` when there are no digits; out-of-range values saturate.
pub fn leading_int(s: &str) -> Option<i64> {
  let s = s.trim_start();
  let (negative, digits) = match s.as_bytes().first() {
    Some(b'-') => (true, &s[1..]),
    Some(b'+') => (false, &s[1..]),
    _ => (false, s),
  };
  let end = digits
    .bytes()
    .position(|b| !b.is_ascii_digit())
    .unwrap_or(digits.len());
  if end == 0 {
    return None;
  }
  // Only digits remain, so a parse failure means overflow.
  Some(match digits[..end].parse::<i64>() {
    Ok(magnitude) if negative => -magnitude,
    Ok(magnitude) => magnitude,
    Err(_) if negative => i64::MIN,
    Err(_) => i64::MAX,
  })
}

/// A positive count from a query parameter, or `default`.
pub fn positive_count(raw: Option<&str>, default: usize) -> usize {
  raw
    .and_then(leading_int)
    .filter(|n| *n > 0)
    .and_then(|n| usize::try_from(n).ok())
    .unwrap_or(default)
}

/// A positive integer from a JSON number or numeric string, or `default`.
pub fn positive_points(raw: Option<&Value>, default: i64) -> i64 {
  let parsed = match raw {
    Some(Value::Number(n)) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
    Some(Value::String(s)) => leading_int(s),
    _ => None,
  };
  parsed.filter(|n| *n > 0).unwrap_or(default)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn leading_int_takes_the_prefix() {
    assert_eq!(leading_int("42"), Some(42));
    assert_eq!(leading_int("  7abc"), Some(7));
    assert_eq!(leading_int("-3"), Some(-3));
    assert_eq!(leading_int("+8"), Some(8));
    assert_eq!(leading_int("abc"), None);
    assert_eq!(leading_int(""), None);
    assert_eq!(leading_int("-"), None);
    assert_eq!(leading_int("99999999999999999999"), Some(i64::MAX));
    assert_eq!(leading_int("-99999999999999999999"), Some(i64::MIN));
  }

  #[test]
  fn counts_default_unless_positive() {
    assert_eq!(positive_count(None, 10), 10);
    assert_eq!(positive_count(Some("3"), 10), 3);
    assert_eq!(positive_count(Some("0"), 10), 10);
    assert_eq!(positive_count(Some("-5"), 10), 10);
    assert_eq!(positive_count(Some("many"), 10), 10);
  }

  #[test]
  fn points_accept_numbers_and_strings() {
    assert_eq!(positive_points(Some(&json!(5)), 1), 5);
    assert_eq!(positive_points(Some(&json!(2.9)), 1), 2);
    assert_eq!(positive_points(Some(&json!("12")), 1), 12);
    assert_eq!(positive_points(Some(&json!(0)), 1), 1);
    assert_eq!(positive_points(Some(&json!(-4)), 1), 1);
    assert_eq!(positive_points(Some(&json!(true)), 1), 1);
    assert_eq!(positive_points(Some(&Value::Null), 1), 1);
    assert_eq!(positive_points(None, 1), 1);
    assert_eq!(positive_points(Some(&json!("9223372036854775807")), 1), i64::MAX);
  }
}
