//! Line parser for sensor text files.
//!
//! Pipeline, per physical line:
//!   raw line
//!     └─ split_whitespace()    → tokens
//!          └─ scan tokens      → date cursor + readings
//!               └─ `-999`      → rest of the line is ignored
//!
//! The date cursor starts empty on every line. An eight-digit token moves it
//! (or clears it, with a warning, when the date is out of range). Any other
//! token is read as a number and kept if a date is set and the value lies in
//! `(0, 1000)`. Numbers that fail any of those checks are dropped without a
//! warning; only bad date tokens are reported.
//!
//! The server and the terminal client both call [`parse_readings`], so a
//! preview always matches what an upload stores.

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt,
};

use crate::{
  date::{DateKey, is_date_shaped},
  reading::Reading,
};

/// Token that ends the record on its line.
pub const SENTINEL: &str = "-999";

/// Byte-order mark some editors write at the start of a UTF-8 file.
const BOM: char = '\u{FEFF}';

// ─── Output ──────────────────────────────────────────────────────────────────

/// A date token that had eight digits but failed the month/day bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
  /// 1-based physical line number.
  pub line:  usize,
  pub token: String,
}

impl fmt::Display for ParseWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Line {}: Invalid date skipped ({})", self.line, self.token)
  }
}

/// Everything recovered from one input text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
  /// Accepted readings, in input order.
  pub readings: Vec<Reading>,
  /// Every valid date token seen, whether or not readings followed it.
  pub dates:    BTreeSet<DateKey>,
  pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
  /// Readings bucketed by day. Dates seen without readings map to an empty
  /// list.
  pub fn by_day(&self) -> BTreeMap<DateKey, Vec<f64>> {
    let mut buckets: BTreeMap<DateKey, Vec<f64>> =
      self.dates.iter().map(|d| (*d, Vec::new())).collect();
    for r in &self.readings {
      buckets.entry(r.date).or_default().push(r.frequency);
    }
    buckets
  }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse a whole file. Never fails: malformed tokens are dropped or reported
/// in [`ParseOutcome::warnings`]. A leading byte-order mark is ignored.
pub fn parse_readings(text: &str) -> ParseOutcome {
  let text = text.strip_prefix(BOM).unwrap_or(text);
  let mut out = ParseOutcome::default();
  for (idx, line) in text.lines().enumerate() {
    parse_line(line, idx + 1, &mut out);
  }
  out
}

fn parse_line(line: &str, line_no: usize, out: &mut ParseOutcome) {
  let mut current: Option<DateKey> = None;

  for token in line.split_whitespace() {
    if token == SENTINEL {
      break;
    }

    if is_date_shaped(token) {
      current = DateKey::from_token(token);
      match current {
        Some(date) => {
          out.dates.insert(date);
        }
        None => out.warnings.push(ParseWarning {
          line:  line_no,
          token: token.to_owned(),
        }),
      }
      continue;
    }

    let (Some(date), Some(value)) = (current, leading_float(token)) else {
      continue;
    };
    if let Ok(reading) = Reading::new(date, value) {
      out.readings.push(reading);
    }
  }
}

/// Read the longest numeric prefix of `token`, the way a lenient float scan
/// does: `[+-]?digits[.digits][(e|E)[+-]?digits]`. Trailing text after the
/// prefix is ignored. `None` when there is no digit in the mantissa.
pub fn leading_float(token: &str) -> Option<f64> {
  let bytes = token.as_bytes();
  let digits_from = |mut i: usize| {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
      i += 1;
    }
    i
  };

  let mut end = 0;
  if matches!(bytes.first(), Some(b'+' | b'-')) {
    end = 1;
  }
  let int_end = digits_from(end);
  let mut mantissa_digits = int_end - end;
  end = int_end;

  if bytes.get(end) == Some(&b'.') {
    let frac_end = digits_from(end + 1);
    mantissa_digits += frac_end - (end + 1);
    end = frac_end;
  }
  if mantissa_digits == 0 {
    return None;
  }

  if matches!(bytes.get(end), Some(b'e' | b'E')) {
    let mut exp = end + 1;
    if matches!(bytes.get(exp), Some(b'+' | b'-')) {
      exp += 1;
    }
    let exp_end = digits_from(exp);
    if exp_end > exp {
      end = exp_end;
    }
  }

  token[..end].parse().ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> DateKey { s.parse().unwrap() }

  fn values(out: &ParseOutcome) -> Vec<f64> {
    out.readings.iter().map(|r| r.frequency).collect()
  }

  #[test]
  fn sentinel_ends_the_line() {
    let out = parse_readings("20230115 12.5 8.3 -999 99.9");
    assert_eq!(values(&out), vec![12.5, 8.3]);
    assert!(out.readings.iter().all(|r| r.date == date("2023-01-15")));
    assert!(out.warnings.is_empty());
  }

  #[test]
  fn values_without_date_are_dropped_silently() {
    let out = parse_readings("12.5 8.3");
    assert!(out.readings.is_empty());
    assert!(out.warnings.is_empty());
    assert!(out.dates.is_empty());
  }

  #[test]
  fn invalid_date_warns_once_and_clears_cursor() {
    let out = parse_readings("20230115 1.0\n20231301 12.5 8.3");
    assert_eq!(values(&out), vec![1.0]);
    assert_eq!(out.warnings, vec![ParseWarning {
      line:  2,
      token: "20231301".into(),
    }]);
    assert_eq!(
      out.warnings[0].to_string(),
      "Line 2: Invalid date skipped (20231301)"
    );
  }

  #[test]
  fn invalid_date_clears_an_earlier_date_on_the_same_line() {
    let out = parse_readings("20230115 1.0 20230000 2.0 20230116 3.0");
    assert_eq!(out.readings, vec![
      Reading { date: date("2023-01-15"), frequency: 1.0 },
      Reading { date: date("2023-01-16"), frequency: 3.0 },
    ]);
    assert_eq!(out.warnings.len(), 1);
  }

  #[test]
  fn cursor_resets_every_line() {
    let out = parse_readings("20230115 1.0\n2.0 3.0\n20230116 4.0");
    assert_eq!(values(&out), vec![1.0, 4.0]);
  }

  #[test]
  fn bounds_are_exclusive() {
    let out = parse_readings("20230115 1000 0 999.99 0.01 -3 1500");
    assert_eq!(values(&out), vec![999.99, 0.01]);
  }

  #[test]
  fn malformed_numbers_are_dropped_silently() {
    let out = parse_readings("20230115 abc 4.5 NaN -- 6");
    assert_eq!(values(&out), vec![4.5, 6.0]);
    assert!(out.warnings.is_empty());
  }

  #[test]
  fn numeric_prefix_is_read() {
    assert_eq!(leading_float("12.5Hz"), Some(12.5));
    assert_eq!(leading_float("1e2"), Some(100.0));
    assert_eq!(leading_float("1e"), Some(1.0));
    assert_eq!(leading_float(".5"), Some(0.5));
    assert_eq!(leading_float("5."), Some(5.0));
    assert_eq!(leading_float("+7"), Some(7.0));
    assert_eq!(leading_float("-."), None);
    assert_eq!(leading_float("x1"), None);
    assert_eq!(leading_float(""), None);
  }

  #[test]
  fn sentinel_must_match_exactly() {
    // `-999.0` is an ordinary (negative) number, so 5 is still read.
    let out = parse_readings("20230115 -999.0 5");
    assert_eq!(values(&out), vec![5.0]);
  }

  #[test]
  fn crlf_blank_lines_and_line_numbers() {
    let out = parse_readings("20230115 1.0\r\n\r\n   \r\n20239999 2.0\r\n");
    assert_eq!(values(&out), vec![1.0]);
    assert_eq!(out.warnings[0].line, 4);
  }

  #[test]
  fn tabs_and_runs_of_spaces_separate_tokens() {
    let out = parse_readings("  20230115\t\t1.5    2.5 ");
    assert_eq!(values(&out), vec![1.5, 2.5]);
  }

  #[test]
  fn loose_dates_are_accepted() {
    let out = parse_readings("20230230 4.0");
    assert_eq!(out.readings[0].date.to_string(), "2023-02-30");
  }

  #[test]
  fn dates_without_readings_get_empty_buckets() {
    let out = parse_readings("20230115 -999 3.0\n20230116 2.0 4.0");
    let buckets = out.by_day();
    assert_eq!(buckets.len(), 2);
    assert!(buckets[&date("2023-01-15")].is_empty());
    assert_eq!(buckets[&date("2023-01-16")], vec![2.0, 4.0]);
  }

  #[test]
  fn leading_byte_order_mark_is_ignored() {
    let out = parse_readings("\u{FEFF}20230115 12.5 8.3\n20230116 4.0\n");
    assert_eq!(values(&out), vec![12.5, 8.3, 4.0]);
    assert_eq!(out.readings[0].date, date("2023-01-15"));
    assert!(out.warnings.is_empty());
  }

  #[test]
  fn eight_digit_value_is_never_a_reading() {
    // Looks like a value but has date shape; the bad month warns.
    let out = parse_readings("20230115 00001300");
    assert!(out.readings.is_empty());
    assert_eq!(out.warnings.len(), 1);
  }
}
