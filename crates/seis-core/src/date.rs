//! Calendar keys for readings.
//!
//! Date tokens are checked with a loose rule: month in `1..=12`, day in
//! `1..=31`, with no days-per-month or leap-year check. A [`DateKey`] can
//! therefore name a day that does not exist (`2023-02-30`). Such keys are
//! stored and reported exactly as written; they are never rolled over into
//! the following month.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Length of a `YYYYMMDD` date token.
pub const DATE_TOKEN_LEN: usize = 8;

/// Returns `true` if `token` is exactly eight ASCII digits naming a
/// plausible date (month `1..=12`, day `1..=31`).
pub fn is_valid_date_token(token: &str) -> bool {
  DateKey::from_token(token).is_some()
}

/// Returns `true` if `token` has the shape of a date token, valid or not.
pub fn is_date_shaped(token: &str) -> bool {
  token.len() == DATE_TOKEN_LEN && token.bytes().all(|b| b.is_ascii_digit())
}

fn all_digits(s: &str, len: usize) -> bool {
  s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

// ─── DateKey ─────────────────────────────────────────────────────────────────

/// A day-granularity key for a reading, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
  year:  u16,
  month: u8,
  day:   u8,
}

impl DateKey {
  pub fn new(year: u16, month: u8, day: u8) -> Result<Self> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
      return Err(Error::InvalidDate(format!("{year:04}-{month:02}-{day:02}")));
    }
    Ok(Self { year, month, day })
  }

  /// Decode a `YYYYMMDD` token. `None` if the token is not eight digits or
  /// fails the month/day bounds.
  pub fn from_token(token: &str) -> Option<Self> {
    if !is_date_shaped(token) {
      return None;
    }
    let year = token[0..4].parse().ok()?;
    let month = token[4..6].parse().ok()?;
    let day = token[6..8].parse().ok()?;
    Self::new(year, month, day).ok()
  }

  pub fn year(&self) -> u16 { self.year }

  pub fn month(&self) -> u8 { self.month }

  pub fn day(&self) -> u8 { self.day }

  pub fn month_key(&self) -> MonthKey {
    MonthKey { year: self.year, month: self.month }
  }
}

impl fmt::Display for DateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
  }
}

impl FromStr for DateKey {
  type Err = Error;

  /// Parse the `YYYY-MM-DD` form produced by [`Display`](fmt::Display).
  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidDate(s.to_owned());
    let mut parts = s.split('-');
    let (Some(y), Some(m), Some(d), None) =
      (parts.next(), parts.next(), parts.next(), parts.next())
    else {
      return Err(invalid());
    };
    if !all_digits(y, 4) || !all_digits(m, 2) || !all_digits(d, 2) {
      return Err(invalid());
    }
    let year = y.parse().map_err(|_| invalid())?;
    let month = m.parse().map_err(|_| invalid())?;
    let day = d.parse().map_err(|_| invalid())?;
    Self::new(year, month, day)
  }
}

impl Serialize for DateKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for DateKey {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── MonthKey ────────────────────────────────────────────────────────────────

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
  year:  u16,
  month: u8,
}

impl MonthKey {
  pub fn new(year: u16, month: u8) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(Error::InvalidMonth(format!("{year:04}-{month:02}")));
    }
    Ok(Self { year, month })
  }

  pub fn year(&self) -> u16 { self.year }

  pub fn month(&self) -> u8 { self.month }

  pub fn first_day(&self) -> DateKey {
    DateKey { year: self.year, month: self.month, day: 1 }
  }

  /// Day 31, the highest day any key in this month can carry.
  pub fn last_day(&self) -> DateKey {
    DateKey { year: self.year, month: self.month, day: 31 }
  }

  /// Every key that can fall in this month. Equivalent to the half-open
  /// range up to the first of the next month, since no key has day > 31.
  pub fn days(&self) -> RangeInclusive<DateKey> {
    self.first_day()..=self.last_day()
  }
}

impl fmt::Display for MonthKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

impl FromStr for MonthKey {
  type Err = Error;

  /// Parse the `YYYY-MM` form.
  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidMonth(s.to_owned());
    let (y, m) = s.split_once('-').ok_or_else(invalid)?;
    if !all_digits(y, 4) || !all_digits(m, 2) {
      return Err(invalid());
    }
    let year = y.parse().map_err(|_| invalid())?;
    let month = m.parse().map_err(|_| invalid())?;
    Self::new(year, month)
  }
}

impl Serialize for MonthKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for MonthKey {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// A single day or month used for a point lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
  Day(DateKey),
  Month(MonthKey),
}

impl Period {
  pub fn contains(&self, date: DateKey) -> bool {
    match self {
      Self::Day(d) => *d == date,
      Self::Month(m) => date.month_key() == *m,
    }
  }

  /// Inclusive bounds of the keys in this period.
  pub fn bounds(&self) -> RangeInclusive<DateKey> {
    match self {
      Self::Day(d) => *d..=*d,
      Self::Month(m) => m.days(),
    }
  }

  /// `YYYY-MM-DD` for a day, `YYYY-MM` for a month.
  pub fn label(&self) -> String {
    match self {
      Self::Day(d) => d.to_string(),
      Self::Month(m) => m.to_string(),
    }
  }

  /// Interpret a search term. `YYYY-MM-DD` selects a day and `YYYY-MM` a
  /// month; any other shape is `Ok(None)`. A term with the right shape but
  /// out-of-range fields is an error.
  pub fn parse_search(term: &str) -> Result<Option<Self>> {
    let term = term.trim();
    if !term.is_ascii() {
      return Ok(None);
    }
    match term.len() {
      10 if term.as_bytes()[4] == b'-' && term.as_bytes()[7] == b'-' => {
        if !all_digits(&term[0..4], 4)
          || !all_digits(&term[5..7], 2)
          || !all_digits(&term[8..10], 2)
        {
          return Ok(None);
        }
        term.parse().map(|d| Some(Self::Day(d)))
      }
      7 if term.as_bytes()[4] == b'-' => {
        if !all_digits(&term[0..4], 4) || !all_digits(&term[5..7], 2) {
          return Ok(None);
        }
        term.parse().map(|m| Some(Self::Month(m)))
      }
      _ => Ok(None),
    }
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Day(d) => d.fmt(f),
      Self::Month(m) => m.fmt(f),
    }
  }
}
