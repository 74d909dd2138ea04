//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text so that string order is date order
//! and a month is a contiguous key range. Timestamps are RFC 3339 strings.

use chrono::{DateTime, Utc};
use seis_core::{
  aggregate::{DailyStat, MonthlyStat},
  date::{DateKey, MonthKey},
};

use crate::{Error, Result};

// ─── DateKey / MonthKey ──────────────────────────────────────────────────────

pub fn encode_date(d: DateKey) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<DateKey> {
  s.parse()
    .map_err(|e: seis_core::Error| Error::CorruptRow(e.to_string()))
}

pub fn decode_month(s: &str) -> Result<MonthKey> {
  s.parse()
    .map_err(|e: seis_core::Error| Error::CorruptRow(e.to_string()))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn decode_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::CorruptRow(format!("negative count {n}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values from a `GROUP BY date` or `GROUP BY month` row.
pub struct RawGroup {
  pub key:   String,
  pub min:   f64,
  pub max:   f64,
  pub count: i64,
}

impl RawGroup {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      key:   row.get(0)?,
      min:   row.get(1)?,
      max:   row.get(2)?,
      count: row.get(3)?,
    })
  }

  pub fn into_daily(self) -> Result<DailyStat> {
    Ok(DailyStat {
      date:  decode_date(&self.key)?,
      min:   self.min,
      max:   self.max,
      count: decode_count(self.count)?,
    })
  }

  pub fn into_monthly(self) -> Result<MonthlyStat> {
    Ok(MonthlyStat {
      month: decode_month(&self.key)?,
      min:   self.min,
      max:   self.max,
      count: decode_count(self.count)?,
    })
  }
}
