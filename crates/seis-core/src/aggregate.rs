//! Day and month statistics over readings.
//!
//! Every function here is pure. The same functions back the terminal
//! preview; the SQLite store computes the same shapes in SQL.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  date::{DateKey, MonthKey, Period},
  reading::Reading,
};

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Running min / max / count. Empty until the first value is pushed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
  pub min:   Option<f64>,
  pub max:   Option<f64>,
  pub count: u64,
}

impl Summary {
  pub fn push(&mut self, value: f64) {
    self.min = Some(self.min.map_or(value, |m| m.min(value)));
    self.max = Some(self.max.map_or(value, |m| m.max(value)));
    self.count += 1;
  }

  /// Fold another summary in: counts add, extremes combine.
  pub fn merge(&mut self, other: &Summary) {
    if let Some(v) = other.min {
      self.min = Some(self.min.map_or(v, |m| m.min(v)));
    }
    if let Some(v) = other.max {
      self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }
    self.count += other.count;
  }
}

impl FromIterator<f64> for Summary {
  fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
    let mut s = Summary::default();
    for v in iter {
      s.push(v);
    }
    s
  }
}

// ─── Stat rows ───────────────────────────────────────────────────────────────

/// Min / max / count for one day that has readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
  pub date:  DateKey,
  pub min:   f64,
  pub max:   f64,
  pub count: u64,
}

impl DailyStat {
  pub fn summary(&self) -> Summary {
    Summary { min: Some(self.min), max: Some(self.max), count: self.count }
  }
}

/// Min / max / count for one month that has readings. Serialised with the
/// month under `date` so day and month rows share a table shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
  #[serde(rename = "date")]
  pub month: MonthKey,
  pub min:   f64,
  pub max:   f64,
  pub count: u64,
}

/// Result of a single-period lookup. `min` and `max` are `None` and `count`
/// is 0 when nothing falls in the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStat {
  pub period: String,
  pub min:    Option<f64>,
  pub max:    Option<f64>,
  pub count:  u64,
}

impl PeriodStat {
  pub fn new(period: &Period, summary: Summary) -> Self {
    Self {
      period: period.label(),
      min:    summary.min,
      max:    summary.max,
      count:  summary.count,
    }
  }
}

// ─── Grouping ────────────────────────────────────────────────────────────────

/// Summarise day buckets (see [`ParseOutcome::by_day`]), newest first.
/// Days with an empty bucket have no extremes and are left out.
///
/// [`ParseOutcome::by_day`]: crate::parse::ParseOutcome::by_day
pub fn daily_stats(buckets: &BTreeMap<DateKey, Vec<f64>>) -> Vec<DailyStat> {
  buckets
    .iter()
    .rev()
    .filter_map(|(date, values)| {
      let s: Summary = values.iter().copied().collect();
      Some(DailyStat { date: *date, min: s.min?, max: s.max?, count: s.count })
    })
    .collect()
}

/// Roll day rows up into months, newest first. Counts add; min and max are
/// taken over the member days. Months with no rows never appear.
pub fn monthly_stats(days: &[DailyStat]) -> Vec<MonthlyStat> {
  let mut groups: BTreeMap<MonthKey, Summary> = BTreeMap::new();
  for d in days {
    groups.entry(d.date.month_key()).or_default().merge(&d.summary());
  }
  groups
    .into_iter()
    .rev()
    .filter_map(|(month, s)| {
      Some(MonthlyStat { month, min: s.min?, max: s.max?, count: s.count })
    })
    .collect()
}

/// Min / max / count over the readings that fall in `period`.
pub fn period_stat(readings: &[Reading], period: Period) -> PeriodStat {
  let summary = readings
    .iter()
    .filter(|r| period.contains(r.date))
    .map(|r| r.frequency)
    .collect();
  PeriodStat::new(&period, summary)
}

/// Keep day rows whose `YYYY-MM-DD` text contains `term`.
pub fn filter_daily(days: &[DailyStat], term: &str) -> Vec<DailyStat> {
  let term = term.trim();
  days
    .iter()
    .filter(|d| d.date.to_string().contains(term))
    .copied()
    .collect()
}
