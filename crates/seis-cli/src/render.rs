//! Plain-text tables for statistics rows.

use std::fmt::Write as _;

use seis_core::{
  aggregate::{
    DailyStat, MonthlyStat, PeriodStat, daily_stats, filter_daily, monthly_stats,
  },
  parse::ParseOutcome,
};

/// One table row: a day, a month, or a looked-up period.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
  pub label: String,
  pub min:   Option<f64>,
  pub max:   Option<f64>,
  pub count: u64,
}

impl From<&DailyStat> for Row {
  fn from(d: &DailyStat) -> Self {
    Self { label: d.date.to_string(), min: Some(d.min), max: Some(d.max), count: d.count }
  }
}

impl From<&MonthlyStat> for Row {
  fn from(m: &MonthlyStat) -> Self {
    Self { label: m.month.to_string(), min: Some(m.min), max: Some(m.max), count: m.count }
  }
}

impl From<&PeriodStat> for Row {
  fn from(p: &PeriodStat) -> Self {
    Self { label: p.period.clone(), min: p.min, max: p.max, count: p.count }
  }
}

/// Rows for a locally parsed file: days whose text contains `search`,
/// newest first, optionally rolled up into months.
pub fn local_rows(outcome: &ParseOutcome, monthly: bool, search: Option<&str>) -> Vec<Row> {
  let mut days = daily_stats(&outcome.by_day());
  if let Some(term) = search {
    days = filter_daily(&days, term);
  }
  if monthly {
    monthly_stats(&days).iter().map(Row::from).collect()
  } else {
    days.iter().map(Row::from).collect()
  }
}

/// Text for a min / max cell; `-` when the period is empty.
pub fn cell(v: Option<f64>) -> String {
  v.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

/// `false` when there are no rows or every row is an empty period.
pub fn has_data<'a>(rows: impl IntoIterator<Item = &'a Row>) -> bool {
  rows.into_iter().any(|r| r.count > 0)
}

pub fn render_table(rows: &[Row]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{:<12} {:>10} {:>10} {:>8}", "PERIOD", "MIN", "MAX", "COUNT");
  if !has_data(rows) {
    out.push_str("no data\n");
    return out;
  }
  for r in rows {
    let _ = writeln!(
      out,
      "{:<12} {:>10} {:>10} {:>8}",
      r.label,
      cell(r.min),
      cell(r.max),
      r.count
    );
  }
  out
}
