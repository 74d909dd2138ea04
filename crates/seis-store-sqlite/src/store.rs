//! [`SqliteStore`] — the SQLite implementation of [`ReadingStore`].

use std::path::Path;

use chrono::Utc;
use seis_core::{
  aggregate::{DailyStat, MonthlyStat, PeriodStat, Summary},
  date::Period,
  page::{Page, PageRequest},
  reading::Reading,
  store::ReadingStore,
};

use crate::{
  Result,
  encode::{RawGroup, decode_count, encode_date, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A reading store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `key, MIN, MAX, COUNT` grouping query for one page, plus the
  /// matching `COUNT(DISTINCT key)` for the pager.
  async fn grouped_page(
    &self,
    group_sql: &'static str,
    total_sql: &'static str,
    req: PageRequest,
  ) -> Result<(Vec<RawGroup>, u64)> {
    let limit_val = i64::from(req.limit);
    let offset_val = i64::try_from(req.offset()).unwrap_or(i64::MAX);

    let (rows, total): (Vec<RawGroup>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(total_sql, [], |r| r.get(0))?;
        let mut stmt = conn.prepare(group_sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val, offset_val], RawGroup::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((rows, total))
      })
      .await?;

    Ok((rows, decode_count(total)?))
  }
}

// ─── ReadingStore impl ───────────────────────────────────────────────────────

impl ReadingStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_readings(&self, readings: Vec<Reading>) -> Result<usize> {
    let recorded_at = encode_dt(Utc::now());
    let rows: Vec<(String, f64)> = readings
      .iter()
      .map(|r| (encode_date(r.date), r.frequency))
      .collect();
    let n = rows.len();

    // One transaction for the whole batch; any failing row rolls back all.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO readings (date, frequency, recorded_at) VALUES (?1, ?2, ?3)",
          )?;
          for (date, frequency) in &rows {
            stmt.execute(rusqlite::params![date, frequency, recorded_at])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(count = n, "inserted readings");
    Ok(n)
  }

  async fn daily_page(&self, req: PageRequest) -> Result<Page<DailyStat>> {
    let (raws, total) = self
      .grouped_page(
        "SELECT date, MIN(frequency), MAX(frequency), COUNT(*)
         FROM readings
         GROUP BY date
         ORDER BY date DESC
         LIMIT ?1 OFFSET ?2",
        "SELECT COUNT(DISTINCT date) FROM readings",
        req,
      )
      .await?;

    let data = raws
      .into_iter()
      .map(RawGroup::into_daily)
      .collect::<Result<_>>()?;
    Ok(Page::new(data, total, req))
  }

  async fn monthly_page(&self, req: PageRequest) -> Result<Page<MonthlyStat>> {
    let (raws, total) = self
      .grouped_page(
        "SELECT substr(date, 1, 7) AS month, MIN(frequency), MAX(frequency), COUNT(*)
         FROM readings
         GROUP BY month
         ORDER BY month DESC
         LIMIT ?1 OFFSET ?2",
        "SELECT COUNT(DISTINCT substr(date, 1, 7)) FROM readings",
        req,
      )
      .await?;

    let data = raws
      .into_iter()
      .map(RawGroup::into_monthly)
      .collect::<Result<_>>()?;
    Ok(Page::new(data, total, req))
  }

  async fn period_stat(&self, period: Period) -> Result<PeriodStat> {
    let bounds = period.bounds();
    let start = encode_date(*bounds.start());
    let end = encode_date(*bounds.end());

    let (min, max, count): (Option<f64>, Option<f64>, i64) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MIN(frequency), MAX(frequency), COUNT(*)
           FROM readings
           WHERE date BETWEEN ?1 AND ?2",
          rusqlite::params![start, end],
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?)
      })
      .await?;

    let summary = Summary { min, max, count: decode_count(count)? };
    Ok(PeriodStat::new(&period, summary))
  }

  async fn count_readings(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM readings", [], |r| r.get(0))?)
      })
      .await?;
    decode_count(n)
  }
}
