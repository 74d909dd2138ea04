//! The `ReadingStore` trait.
//!
//! Implemented by storage backends (e.g. `seis-store-sqlite`). The API layer
//! depends on this abstraction, never on a concrete backend. A store handle
//! is built once at startup and passed to whoever needs it.

use std::future::Future;

use crate::{
  aggregate::{DailyStat, MonthlyStat, PeriodStat},
  date::Period,
  page::{Page, PageRequest},
  reading::Reading,
};

/// Durable storage of readings plus the aggregate queries served over HTTP.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ReadingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `readings` in one all-or-nothing batch and return how many
  /// rows were written.
  fn insert_readings(
    &self,
    readings: Vec<Reading>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Day statistics, newest first.
  fn daily_page(
    &self,
    req: PageRequest,
  ) -> impl Future<Output = Result<Page<DailyStat>, Self::Error>> + Send + '_;

  /// Month statistics, newest first.
  fn monthly_page(
    &self,
    req: PageRequest,
  ) -> impl Future<Output = Result<Page<MonthlyStat>, Self::Error>> + Send + '_;

  /// Min / max / count for one day or month. An empty period is not an
  /// error.
  fn period_stat(
    &self,
    period: Period,
  ) -> impl Future<Output = Result<PeriodStat, Self::Error>> + Send + '_;

  /// Total number of stored readings.
  fn count_readings(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
