//! Handlers for `/stats` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stats/daily` | `?page` (1-based) and `?limit` (default 10) |
//! | `GET`  | `/stats/monthly` | Same paging as daily |
//! | `GET`  | `/stats/month/{year}/{month}` | Single-month lookup |
//! | `GET`  | `/stats/day/{year}/{month}/{day}` | Single-day lookup |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use seis_core::{
  aggregate::{DailyStat, MonthlyStat, PeriodStat},
  date::{DateKey, MonthKey, Period},
  page::{DEFAULT_PAGE_LIMIT, Page, PageRequest},
  store::ReadingStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Paging ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct PageParams {
  pub page:  Option<u32>,
  pub limit: Option<u32>,
}

impl PageParams {
  fn into_request(self) -> Result<PageRequest, ApiError> {
    if self.page == Some(0) {
      return Err(ApiError::BadRequest("page starts at 1".into()));
    }
    if self.limit == Some(0) {
      return Err(ApiError::BadRequest("limit must be positive".into()));
    }
    Ok(PageRequest::new(
      self.page.unwrap_or(1),
      self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    ))
  }
}

fn page_request(
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<PageRequest, ApiError> {
  let Query(params) =
    params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  params.into_request()
}

// ─── Lists ───────────────────────────────────────────────────────────────────

/// `GET /stats/daily[?page=N][&limit=N]`
pub async fn daily<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<DailyStat>>, ApiError>
where
  S: ReadingStore,
{
  let req = page_request(params)?;
  let page = store.daily_page(req).await.map_err(ApiError::store)?;
  Ok(Json(page))
}

/// `GET /stats/monthly[?page=N][&limit=N]`
pub async fn monthly<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<MonthlyStat>>, ApiError>
where
  S: ReadingStore,
{
  let req = page_request(params)?;
  let page = store.monthly_page(req).await.map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Single period ───────────────────────────────────────────────────────────

/// `GET /stats/month/{year}/{month}`
pub async fn month<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<(u16, u8)>, PathRejection>,
) -> Result<Json<PeriodStat>, ApiError>
where
  S: ReadingStore,
{
  let Path((year, month)) =
    path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let period = Period::Month(MonthKey::new(year, month)?);
  let stat = store.period_stat(period).await.map_err(ApiError::store)?;
  Ok(Json(stat))
}

/// `GET /stats/day/{year}/{month}/{day}`
pub async fn day<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<(u16, u8, u8)>, PathRejection>,
) -> Result<Json<PeriodStat>, ApiError>
where
  S: ReadingStore,
{
  let Path((year, month, day)) =
    path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let period = Period::Day(DateKey::new(year, month, day)?);
  let stat = store.period_stat(period).await.map_err(ApiError::store)?;
  Ok(Json(stat))
}
