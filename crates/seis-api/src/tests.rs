//! Router tests against an in-memory SQLite store.

use std::{io, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use seis_core::{
  aggregate::{DailyStat, MonthlyStat, PeriodStat},
  date::Period,
  page::{Page, PageRequest},
  reading::Reading,
  store::ReadingStore,
};
use seis_store_sqlite::SqliteStore;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::api_router;

const BOUNDARY: &str = "seis-test-boundary";

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

fn multipart_body(field: &str, content: &str) -> String {
  format!(
    "--{BOUNDARY}\r\n\
     Content-Disposition: form-data; name=\"{field}\"; filename=\"data.txt\"\r\n\
     Content-Type: text/plain\r\n\
     \r\n\
     {content}\r\n\
     --{BOUNDARY}--\r\n"
  )
}

async fn upload(app: &Router, field: &str, content: &str) -> (StatusCode, Value) {
  let req = Request::builder()
    .method("POST")
    .uri("/load-data")
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    )
    .body(Body::from(multipart_body(field, content)))
    .unwrap();
  send(app, req).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, json)
}

const SAMPLE: &str = "\
20230115 12.5 8.3 -999 99.9
20230116 4.0 1000 abc
20231301 7.0
20230201 3.0 6.0
";

// ── Welcome ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_returns_welcome() {
  let app = app().await;
  let (status, body) = get(&app, "/").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Welcome to this route");
}

// ── Upload ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_stores_readings_and_reports_warnings() {
  let app = app().await;
  let (status, body) = upload(&app, "file", SAMPLE).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["count"], 5);
  assert!(body["message"].is_string());
  assert_eq!(
    body["warnings"],
    serde_json::json!(["Line 3: Invalid date skipped (20231301)"])
  );
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
  let app = app().await;
  let (status, body) = upload(&app, "other", SAMPLE).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "No file uploaded");

  let (_, daily) = get(&app, "/stats/daily").await;
  assert_eq!(daily["meta"]["total"], 0);
}

#[tokio::test]
async fn upload_that_is_not_multipart_is_rejected() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/load-data")
    .header(header::CONTENT_TYPE, "text/plain")
    .body(Body::from(SAMPLE))
    .unwrap();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_with_no_valid_readings_stores_nothing() {
  let app = app().await;
  let (status, body) = upload(&app, "file", "12.5 8.3\n").await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["count"], 0);
  assert_eq!(body["warnings"], serde_json::json!([]));
}

#[tokio::test]
async fn upload_with_byte_order_mark_keeps_first_line() {
  let app = app().await;
  let (status, body) = upload(&app, "file", "\u{FEFF}20230115 12.5 8.3\n20230116 4.0\n").await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["count"], 3);

  let (_, day) = get(&app, "/stats/day/2023/01/15").await;
  assert_eq!(day["count"], 2);
  assert_eq!(day["max"], 12.5);
}

// ── Daily / monthly lists ────────────────────────────────────────────────────

#[tokio::test]
async fn daily_after_upload() {
  let app = app().await;
  upload(&app, "file", SAMPLE).await;

  let (status, body) = get(&app, "/stats/daily").await;
  assert_eq!(status, StatusCode::OK);
  let page: Page<DailyStat> = serde_json::from_value(body).unwrap();
  assert_eq!(page.meta.total, 3);
  assert_eq!(page.meta.page, 1);
  assert_eq!(page.meta.total_pages, 1);

  let first = &page.data[0];
  assert_eq!(first.date.to_string(), "2023-02-01");
  assert_eq!((first.min, first.max, first.count), (3.0, 6.0, 2));
  let last = &page.data[2];
  assert_eq!(last.date.to_string(), "2023-01-15");
  assert_eq!((last.min, last.max, last.count), (8.3, 12.5, 2));
}

#[tokio::test]
async fn daily_paging_params() {
  let app = app().await;
  upload(&app, "file", SAMPLE).await;

  let (status, body) = get(&app, "/stats/daily?page=2&limit=2").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["meta"]["page"], 2);
  assert_eq!(body["meta"]["totalPages"], 2);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
  assert_eq!(body["data"][0]["date"], "2023-01-15");
}

#[tokio::test]
async fn bad_paging_params_are_rejected() {
  let app = app().await;
  for uri in [
    "/stats/daily?page=0",
    "/stats/daily?limit=0",
    "/stats/daily?page=abc",
    "/stats/monthly?page=-1",
  ] {
    let (status, body) = get(&app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert!(body["error"].is_string(), "{uri}");
  }
}

#[tokio::test]
async fn monthly_after_upload() {
  let app = app().await;
  upload(&app, "file", SAMPLE).await;

  let (status, body) = get(&app, "/stats/monthly").await;
  assert_eq!(status, StatusCode::OK);
  let page: Page<MonthlyStat> = serde_json::from_value(body).unwrap();
  assert_eq!(page.meta.total, 2);
  let jan = &page.data[1];
  assert_eq!(jan.month.to_string(), "2023-01");
  assert_eq!((jan.min, jan.max, jan.count), (4.0, 12.5, 3));
}

// ── Single period ────────────────────────────────────────────────────────────

#[tokio::test]
async fn month_lookup() {
  let app = app().await;
  upload(&app, "file", SAMPLE).await;

  let (status, body) = get(&app, "/stats/month/2023/01").await;
  assert_eq!(status, StatusCode::OK);
  let stat: PeriodStat = serde_json::from_value(body).unwrap();
  assert_eq!(stat.period, "2023-01");
  assert_eq!((stat.min, stat.max, stat.count), (Some(4.0), Some(12.5), 3));
}

#[tokio::test]
async fn day_lookup() {
  let app = app().await;
  upload(&app, "file", SAMPLE).await;

  let (status, body) = get(&app, "/stats/day/2023/1/15").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["period"], "2023-01-15");
  assert_eq!(body["count"], 2);
  assert_eq!(body["min"], 8.3);
  assert_eq!(body["max"], 12.5);
}

#[tokio::test]
async fn empty_period_returns_nulls() {
  let app = app().await;
  let (status, body) = get(&app, "/stats/month/2030/06").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 0);
  assert!(body["min"].is_null());
  assert!(body["max"].is_null());
}

#[tokio::test]
async fn out_of_range_path_params_are_rejected() {
  let app = app().await;
  for uri in [
    "/stats/month/2023/13",
    "/stats/month/2023/0",
    "/stats/day/2023/01/32",
    "/stats/day/2023/xx/01",
  ] {
    let (status, _) = get(&app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
  }
}

// ── Store failure ────────────────────────────────────────────────────────────

struct FailingStore;

fn disk_full() -> io::Error { io::Error::other("disk full") }

impl ReadingStore for FailingStore {
  type Error = io::Error;

  async fn insert_readings(&self, _readings: Vec<Reading>) -> io::Result<usize> {
    Err(disk_full())
  }

  async fn daily_page(&self, _req: PageRequest) -> io::Result<Page<DailyStat>> {
    Err(disk_full())
  }

  async fn monthly_page(&self, _req: PageRequest) -> io::Result<Page<MonthlyStat>> {
    Err(disk_full())
  }

  async fn period_stat(&self, _period: Period) -> io::Result<PeriodStat> {
    Err(disk_full())
  }

  async fn count_readings(&self) -> io::Result<u64> { Err(disk_full()) }
}

#[tokio::test]
async fn store_failure_is_a_generic_500() {
  let app = api_router(Arc::new(FailingStore));

  let (status, body) = upload(&app, "file", SAMPLE).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["error"], "internal server error");

  let (status, _) = get(&app, "/stats/daily").await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
