//! Async HTTP client wrapping the seis JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{
  Client, Response,
  multipart::{Form, Part},
};
use seis_core::{
  aggregate::{DailyStat, MonthlyStat, PeriodStat},
  date::Period,
  page::{Page, PageRequest},
};
use serde::{Deserialize, de::DeserializeOwned};

/// Body of a successful `POST /api/load-data`. The server's `warnings` are
/// not kept; the client prints its own from the same parser.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
  pub message: String,
  pub count:   usize,
}

/// Async HTTP client for the seis JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  // ── Upload ────────────────────────────────────────────────────────────────

  /// `POST /api/load-data` with the file in the `file` multipart field.
  pub async fn upload(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadResponse> {
    let part = Part::bytes(contents)
      .file_name(file_name.to_owned())
      .mime_str("text/plain")
      .context("building multipart part")?;
    let form = Form::new().part("file", part);

    let resp = self
      .client
      .post(self.url("/load-data"))
      .multipart(form)
      .send()
      .await
      .context("POST /load-data failed")?;
    decode(resp, "POST /load-data").await
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  /// `GET /api/stats/daily?page=<n>&limit=<n>`
  pub async fn daily(&self, req: PageRequest) -> Result<Page<DailyStat>> {
    self.paged("/stats/daily", req).await
  }

  /// `GET /api/stats/monthly?page=<n>&limit=<n>`
  pub async fn monthly(&self, req: PageRequest) -> Result<Page<MonthlyStat>> {
    self.paged("/stats/monthly", req).await
  }

  /// `GET /api/stats/day/{y}/{m}/{d}` or `GET /api/stats/month/{y}/{m}`
  pub async fn period(&self, period: Period) -> Result<PeriodStat> {
    let path = period_path(&period);
    let resp = self
      .client
      .get(self.url(&path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    decode(resp, &path).await
  }

  async fn paged<T: DeserializeOwned>(&self, path: &str, req: PageRequest) -> Result<T> {
    let resp = self
      .client
      .get(self.url(path))
      .query(&[("page", req.page), ("limit", req.limit)])
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    decode(resp, path).await
  }
}

fn period_path(period: &Period) -> String {
  match period {
    Period::Day(d) => {
      format!("/stats/day/{:04}/{:02}/{:02}", d.year(), d.month(), d.day())
    }
    Period::Month(m) => format!("/stats/month/{:04}/{:02}", m.year(), m.month()),
  }
}

/// Deserialise a success body, or turn the API's `{"error": ...}` body into
/// an error message.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let detail = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
      .unwrap_or_default();
    return Err(anyhow!("{what} → {status} {detail}"));
  }
  resp.json().await.with_context(|| format!("deserialising {what}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_base_and_prefix() {
    let c = ApiClient::new("http://localhost:9797/").unwrap();
    assert_eq!(c.url("/stats/daily"), "http://localhost:9797/api/stats/daily");
  }

  #[test]
  fn period_paths_are_zero_padded() {
    let day = Period::Day("2023-01-05".parse().unwrap());
    assert_eq!(period_path(&day), "/stats/day/2023/01/05");
    let month = Period::Month("2023-11".parse().unwrap());
    assert_eq!(period_path(&month), "/stats/month/2023/11");
  }
}
