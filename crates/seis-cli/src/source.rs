//! Where the browse screen gets its rows: the API, or a file parsed locally.

use anyhow::Result;
use seis_core::{
  aggregate::{
    DailyStat, MonthlyStat, PeriodStat, daily_stats, monthly_stats, period_stat,
  },
  date::Period,
  page::{Page, PageRequest},
  parse::ParseOutcome,
  reading::Reading,
};

use crate::client::ApiClient;

/// Day and month rows computed once from a parsed file.
pub struct LocalData {
  readings: Vec<Reading>,
  days:     Vec<DailyStat>,
  months:   Vec<MonthlyStat>,
}

impl LocalData {
  pub fn new(outcome: ParseOutcome) -> Self {
    let days = daily_stats(&outcome.by_day());
    let months = monthly_stats(&days);
    Self { readings: outcome.readings, days, months }
  }
}

pub enum Source {
  Remote(ApiClient),
  Local(LocalData),
}

impl Source {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Remote(_) => "server",
      Self::Local(_) => "local file",
    }
  }

  pub async fn daily(&self, req: PageRequest) -> Result<Page<DailyStat>> {
    match self {
      Self::Remote(client) => client.daily(req).await,
      Self::Local(data) => Ok(Page::from_slice(&data.days, req)),
    }
  }

  pub async fn monthly(&self, req: PageRequest) -> Result<Page<MonthlyStat>> {
    match self {
      Self::Remote(client) => client.monthly(req).await,
      Self::Local(data) => Ok(Page::from_slice(&data.months, req)),
    }
  }

  pub async fn period(&self, period: Period) -> Result<PeriodStat> {
    match self {
      Self::Remote(client) => client.period(period).await,
      Self::Local(data) => Ok(period_stat(&data.readings, period)),
    }
  }
}

#[cfg(test)]
mod tests {
  use seis_core::parse::parse_readings;

  use super::*;

  fn local(text: &str) -> Source { Source::Local(LocalData::new(parse_readings(text))) }

  #[tokio::test]
  async fn local_pages_are_sliced() {
    let src = local("20230101 1\n20230102 2\n20230103 3\n");
    let page = src.daily(PageRequest::new(2, 2)).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].date.to_string(), "2023-01-01");
    assert_eq!((page.meta.total, page.meta.total_pages), (3, 2));
  }

  #[tokio::test]
  async fn local_months_and_lookups() {
    let src = local("20230115 5 9\n20230201 1\n");
    let months = src.monthly(PageRequest::default()).await.unwrap();
    let labels: Vec<String> = months.data.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(labels, ["2023-02", "2023-01"]);

    let jan = src.period(Period::Month("2023-01".parse().unwrap())).await.unwrap();
    assert_eq!((jan.min, jan.max, jan.count), (Some(5.0), Some(9.0), 2));

    let empty = src.period(Period::Day("2023-03-01".parse().unwrap())).await.unwrap();
    assert_eq!((empty.min, empty.count), (None, 0));
  }
}
