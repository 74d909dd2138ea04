//! Error types for `seis-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("invalid month: {0:?}")]
  InvalidMonth(String),

  #[error("frequency {0} is outside the open range (0, 1000)")]
  FrequencyOutOfRange(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
