//! The reading, the atomic fact of the store.
//!
//! A reading is one frequency observation on a calendar day. Readings are
//! never updated once stored.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, date::DateKey};

/// Exclusive lower bound for a frequency.
pub const MIN_FREQUENCY: f64 = 0.0;

/// Exclusive upper bound for a frequency.
pub const MAX_FREQUENCY: f64 = 1000.0;

/// Returns `true` for `0 < value < 1000`. NaN and infinities fail.
pub fn is_valid_frequency(value: f64) -> bool {
  value > MIN_FREQUENCY && value < MAX_FREQUENCY
}

/// One `(date, frequency)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
  pub date:      DateKey,
  pub frequency: f64,
}

impl Reading {
  /// Build a reading, rejecting frequencies outside `(0, 1000)`.
  pub fn new(date: DateKey, frequency: f64) -> Result<Self> {
    if !is_valid_frequency(frequency) {
      return Err(Error::FrequencyOutOfRange(frequency));
    }
    Ok(Self { date, frequency })
  }
}
