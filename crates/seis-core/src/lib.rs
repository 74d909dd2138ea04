//! Core types and pure logic for the seismic reading store.
//!
//! Holds the date-token rules, the line parser, the day/month aggregation
//! and the [`store::ReadingStore`] trait. Free of HTTP and database
//! dependencies so the server and the terminal client share one parser.

pub mod aggregate;
pub mod date;
pub mod error;
pub mod page;
pub mod parse;
pub mod reading;
pub mod store;

pub use error::{Error, Result};
