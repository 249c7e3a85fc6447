//! Phasegate Core — rebuilds a daily portfolio balance sheet from a trade ledger.
//!
//! This crate contains the pure reconstruction engine:
//! - Domain types (trade events, holdings, daily snapshots, run records)
//! - Business-day calendar (Mon–Fri, holidays deliberately not modeled)
//! - Price resolution with "latest at or before date" semantics
//! - Ledger normalization into independent buy/sell event streams
//! - Daily timeline reconstruction with entry-price fallback valuation
//!
//! Everything here is a pure function over in-memory inputs: no clock reads,
//! no network, no disk. The evaluation horizon (`as_of`) is always a parameter.

pub mod calendar;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod prices;
pub mod sources;
pub mod timeline;
