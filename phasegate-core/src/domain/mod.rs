//! Domain types: ledger rows, derived holdings, output snapshots, telemetry.

pub mod holding;
pub mod run;
pub mod snapshot;
pub mod trade;

pub use holding::{Holding, HoldingBook};
pub use run::{RunRecord, RunStatus};
pub use snapshot::{round_cents, BalanceSnapshot, DailySnapshot};
pub use trade::{TradeEvent, TradeSide, TradeStatus};
