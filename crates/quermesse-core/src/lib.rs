//! quermesse-core library.
//!
//! Ledger model and update logic for the fair's inventory: a stock table,
//! an append-only movement log, the stores that persist them, and the CSV
//! stock report.
//!
//! # Conventions
//!
//! - **Errors**: domain failures are [`error::LedgerError`] (recoverable,
//!   user-facing); store and config plumbing uses `anyhow::Result` with
//!   context.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod error;
pub mod ledger;
pub mod lock;
pub mod model;
pub mod report;
pub mod store;

pub use error::{ErrorCode, LedgerError};
pub use ledger::Ledger;
pub use model::{Direction, Movement, StockItem};
pub use store::{LedgerStore, MemoryStore, SheetStore, SqliteStore};
