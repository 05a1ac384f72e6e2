//! Durable homes for the ledger.
//!
//! A store is the sole durable owner of the two tables. The contract is
//! deliberately coarse: `load` returns a full in-memory [`Ledger`], `save`
//! overwrites everything. One user action equals one load-mutate-save cycle;
//! concurrent sessions race and the last save wins.

pub mod memory;
pub mod sheet;
pub mod sqlite;

use anyhow::Result;

use crate::ledger::Ledger;

pub use memory::MemoryStore;
pub use sheet::SheetStore;
pub use sqlite::SqliteStore;

/// Load/save interface over the two ledger tables.
pub trait LedgerStore {
    /// Read both tables into a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or parsed.
    fn load(&self) -> Result<Ledger>;

    /// Overwrite both tables with the session's state (full rewrite,
    /// not incremental).
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be written.
    fn save(&self, ledger: &Ledger) -> Result<()>;
}
