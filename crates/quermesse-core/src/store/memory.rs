use anyhow::Result;
use std::sync::{Mutex, PoisonError};

use crate::ledger::Ledger;
use crate::store::LedgerStore;

/// In-process store for tests and embedding. No durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing ledger.
    #[must_use]
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Ledger> {
        let guard = self
            .ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let mut guard = self
            .ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = ledger.clone();
        Ok(())
    }
}
