//! SQLite-backed store.
//!
//! Same load/save contract as the worksheet store, with one difference that
//! matters: `save` rewrites both tables inside a single transaction, so a
//! crash mid-save can never leave stock and movement history disagreeing.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while a writer commits
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `foreign_keys = ON` to protect relational integrity

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

use crate::ledger::Ledger;
use crate::lock::StoreLock;
use crate::model::{Direction, Movement, StockItem};
use crate::store::LedgerStore;

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS estoque (
    item       TEXT PRIMARY KEY,
    quantidade INTEGER NOT NULL CHECK (quantidade >= 0),
    unidade    TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS movimentacoes (
    seq     INTEGER PRIMARY KEY AUTOINCREMENT,
    data    TEXT NOT NULL,
    item    TEXT NOT NULL,
    quantidade INTEGER NOT NULL CHECK (quantidade > 0),
    tipo    TEXT NOT NULL CHECK (tipo IN ('increase', 'decrease')),
    barraca TEXT
) STRICT;
";

/// Ledger store backed by a single SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Open (or create) the database, apply runtime pragmas, and ensure the
    /// schema exists.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store directory {}", parent.display()))?;
        }

        let conn = Connection::open(&self.path)
            .with_context(|| format!("open ledger database {}", self.path.display()))?;

        conn.pragma_update(None, "foreign_keys", "ON")
            .context("enable foreign keys")?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .context("set synchronous pragma")?;
        let _journal_mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .context("enable WAL journal mode")?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)
            .context("set busy timeout")?;

        conn.execute_batch(SCHEMA).context("apply ledger schema")?;
        Ok(conn)
    }
}

impl LedgerStore for SqliteStore {
    fn load(&self) -> Result<Ledger> {
        let conn = self.open()?;

        let mut stock = Vec::new();
        let mut stmt = conn
            .prepare("SELECT item, quantidade, unidade FROM estoque ORDER BY rowid")
            .context("prepare stock query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .context("query stock rows")?;
        for row in rows {
            let (name, quantity, unit) = row.context("read stock row")?;
            stock.push(StockItem {
                name,
                quantity: u64::try_from(quantity).context("negative stock quantity in store")?,
                unit,
            });
        }

        let mut movements = Vec::new();
        let mut stmt = conn
            .prepare("SELECT data, item, quantidade, tipo, barraca FROM movimentacoes ORDER BY seq")
            .context("prepare movements query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })
            .context("query movement rows")?;
        for row in rows {
            let (data, item, quantity, tipo, barraca) = row.context("read movement row")?;
            let timestamp = DateTime::parse_from_rfc3339(&data)
                .with_context(|| format!("parse movement timestamp '{data}'"))?
                .with_timezone(&Utc);
            let direction: Direction = tipo
                .parse()
                .with_context(|| format!("parse movement direction '{tipo}'"))?;
            movements.push(Movement {
                timestamp,
                item,
                quantity: u64::try_from(quantity)
                    .context("non-positive movement quantity in store")?,
                direction,
                stall: barraca,
            });
        }

        Ok(Ledger { stock, movements })
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let _lock = StoreLock::acquire(&self.lock_path(), StoreLock::DEFAULT_TIMEOUT)
            .context("acquire store lock for save")?;

        let mut conn = self.open()?;
        let tx = conn.transaction().context("begin save transaction")?;

        tx.execute("DELETE FROM estoque", [])
            .context("clear stock table")?;
        tx.execute("DELETE FROM movimentacoes", [])
            .context("clear movements table")?;

        {
            let mut stmt = tx
                .prepare("INSERT INTO estoque (item, quantidade, unidade) VALUES (?1, ?2, ?3)")
                .context("prepare stock insert")?;
            for item in &ledger.stock {
                stmt.execute(rusqlite::params![
                    item.name,
                    i64::try_from(item.quantity).context("stock quantity exceeds store range")?,
                    item.unit,
                ])
                .with_context(|| format!("insert stock row '{}'", item.name))?;
            }

            let mut stmt = tx
                .prepare(
                    "INSERT INTO movimentacoes (data, item, quantidade, tipo, barraca)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .context("prepare movement insert")?;
            for movement in &ledger.movements {
                stmt.execute(rusqlite::params![
                    movement.timestamp.to_rfc3339(),
                    movement.item,
                    i64::try_from(movement.quantity)
                        .context("movement quantity exceeds store range")?,
                    movement.direction.as_str(),
                    movement.stall,
                ])
                .with_context(|| format!("insert movement row for '{}'", movement.item))?;
            }
        }

        tx.commit().context("commit save transaction")?;

        debug!(
            path = %self.path.display(),
            items = ledger.stock.len(),
            movements = ledger.movements.len(),
            "saved ledger database"
        );
        Ok(())
    }
}
