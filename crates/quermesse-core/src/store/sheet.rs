//! Worksheet-style store: two CSV files in a data directory.
//!
//! Mirrors the legacy spreadsheet layout the fair has been exporting for
//! years: worksheets named `Estoque` and `Movimentacoes`, Portuguese column
//! headers, `Alta`/`Baixa` direction labels, and naive local-looking
//! timestamps. Reads are keyed by header; writes clear and rewrite the whole
//! worksheet including the header row.
//!
//! Saving rewrites the two files one after the other with no atomicity
//! across them. A crash between the writes can leave stock and movement
//! history inconsistent — accepted limitation of the worksheet format; the
//! SQLite store closes it.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ledger::Ledger;
use crate::lock::StoreLock;
use crate::model::{Direction, Movement, StockItem};
use crate::store::LedgerStore;

/// Worksheet file name for the stock table.
pub const STOCK_SHEET: &str = "Estoque.csv";
/// Worksheet file name for the movement log.
pub const MOVEMENTS_SHEET: &str = "Movimentacoes.csv";

/// Timestamp format used in the legacy `Data` column.
const SHEET_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize, Deserialize)]
struct StockRow {
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Quantidade")]
    quantity: u64,
    #[serde(rename = "Unidade")]
    unit: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MovementRow {
    #[serde(rename = "Data")]
    timestamp: String,
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Quantidade")]
    quantity: u64,
    #[serde(rename = "Tipo")]
    direction: String,
    #[serde(rename = "Barraca")]
    stall: String,
}

/// CSV-pair store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct SheetStore {
    dir: PathBuf,
}

impl SheetStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn stock_path(&self) -> PathBuf {
        self.dir.join(STOCK_SHEET)
    }

    #[must_use]
    pub fn movements_path(&self) -> PathBuf {
        self.dir.join(MOVEMENTS_SHEET)
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(".store.lock")
    }

    fn load_stock(&self) -> Result<Vec<StockItem>> {
        let path = self.stock_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("open stock worksheet {}", path.display()))?;

        let mut stock = Vec::new();
        for row in reader.deserialize() {
            let row: StockRow =
                row.with_context(|| format!("parse stock row in {}", path.display()))?;
            stock.push(StockItem {
                name: row.item,
                quantity: row.quantity,
                unit: row.unit,
            });
        }
        Ok(stock)
    }

    fn load_movements(&self) -> Result<Vec<Movement>> {
        let path = self.movements_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("open movements worksheet {}", path.display()))?;

        let mut movements = Vec::new();
        for row in reader.deserialize() {
            let row: MovementRow =
                row.with_context(|| format!("parse movement row in {}", path.display()))?;

            let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, SHEET_TS_FORMAT)
                .with_context(|| format!("parse movement timestamp '{}'", row.timestamp))?
                .and_utc();
            let direction: Direction = row
                .direction
                .parse()
                .with_context(|| format!("parse movement direction '{}'", row.direction))?;

            movements.push(Movement {
                timestamp,
                item: row.item,
                quantity: row.quantity,
                direction,
                stall: if row.stall.is_empty() {
                    None
                } else {
                    Some(row.stall)
                },
            });
        }
        Ok(movements)
    }

    fn write_stock(&self, stock: &[StockItem], path: &Path) -> Result<()> {
        // Header is written unconditionally so an empty table still leaves a
        // well-formed worksheet behind.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("rewrite stock worksheet {}", path.display()))?;
        writer
            .write_record(["Item", "Quantidade", "Unidade"])
            .context("write stock header")?;
        for item in stock {
            writer.serialize(StockRow {
                item: item.name.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
            })?;
        }
        writer.flush().context("flush stock worksheet")?;
        Ok(())
    }

    fn write_movements(&self, movements: &[Movement], path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("rewrite movements worksheet {}", path.display()))?;
        writer
            .write_record(["Data", "Item", "Quantidade", "Tipo", "Barraca"])
            .context("write movements header")?;
        for movement in movements {
            writer.serialize(MovementRow {
                timestamp: movement.timestamp.format(SHEET_TS_FORMAT).to_string(),
                item: movement.item.clone(),
                quantity: movement.quantity,
                direction: movement.direction.sheet_label().to_string(),
                stall: movement.stall.clone().unwrap_or_default(),
            })?;
        }
        writer.flush().context("flush movements worksheet")?;
        Ok(())
    }
}

impl LedgerStore for SheetStore {
    fn load(&self) -> Result<Ledger> {
        Ok(Ledger {
            stock: self.load_stock()?,
            movements: self.load_movements()?,
        })
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create store directory {}", self.dir.display()))?;

        let _lock = StoreLock::acquire(&self.lock_path(), StoreLock::DEFAULT_TIMEOUT)
            .context("acquire store lock for save")?;

        // Two separate worksheet rewrites, stock first (matches the legacy
        // save order). No atomicity across the pair.
        self.write_stock(&ledger.stock, &self.stock_path())?;
        self.write_movements(&ledger.movements, &self.movements_path())?;

        debug!(
            dir = %self.dir.display(),
            items = ledger.stock.len(),
            movements = ledger.movements.len(),
            "saved worksheets"
        );
        Ok(())
    }
}
