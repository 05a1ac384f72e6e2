//! Ledger session object and the two mutating operations.
//!
//! A [`Ledger`] is a transient in-memory copy of the two durable tables
//! (stock and movements). Callers load one from a store, mutate it through
//! [`Ledger::register_item`] / [`Ledger::apply_movement`], and save it back —
//! one full load-mutate-save cycle per user action. Failed operations leave
//! the session untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerError;
use crate::model::{Direction, Movement, StockItem};

/// The pair of tables representing current inventory and its change history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub stock: Vec<StockItem>,
    pub movements: Vec<Movement>,
}

impl Ledger {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stock: Vec::new(),
            movements: Vec::new(),
        }
    }

    /// Look up a stock item by name.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&StockItem> {
        self.stock.iter().find(|item| item.name == name)
    }

    /// Returns `true` when no items have been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    /// Register a new stock item with quantity zero. A copy of the stored
    /// row is returned.
    ///
    /// Name and unit are trimmed before the presence check; the stored
    /// values keep the trimmed form.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyField`] if `name` or `unit` is blank.
    /// - [`LedgerError::DuplicateItem`] if the name is already registered.
    pub fn register_item(&mut self, name: &str, unit: &str) -> Result<StockItem, LedgerError> {
        let name = name.trim();
        let unit = unit.trim();

        if name.is_empty() {
            return Err(LedgerError::EmptyField { field: "name" });
        }
        if unit.is_empty() {
            return Err(LedgerError::EmptyField { field: "unit" });
        }
        if self.item(name).is_some() {
            return Err(LedgerError::DuplicateItem { item: name.into() });
        }

        debug!(item = name, unit, "registering stock item");
        let item = StockItem::new(name, unit);
        self.stock.push(item.clone());
        Ok(item)
    }

    /// Apply an increase/decrease movement, timestamped with the current
    /// UTC time. See [`Ledger::apply_movement_at`] for the full contract.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::apply_movement_at`].
    pub fn apply_movement(
        &mut self,
        item: &str,
        quantity: u64,
        direction: Direction,
        stall: Option<&str>,
    ) -> Result<Movement, LedgerError> {
        self.apply_movement_at(item, quantity, direction, stall, Utc::now())
    }

    /// Apply a movement with an explicit timestamp.
    ///
    /// On success the stock row is mutated and exactly one movement row is
    /// appended — together or not at all. A copy of the appended movement is
    /// returned. A blank `stall` is recorded as absent.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidQuantity`] if `quantity` is zero.
    /// - [`LedgerError::ItemNotFound`] if `item` is not registered.
    /// - [`LedgerError::InsufficientStock`] if a decrease would take the
    ///   quantity below zero. No mutation, no log entry.
    pub fn apply_movement_at(
        &mut self,
        item: &str,
        quantity: u64,
        direction: Direction,
        stall: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<Movement, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        let Some(row) = self.stock.iter_mut().find(|row| row.name == item) else {
            return Err(LedgerError::ItemNotFound { item: item.into() });
        };

        match direction {
            Direction::Increase => {
                row.quantity += quantity;
            }
            Direction::Decrease => {
                if row.quantity < quantity {
                    return Err(LedgerError::InsufficientStock {
                        item: item.into(),
                        available: row.quantity,
                        requested: quantity,
                    });
                }
                row.quantity -= quantity;
            }
        }

        debug!(
            item,
            quantity,
            direction = direction.as_str(),
            remaining = row.quantity,
            "applied stock movement"
        );

        let movement = Movement {
            timestamp,
            item: item.into(),
            quantity,
            direction,
            stall: stall
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        };
        self.movements.push(movement.clone());
        Ok(movement)
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Ledger, LedgerError};
    use chrono::{TimeZone, Utc};

    fn fair_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.register_item("Fogaça", "Kg").expect("register");
        ledger
            .apply_movement("Fogaça", 10, Direction::Increase, None)
            .expect("stock up");
        ledger
    }

    #[test]
    fn register_item_round_trip() {
        let mut ledger = Ledger::new();
        ledger.register_item("Gelo", "Kg").expect("register");

        let item = ledger.item("Gelo").expect("item present");
        assert_eq!(item.name, "Gelo");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit, "Kg");
    }

    #[test]
    fn register_item_trims_whitespace() {
        let mut ledger = Ledger::new();
        ledger.register_item("  Gelo ", " Kg ").expect("register");
        assert!(ledger.item("Gelo").is_some());
    }

    #[test]
    fn register_rejects_blank_fields() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.register_item("  ", "Kg"),
            Err(LedgerError::EmptyField { field: "name" })
        );
        assert_eq!(
            ledger.register_item("Gelo", ""),
            Err(LedgerError::EmptyField { field: "unit" })
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut ledger = Ledger::new();
        ledger.register_item("Gelo", "Kg").expect("register");
        assert_eq!(
            ledger.register_item("Gelo", "Lata"),
            Err(LedgerError::DuplicateItem {
                item: "Gelo".into()
            })
        );
        assert_eq!(ledger.stock.len(), 1);
    }

    #[test]
    fn increase_adds_exactly_and_logs_once() {
        let mut ledger = Ledger::new();
        ledger.register_item("Milho", "Unid").expect("register");

        ledger
            .apply_movement("Milho", 7, Direction::Increase, None)
            .expect("increase");

        assert_eq!(ledger.item("Milho").expect("item").quantity, 7);
        assert_eq!(ledger.movements.len(), 1);
        assert_eq!(ledger.movements[0].direction, Direction::Increase);
        assert_eq!(ledger.movements[0].quantity, 7);
    }

    #[test]
    fn decrease_scenario_from_the_fair() {
        // {Fogaça: 10 Kg} − 3 for the Pizza stall ⇒ {Fogaça: 7 Kg}.
        let mut ledger = fair_ledger();

        let movement = ledger
            .apply_movement("Fogaça", 3, Direction::Decrease, Some("Pizza"))
            .expect("decrease");

        assert_eq!(ledger.item("Fogaça").expect("item").quantity, 7);
        assert_eq!(movement.direction, Direction::Decrease);
        assert_eq!(movement.quantity, 3);
        assert_eq!(movement.stall.as_deref(), Some("Pizza"));
        // one register-time increase + this decrease
        assert_eq!(ledger.movements.len(), 2);
    }

    #[test]
    fn insufficient_stock_leaves_session_untouched() {
        let mut ledger = fair_ledger();
        let before = ledger.clone();

        let err = ledger
            .apply_movement("Fogaça", 11, Direction::Decrease, Some("Pizza"))
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                item: "Fogaça".into(),
                available: 10,
                requested: 11,
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn decrease_to_exactly_zero_is_allowed() {
        let mut ledger = fair_ledger();
        ledger
            .apply_movement("Fogaça", 10, Direction::Decrease, None)
            .expect("drain");
        assert_eq!(ledger.item("Fogaça").expect("item").quantity, 0);
    }

    #[test]
    fn unknown_item_fails_without_state_change() {
        let mut ledger = fair_ledger();
        let before = ledger.clone();

        let err = ledger
            .apply_movement("Unknown", 1, Direction::Increase, None)
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::ItemNotFound {
                item: "Unknown".into()
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut ledger = fair_ledger();
        let before = ledger.clone();

        assert_eq!(
            ledger.apply_movement("Fogaça", 0, Direction::Increase, None),
            Err(LedgerError::InvalidQuantity)
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn blank_stall_is_recorded_as_absent() {
        let mut ledger = fair_ledger();
        let movement = ledger
            .apply_movement("Fogaça", 1, Direction::Decrease, Some("  "))
            .expect("decrease");
        assert!(movement.stall.is_none());
    }

    #[test]
    fn explicit_timestamp_is_preserved() {
        let mut ledger = fair_ledger();
        let ts = Utc.with_ymd_and_hms(2024, 6, 23, 18, 30, 0).single().expect("valid ts");

        let movement = ledger
            .apply_movement_at("Fogaça", 2, Direction::Decrease, Some("Sopa"), ts)
            .expect("decrease");

        assert_eq!(movement.timestamp, ts);
        assert_eq!(ledger.movements.last().expect("row").timestamp, ts);
    }
}
