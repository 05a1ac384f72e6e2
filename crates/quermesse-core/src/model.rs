use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The two directions a stock movement can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }

    /// Legacy worksheet label, kept for sheet compatibility.
    #[must_use]
    pub const fn sheet_label(self) -> &'static str {
        match self {
            Self::Increase => "Alta",
            Self::Decrease => "Baixa",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseEnumError;

    /// Accepts both the native names and the legacy worksheet labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "increase" | "alta" => Ok(Self::Increase),
            "decrease" | "baixa" => Ok(Self::Decrease),
            _ => Err(ParseEnumError {
                expected: "direction (increase/decrease)",
                got: s.to_string(),
            }),
        }
    }
}

/// One row of the stock table.
///
/// `name` is the unique key; `quantity` can only change through
/// [`Ledger::apply_movement`](crate::ledger::Ledger::apply_movement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub name: String,
    pub quantity: u64,
    pub unit: String,
}

impl StockItem {
    /// A freshly registered item starts at quantity zero.
    #[must_use]
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 0,
            unit: unit.into(),
        }
    }
}

/// One append-only row of the movement log. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub timestamp: DateTime<Utc>,
    pub item: String,
    pub quantity: u64,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stall: Option<String>,
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
mod tests {
    use super::{Direction, ParseEnumError, StockItem};

    #[test]
    fn direction_round_trips_through_str() {
        for dir in [Direction::Increase, Direction::Decrease] {
            assert_eq!(dir.as_str().parse::<Direction>(), Ok(dir));
        }
    }

    #[test]
    fn direction_accepts_legacy_labels() {
        assert_eq!("Alta".parse::<Direction>(), Ok(Direction::Increase));
        assert_eq!("baixa".parse::<Direction>(), Ok(Direction::Decrease));
    }

    #[test]
    fn direction_rejects_unknown_labels() {
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert_eq!(
            err,
            ParseEnumError {
                expected: "direction (increase/decrease)",
                got: "sideways".into(),
            }
        );
    }

    #[test]
    fn direction_serde_is_lowercase() {
        let json = serde_json::to_string(&Direction::Increase).expect("serialize");
        assert_eq!(json, "\"increase\"");
    }

    #[test]
    fn new_item_starts_empty() {
        let item = StockItem::new("Gelo", "Kg");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit, "Kg");
    }
}
