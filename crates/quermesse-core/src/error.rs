use std::fmt;

use thiserror::Error;

/// Machine-readable error codes for scripting-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    ItemNotFound,
    InsufficientStock,
    EmptyField,
    DuplicateItem,
    InvalidQuantity,
    StoreWriteFailed,
    LockContention,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::ItemNotFound => "E2001",
            Self::InsufficientStock => "E2002",
            Self::EmptyField => "E2003",
            Self::DuplicateItem => "E2004",
            Self::InvalidQuantity => "E2005",
            Self::StoreWriteFailed => "E5001",
            Self::LockContention => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::ItemNotFound => "Item not found in stock",
            Self::InsufficientStock => "Insufficient stock",
            Self::EmptyField => "Required field is blank",
            Self::DuplicateItem => "Item already registered",
            Self::InvalidQuantity => "Quantity must be positive",
            Self::StoreWriteFailed => "Ledger store write failed",
            Self::LockContention => "Lock contention",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `qm init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .quermesse/config.toml and retry."),
            Self::ItemNotFound => Some("Register the item first with `qm register`."),
            Self::InsufficientStock => Some("Check current stock with `qm report`."),
            Self::EmptyField => Some("Provide a non-blank value and resubmit."),
            Self::DuplicateItem => Some("Use `qm in` to add stock to an existing item."),
            Self::InvalidQuantity => Some("Use a whole number of at least 1."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `qm` process releases its lock."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Recoverable, user-facing ledger failures.
///
/// Every variant is a rejected form submission, not a crash: the session
/// state is untouched and the caller can re-submit with corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("item '{item}' not found in stock")]
    ItemNotFound { item: String },

    #[error("insufficient stock for '{item}': have {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: u64,
        requested: u64,
    },

    #[error("field '{field}' must not be blank")]
    EmptyField { field: &'static str },

    #[error("item '{item}' is already registered")]
    DuplicateItem { item: String },

    #[error("quantity must be a positive integer")]
    InvalidQuantity,
}

impl LedgerError {
    /// Machine-readable code associated with this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            Self::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            Self::EmptyField { .. } => ErrorCode::EmptyField,
            Self::DuplicateItem { .. } => ErrorCode::DuplicateItem,
            Self::InvalidQuantity => ErrorCode::InvalidQuantity,
        }
    }

    /// Remediation hint for terminal output.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or("Re-submit with corrected input.")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, LedgerError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::ItemNotFound,
            ErrorCode::InsufficientStock,
            ErrorCode::EmptyField,
            ErrorCode::DuplicateItem,
            ErrorCode::InvalidQuantity,
            ErrorCode::StoreWriteFailed,
            ErrorCode::LockContention,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::InsufficientStock.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn ledger_error_maps_to_stable_codes() {
        let err = LedgerError::ItemNotFound {
            item: "Gelo".into(),
        };
        assert_eq!(err.error_code().code(), "E2001");
        assert!(err.to_string().contains("Gelo"));

        let err = LedgerError::InsufficientStock {
            item: "Fogaça".into(),
            available: 2,
            requested: 5,
        };
        assert_eq!(err.error_code().code(), "E2002");
        assert!(err.suggestion().contains("qm report"));
    }
}
