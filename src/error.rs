//! Custom error types for NodeBudget
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::ValidationError;

/// The main error type for NodeBudget operations
#[derive(Error, Debug)]
pub enum NodeBudgetError {
    /// A budget total that is zero or negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A proposed node set failed validation (blank name, bad percentage sum)
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// The old node set was deleted but the new one was never written
    #[error(
        "Node set edit left budget {budget_id} without categories: {reason}. \
         Re-enter the categories to recover"
    )]
    PartialApplyFailure { budget_id: String, reason: String },

    /// Invalid expense fields
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The underlying persistence call failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A budget already exists for this session
    #[error("A budget is already active ({0}); budgets cannot be re-initialized")]
    AlreadyInitialized(String),

    /// An operation needed a budget but none has been initialized
    #[error("No active budget. Run 'nodebudget init <amount>' first")]
    NoActiveBudget,
}

impl NodeBudgetError {
    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget nodes
    pub fn node_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Node",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error raised before any mutation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_) | Self::InvalidAmount(_) | Self::InvalidInput(_)
        )
    }

    /// Check if the store may be left in an inconsistent state
    pub fn is_partial_apply(&self) -> bool {
        matches!(self, Self::PartialApplyFailure { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for NodeBudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NodeBudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for NodeBudget operations
pub type NodeBudgetResult<T> = Result<T, NodeBudgetError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Percentage;

    #[test]
    fn test_error_display() {
        let err = NodeBudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = NodeBudgetError::node_not_found("Needs");
        assert_eq!(err.to_string(), "Node not found: Needs");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_error_wraps() {
        let err: NodeBudgetError = ValidationError::PercentageSum {
            total: Percentage::from_basis_points(9998),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_partial_apply());
        assert_eq!(
            err.to_string(),
            "Validation failed: Percentages must total 100% (currently 99.98%)"
        );
    }

    #[test]
    fn test_partial_apply_is_distinct() {
        let err = NodeBudgetError::PartialApplyFailure {
            budget_id: "bud-1234abcd".into(),
            reason: "disk full".into(),
        };
        assert!(err.is_partial_apply());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NodeBudgetError = io_err.into();
        assert!(matches!(err, NodeBudgetError::Io(_)));
    }
}
