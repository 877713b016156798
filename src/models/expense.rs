//! Expense model
//!
//! An expense is owned by exactly one node. Node set edits never re-point it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, NodeId};
use super::money::Money;

/// A recorded spend against a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// The node this expense was recorded against
    pub node_id: NodeId,

    /// What was bought
    pub item_name: String,

    /// Always positive
    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense, normalizing the item name and note
    ///
    /// A blank note becomes `None`.
    pub fn new(
        node_id: NodeId,
        item_name: impl Into<String>,
        amount: Money,
        note: Option<String>,
    ) -> Self {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            id: ExpenseId::new(),
            node_id,
            item_name: item_name.into().trim().to_string(),
            amount,
            note,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.item_name.trim().is_empty() {
            return Err(ExpenseValidationError::BlankItemName);
        }
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }
        if self.amount.exceeds_max() {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_name, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    BlankItemName,
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankItemName => write!(f, "Item name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be greater than zero (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Expense amount {} exceeds the maximum of {}", amount, Money::MAX_AMOUNT)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
