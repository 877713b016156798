//! Budget model
//!
//! A budget is the fixed total being split across category nodes. The total
//! is set once at initialization and never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;

/// The total sum being allocated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Total amount to allocate; always positive
    pub total_amount: Money,

    /// When the budget was created
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    ///
    /// Fails with [`BudgetValidationError::NonPositiveTotal`] for zero or
    /// negative totals and [`BudgetValidationError::TotalTooLarge`] above
    /// [`Money::MAX_AMOUNT`].
    pub fn new(total_amount: Money) -> Result<Self, BudgetValidationError> {
        let budget = Self {
            id: BudgetId::new(),
            total_amount,
            created_at: Utc::now(),
        };
        budget.validate()?;
        Ok(budget)
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.total_amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveTotal(self.total_amount));
        }
        if self.total_amount.exceeds_max() {
            return Err(BudgetValidationError::TotalTooLarge(self.total_amount));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Budget {} (total {})", self.id, self.total_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveTotal(Money),
    TotalTooLarge(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveTotal(amount) => {
                write!(f, "Budget total must be greater than zero (got {})", amount)
            }
            Self::TotalTooLarge(amount) => {
                write!(f, "Budget total {} exceeds the maximum of {}", amount, Money::MAX_AMOUNT)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_budget() {
        let budget = Budget::new(Money::from_units(10_000)).unwrap();
        assert_eq!(budget.total_amount.cents(), 1_000_000);
    }

    #[test]
    fn test_rejects_non_positive_total() {
        assert_eq!(
            Budget::new(Money::zero()),
            Err(BudgetValidationError::NonPositiveTotal(Money::zero()))
        );
        assert!(Budget::new(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_rejects_total_above_max() {
        assert!(Budget::new(Money::MAX_AMOUNT).is_ok());
        let huge = Money::parse("90000000000000000").unwrap();
        assert_eq!(
            Budget::new(huge),
            Err(BudgetValidationError::TotalTooLarge(huge))
        );
    }

    #[test]
    fn test_serialization() {
        let budget = Budget::new(Money::from_cents(999)).unwrap();
        let json = serde_json::to_string(&budget).unwrap();
        let back: Budget = serde_json::from_str(&json).unwrap();
        assert_eq!(budget, back);
    }
}
