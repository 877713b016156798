//! Core data models for NodeBudget
//!
//! This module contains the data structures of the allocation domain:
//! the budget, its category nodes, expenses, and the fixed-point money and
//! percentage types they are built on.

pub mod budget;
pub mod expense;
pub mod ids;
pub mod money;
pub mod node;
pub mod percentage;

pub use budget::{Budget, BudgetValidationError};
pub use expense::{Expense, ExpenseValidationError};
pub use ids::{BudgetId, ExpenseId, NodeId};
pub use money::{Money, MoneyParseError};
pub use node::{BudgetNode, DefaultNode, NodeProposal, ValidationError};
pub use percentage::{Percentage, PercentageParseError};
