//! Service layer for NodeBudget
//!
//! The service layer holds the allocation engine on top of the storage
//! layer: deriving amounts from percentages, validating and swapping node
//! sets, and folding the expense ledger into spent/remaining figures.

pub mod allocation;
pub mod ledger;
pub mod node_set;

pub use allocation::{
    build_nodes, derive_allocated_amount, derive_allocations, validate_node_set, AllocationService,
};
pub use ledger::{
    expenses_for_node, orphaned_expenses, progress, remaining, spent_by_node, total_spent,
    DerivedFigures, LedgerService, OverBudgetWarning, RecordOutcome,
};
pub use node_set::{NodeSetEditOutcome, NodeSetService};
