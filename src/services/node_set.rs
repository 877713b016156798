//! Node set edit transaction
//!
//! A budget's nodes are only ever changed as a whole set: validate, derive
//! every amount from the budget total, then swap the old set for the new one.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::{BudgetId, BudgetNode, Money, NodeId, NodeProposal};
use crate::storage::{BudgetStore, ReplaceError};

use super::allocation::{build_nodes, validate_node_set};

/// Result of a successful node set edit
#[derive(Debug, Clone)]
pub struct NodeSetEditOutcome {
    /// The new node set, ordered by position
    pub nodes: Vec<BudgetNode>,

    /// Expenses that pointed at the replaced nodes and now belong to no node
    pub orphaned_expenses: usize,
}

/// Service for replacing a budget's node set
pub struct NodeSetService<'a> {
    store: &'a dyn BudgetStore,
}

impl<'a> NodeSetService<'a> {
    pub fn new(store: &'a dyn BudgetStore) -> Self {
        Self { store }
    }

    /// Replace every node of `budget_id` with `proposed`
    ///
    /// Allocated amounts are recomputed from `total_amount`, and every node
    /// gets a fresh id. An invalid proposal is rejected before the store is
    /// touched, and so is a failure while reading the current set. Once the
    /// store has committed the swap the edit never returns an error. If the
    /// store deletes the old set but fails to insert the new one the error is
    /// [`NodeBudgetError::PartialApplyFailure`].
    pub fn apply_node_set_edit(
        &self,
        budget_id: BudgetId,
        total_amount: Money,
        proposed: &[NodeProposal],
    ) -> NodeBudgetResult<NodeSetEditOutcome> {
        validate_node_set(proposed)?;

        let nodes = build_nodes(budget_id, total_amount, proposed);

        // Counted before the swap so that nothing after the commit can fail
        let current: Vec<NodeId> = self
            .store
            .list_nodes(budget_id)?
            .iter()
            .map(|n| n.id)
            .collect();
        let orphaned_expenses = if current.is_empty() {
            0
        } else {
            self.store.list_expenses(&current)?.len()
        };

        let replacement = match self.store.replace_nodes(budget_id, nodes) {
            Ok(replacement) => replacement,
            Err(ReplaceError::NotApplied(e)) => return Err(e),
            Err(ReplaceError::DeletedNotInserted { removed, source }) => {
                warn!(
                    budget_id = %budget_id,
                    removed = removed.len(),
                    error = %source,
                    "Node set deleted but replacement was not written"
                );
                return Err(NodeBudgetError::PartialApplyFailure {
                    budget_id: budget_id.to_string(),
                    reason: source.to_string(),
                });
            }
        };

        info!(
            budget_id = %budget_id,
            removed = replacement.removed.len(),
            inserted = replacement.inserted.len(),
            orphaned_expenses,
            "Applied node set edit"
        );

        Ok(NodeSetEditOutcome {
            nodes: replacement.inserted,
            orphaned_expenses,
        })
    }
}

/// Ids of `nodes` as a lookup set
pub(crate) fn live_ids(nodes: &[BudgetNode]) -> HashSet<NodeId> {
    nodes.iter().map(|n| n.id).collect()
}
