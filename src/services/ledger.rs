//! Expense ledger
//!
//! Spent, remaining and progress are never stored. They are folded from the
//! expense list on every read, so they cannot drift from it. The free
//! functions here are pure; [`LedgerService`] adds the store-backed writes.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::{BudgetNode, Expense, ExpenseId, Money, NodeId};
use crate::storage::BudgetStore;

use super::node_set::live_ids;

/// Sum of the expenses recorded against `node_id`
pub fn spent_by_node(expenses: &[Expense], node_id: NodeId) -> Money {
    expenses
        .iter()
        .filter(|e| e.node_id == node_id)
        .map(|e| e.amount)
        .sum()
}

/// Sum of every expense given, whatever its node
pub fn total_spent(expenses: &[Expense]) -> Money {
    expenses.iter().map(|e| e.amount).sum()
}

/// `spent` as a percent of `allocated`; 0 when nothing is allocated
pub fn progress(spent: Money, allocated: Money) -> f64 {
    spent.percent_of(allocated)
}

/// `allocated - spent`, negative when over budget
pub fn remaining(allocated: Money, spent: Money) -> Money {
    allocated - spent
}

/// Expenses of one node, newest first
pub fn expenses_for_node(expenses: &[Expense], node_id: NodeId) -> Vec<&Expense> {
    let mut list: Vec<&Expense> = expenses.iter().filter(|e| e.node_id == node_id).collect();
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    list
}

/// Expenses that do not belong to any of `nodes`
pub fn orphaned_expenses<'e>(expenses: &'e [Expense], nodes: &[BudgetNode]) -> Vec<&'e Expense> {
    let live = live_ids(nodes);
    expenses.iter().filter(|e| !live.contains(&e.node_id)).collect()
}

/// Figures derived for one node or for the whole budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFigures {
    pub allocated: Money,
    pub spent: Money,
    pub remaining: Money,
    /// Percent of `allocated` already spent
    pub progress: f64,
}

impl DerivedFigures {
    pub fn new(allocated: Money, spent: Money) -> Self {
        Self {
            allocated,
            spent,
            remaining: remaining(allocated, spent),
            progress: progress(spent, allocated),
        }
    }

    /// Figures for one node
    pub fn for_node(node: &BudgetNode, expenses: &[Expense]) -> Self {
        Self::new(node.allocated_amount, spent_by_node(expenses, node.id))
    }

    /// Figures for the budget total over the live ledger
    pub fn for_total(total: Money, expenses: &[Expense]) -> Self {
        Self::new(total, total_spent(expenses))
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Raised when an expense would take a node past its allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverBudgetWarning {
    pub node_name: String,
    pub allocated: Money,
    /// Spent on the node before this expense
    pub spent: Money,
    pub amount: Money,
}

impl OverBudgetWarning {
    /// How far past the allocation the node would be
    pub fn over_by(&self) -> Money {
        self.spent + self.amount - self.allocated
    }
}

impl fmt::Display for OverBudgetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recording {} on '{}' exceeds its allocation of {} by {}",
            self.amount,
            self.node_name,
            self.allocated,
            self.over_by()
        )
    }
}

/// What happened to a record request
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Written, with the warning that was accepted, if any
    Recorded {
        expense: Expense,
        warning: Option<OverBudgetWarning>,
    },
    /// The confirmation callback declined the warning; nothing was written
    Declined { warning: OverBudgetWarning },
}

impl RecordOutcome {
    pub fn expense(&self) -> Option<&Expense> {
        match self {
            Self::Recorded { expense, .. } => Some(expense),
            Self::Declined { .. } => None,
        }
    }
}

/// Service for expense writes
pub struct LedgerService<'a> {
    store: &'a dyn BudgetStore,
}

impl<'a> LedgerService<'a> {
    pub fn new(store: &'a dyn BudgetStore) -> Self {
        Self { store }
    }

    /// Expenses belonging to `nodes`, newest first
    pub fn live_expenses(&self, nodes: &[BudgetNode]) -> NodeBudgetResult<Vec<Expense>> {
        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.store.list_expenses(&ids)
    }

    /// Record an expense against `node`
    ///
    /// When it would push the node past its allocation, `confirm` is asked
    /// first and a `false` answer writes nothing.
    pub fn record_expense<F>(
        &self,
        node: &BudgetNode,
        item_name: &str,
        amount: Money,
        note: Option<String>,
        confirm: F,
    ) -> NodeBudgetResult<RecordOutcome>
    where
        F: FnOnce(&OverBudgetWarning) -> bool,
    {
        let expense = Expense::new(node.id, item_name, amount, note);
        expense
            .validate()
            .map_err(|e| NodeBudgetError::InvalidInput(e.to_string()))?;

        let spent = spent_by_node(&self.store.list_expenses(&[node.id])?, node.id);
        let projected = spent.checked_add(amount).ok_or_else(|| {
            NodeBudgetError::InvalidInput(format!(
                "Recording {} on '{}' would overflow its spent total of {}",
                amount, node.name, spent
            ))
        })?;

        let warning = if projected > node.allocated_amount {
            let warning = OverBudgetWarning {
                node_name: node.name.clone(),
                allocated: node.allocated_amount,
                spent,
                amount,
            };
            if !confirm(&warning) {
                debug!(node = %node.name, "Over-budget expense declined");
                return Ok(RecordOutcome::Declined { warning });
            }
            Some(warning)
        } else {
            None
        };

        let expense = self.store.insert_expense(expense)?;
        info!(
            expense_id = %expense.id,
            node = %node.name,
            amount = %expense.amount,
            over_budget = warning.is_some(),
            "Recorded expense"
        );

        Ok(RecordOutcome::Recorded { expense, warning })
    }

    /// Delete one expense
    pub fn delete_expense(&self, id: ExpenseId) -> NodeBudgetResult<Expense> {
        let expense = self
            .store
            .delete_expense(id)?
            .ok_or_else(|| NodeBudgetError::expense_not_found(id.to_string()))?;
        info!(expense_id = %expense.id, "Deleted expense");
        Ok(expense)
    }

    /// Find an expense by full id or short prefix
    pub fn find_expense(&self, identifier: &str) -> NodeBudgetResult<Expense> {
        let mut matches: Vec<Expense> = self
            .store
            .list_all_expenses()?
            .into_iter()
            .filter(|e| e.id.matches(identifier))
            .collect();

        match matches.len() {
            0 => Err(NodeBudgetError::expense_not_found(identifier)),
            1 => Ok(matches.remove(0)),
            n => Err(NodeBudgetError::InvalidInput(format!(
                "'{}' matches {} expenses; use a longer id",
                identifier, n
            ))),
        }
    }

    /// Expenses whose node no longer exists in the store
    pub fn orphans(&self) -> NodeBudgetResult<Vec<Expense>> {
        let mut exists: HashMap<NodeId, bool> = HashMap::new();
        let mut orphans = Vec::new();

        for expense in self.store.list_all_expenses()? {
            let live = match exists.get(&expense.node_id) {
                Some(&live) => live,
                None => {
                    let live = self.store.get_node(expense.node_id)?.is_some();
                    exists.insert(expense.node_id, live);
                    live
                }
            };
            if !live {
                orphans.push(expense);
            }
        }

        Ok(orphans)
    }

    /// Delete every orphaned expense, returning what was removed
    pub fn prune_orphans(&self) -> NodeBudgetResult<Vec<Expense>> {
        let orphans = self.orphans()?;

        let mut node_ids: Vec<NodeId> = orphans.iter().map(|e| e.node_id).collect();
        node_ids.sort_by_key(|id| *id.as_uuid());
        node_ids.dedup();

        let mut removed = Vec::with_capacity(orphans.len());
        for node_id in node_ids {
            removed.extend(self.store.delete_expenses_for_node(node_id)?);
        }

        info!(removed = removed.len(), "Pruned orphaned expenses");
        Ok(removed)
    }
}
