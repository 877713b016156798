//! Audit log records
//!
//! One record per store mutation. Node sets are only ever written whole, so a
//! node set record carries both complete sets and the node count on each side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Budget, BudgetId, BudgetNode, Expense};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    /// A whole node set was swapped for a new one
    Replace,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Replace => write!(f, "REPLACE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Budget,
    /// All nodes of one budget; the entity id is the budget id
    NodeSet,
    Expense,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Budget => write!(f, "Budget"),
            EntityType::NodeSet => write!(f, "NodeSet"),
            EntityType::Expense => write!(f, "Expense"),
        }
    }
}

/// Node counts on either side of a node set write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCount {
    pub before: usize,
    pub after: usize,
}

impl NodeCount {
    /// Nodes gained (positive) or lost (negative)
    pub fn delta(&self) -> i64 {
        self.after as i64 - self.before as i64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Item name for expenses, "Name pct" list for node sets, total for budgets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Only set on node set records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<NodeCount>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            label: None,
            before: None,
            after: None,
            nodes: None,
        }
    }

    pub fn budget_created(budget: &Budget) -> Self {
        let mut entry = Self::new(Operation::Create, EntityType::Budget, budget.id.to_string());
        entry.label = Some(format!("total {}", budget.total_amount));
        entry.after = snapshot(budget);
        entry
    }

    pub fn node_set_created(budget_id: BudgetId, inserted: &[BudgetNode]) -> Self {
        Self::node_set(Operation::Create, budget_id, &[], inserted)
    }

    pub fn node_set_replaced(
        budget_id: BudgetId,
        removed: &[BudgetNode],
        inserted: &[BudgetNode],
    ) -> Self {
        Self::node_set(Operation::Replace, budget_id, removed, inserted)
    }

    pub fn node_set_deleted(budget_id: BudgetId, removed: &[BudgetNode]) -> Self {
        Self::node_set(Operation::Delete, budget_id, removed, &[])
    }

    fn node_set(
        operation: Operation,
        budget_id: BudgetId,
        before: &[BudgetNode],
        after: &[BudgetNode],
    ) -> Self {
        let mut entry = Self::new(operation, EntityType::NodeSet, budget_id.to_string());

        let shown = if operation == Operation::Delete { before } else { after };
        if !shown.is_empty() {
            entry.label = Some(node_names(shown));
        }
        if operation != Operation::Create {
            entry.before = snapshot(before);
        }
        if operation != Operation::Delete {
            entry.after = snapshot(after);
        }
        entry.nodes = Some(NodeCount {
            before: before.len(),
            after: after.len(),
        });
        entry
    }

    pub fn expense_created(expense: &Expense) -> Self {
        let mut entry = Self::new(Operation::Create, EntityType::Expense, expense.id.to_string());
        entry.label = Some(expense.item_name.clone());
        entry.after = snapshot(expense);
        entry
    }

    pub fn expense_deleted(expense: &Expense) -> Self {
        let mut entry = Self::new(Operation::Delete, EntityType::Expense, expense.id.to_string());
        entry.label = Some(expense.item_name.clone());
        entry.before = snapshot(expense);
        entry
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(label) = &self.label {
            output.push_str(&format!(" ({})", label));
        }

        if let Some(count) = self.nodes {
            output.push_str(&format!(
                "\n  {} node(s) -> {} node(s) ({:+})",
                count.before,
                count.after,
                count.delta()
            ));
        }

        output
    }
}

fn snapshot<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

fn node_names(nodes: &[BudgetNode]) -> String {
    nodes
        .iter()
        .map(|n| format!("{} {}", n.name, n.percentage))
        .collect::<Vec<_>>()
        .join(", ")
}
