//! Storage layer for NodeBudget
//!
//! The core only talks to storage through [`BudgetStore`], a small set of CRUD
//! primitives over the `budgets`, `budget_nodes` and `expenses` collections.
//! [`Storage`] implements it on top of JSON files with atomic writes and an
//! append-only audit log.

pub mod budgets;
pub mod expenses;
pub mod file_io;
pub mod nodes;

pub use budgets::BudgetRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use nodes::NodeRepository;

use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::BudgetPaths;
use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::{Budget, BudgetId, BudgetNode, Expense, ExpenseId, NodeId};

pub(crate) fn lock_error<E: std::fmt::Display>(e: E) -> NodeBudgetError {
    NodeBudgetError::StoreUnavailable(format!("Failed to acquire lock: {}", e))
}

/// Result of a successful node set replacement
#[derive(Debug, Clone)]
pub struct NodeReplacement {
    /// Nodes that were owned by the budget before the swap
    pub removed: Vec<BudgetNode>,
    /// The budget's new node set, ordered by position
    pub inserted: Vec<BudgetNode>,
}

/// Why a node set replacement failed
#[derive(Debug)]
pub enum ReplaceError {
    /// Nothing was changed; the old node set is intact
    NotApplied(NodeBudgetError),
    /// The old node set was deleted but the new one was not written
    DeletedNotInserted {
        removed: Vec<BudgetNode>,
        source: NodeBudgetError,
    },
}

/// Durable CRUD primitives the allocation engine depends on
///
/// Expense listings are ordered newest first; node listings by position.
pub trait BudgetStore {
    fn insert_budget(&self, budget: Budget) -> NodeBudgetResult<Budget>;

    fn get_budget(&self, id: BudgetId) -> NodeBudgetResult<Option<Budget>>;

    fn list_nodes(&self, budget_id: BudgetId) -> NodeBudgetResult<Vec<BudgetNode>>;

    fn get_node(&self, id: NodeId) -> NodeBudgetResult<Option<BudgetNode>>;

    fn insert_nodes(&self, nodes: Vec<BudgetNode>) -> NodeBudgetResult<Vec<BudgetNode>>;

    /// Delete by foreign key, returning the removed nodes
    fn delete_nodes_for_budget(&self, budget_id: BudgetId) -> NodeBudgetResult<Vec<BudgetNode>>;

    /// Swap a budget's node set
    ///
    /// The default runs delete-then-insert as two separate calls and reports
    /// through [`ReplaceError::DeletedNotInserted`] when only the first one
    /// took effect. Stores with a transactional boundary should override this
    /// so that the swap is all-or-nothing.
    fn replace_nodes(
        &self,
        budget_id: BudgetId,
        nodes: Vec<BudgetNode>,
    ) -> Result<NodeReplacement, ReplaceError> {
        let removed = self
            .delete_nodes_for_budget(budget_id)
            .map_err(ReplaceError::NotApplied)?;

        match self.insert_nodes(nodes) {
            Ok(inserted) => Ok(NodeReplacement { removed, inserted }),
            Err(source) => Err(ReplaceError::DeletedNotInserted { removed, source }),
        }
    }

    fn insert_expense(&self, expense: Expense) -> NodeBudgetResult<Expense>;

    fn get_expense(&self, id: ExpenseId) -> NodeBudgetResult<Option<Expense>>;

    /// Filtered select over the expenses of the given nodes
    fn list_expenses(&self, node_ids: &[NodeId]) -> NodeBudgetResult<Vec<Expense>>;

    fn list_all_expenses(&self) -> NodeBudgetResult<Vec<Expense>>;

    /// Delete by id; `None` if it did not exist
    fn delete_expense(&self, id: ExpenseId) -> NodeBudgetResult<Option<Expense>>;

    /// Delete by foreign key, returning the removed expenses
    fn delete_expenses_for_node(&self, node_id: NodeId) -> NodeBudgetResult<Vec<Expense>>;
}

/// JSON-file store coordinating the three repositories and the audit log
pub struct Storage {
    paths: BudgetPaths,
    pub budgets: BudgetRepository,
    pub nodes: NodeRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BudgetPaths) -> Result<Self, NodeBudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            budgets: BudgetRepository::new(paths.budgets_file()),
            nodes: NodeRepository::new(paths.nodes_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Stop writing audit entries
    pub fn without_audit(mut self) -> Self {
        self.audit = AuditLogger::disabled(self.paths.audit_log());
        self
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), NodeBudgetError> {
        self.budgets.load()?;
        self.nodes.load()?;
        self.expenses.load()?;
        debug!(
            budgets = self.budgets.count()?,
            nodes = self.nodes.count()?,
            expenses = self.expenses.count()?,
            "Loaded storage"
        );
        Ok(())
    }

    /// The data is already on disk; a failed audit write is logged, not fatal
    fn record(&self, entries: &[AuditEntry]) {
        if let Err(e) = self.audit.log_batch(entries) {
            tracing::warn!(error = %e, "Failed to write audit entries");
        }
    }
}

impl BudgetStore for Storage {
    fn insert_budget(&self, budget: Budget) -> NodeBudgetResult<Budget> {
        let budget = self.budgets.insert(budget)?;
        self.record(&[AuditEntry::budget_created(&budget)]);
        Ok(budget)
    }

    fn get_budget(&self, id: BudgetId) -> NodeBudgetResult<Option<Budget>> {
        self.budgets.get(id)
    }

    fn list_nodes(&self, budget_id: BudgetId) -> NodeBudgetResult<Vec<BudgetNode>> {
        self.nodes.get_for_budget(budget_id)
    }

    fn get_node(&self, id: NodeId) -> NodeBudgetResult<Option<BudgetNode>> {
        self.nodes.get(id)
    }

    fn insert_nodes(&self, nodes: Vec<BudgetNode>) -> NodeBudgetResult<Vec<BudgetNode>> {
        let inserted = self.nodes.insert_many(nodes)?;
        if let Some(first) = inserted.first() {
            self.record(&[AuditEntry::node_set_created(first.budget_id, &inserted)]);
        }
        Ok(inserted)
    }

    fn delete_nodes_for_budget(&self, budget_id: BudgetId) -> NodeBudgetResult<Vec<BudgetNode>> {
        let removed = self.nodes.delete_for_budget(budget_id)?;
        self.record(&[AuditEntry::node_set_deleted(budget_id, &removed)]);
        Ok(removed)
    }

    fn replace_nodes(
        &self,
        budget_id: BudgetId,
        nodes: Vec<BudgetNode>,
    ) -> Result<NodeReplacement, ReplaceError> {
        let (removed, inserted) = self
            .nodes
            .replace_for_budget(budget_id, nodes)
            .map_err(ReplaceError::NotApplied)?;

        self.record(&[AuditEntry::node_set_replaced(budget_id, &removed, &inserted)]);

        Ok(NodeReplacement { removed, inserted })
    }

    fn insert_expense(&self, expense: Expense) -> NodeBudgetResult<Expense> {
        let expense = self.expenses.insert(expense)?;
        self.record(&[AuditEntry::expense_created(&expense)]);
        Ok(expense)
    }

    fn get_expense(&self, id: ExpenseId) -> NodeBudgetResult<Option<Expense>> {
        self.expenses.get(id)
    }

    fn list_expenses(&self, node_ids: &[NodeId]) -> NodeBudgetResult<Vec<Expense>> {
        self.expenses.get_for_nodes(node_ids)
    }

    fn list_all_expenses(&self) -> NodeBudgetResult<Vec<Expense>> {
        self.expenses.get_all()
    }

    fn delete_expense(&self, id: ExpenseId) -> NodeBudgetResult<Option<Expense>> {
        let removed = self.expenses.delete(id)?;
        if let Some(expense) = &removed {
            self.record(&[AuditEntry::expense_deleted(expense)]);
        }
        Ok(removed)
    }

    fn delete_expenses_for_node(&self, node_id: NodeId) -> NodeBudgetResult<Vec<Expense>> {
        let removed = self.expenses.delete_for_node(node_id)?;
        let entries: Vec<_> = removed.iter().map(AuditEntry::expense_deleted).collect();
        self.record(&entries);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Money, NodeProposal, Percentage};
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn node(budget_id: BudgetId, name: &str, pct: i64) -> BudgetNode {
        BudgetNode::from_proposal(
            budget_id,
            &NodeProposal::new(name, Percentage::from_whole(pct)),
            Money::zero(),
            0,
        )
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, _storage) = create_storage();
        assert!(temp_dir.path().join("data").exists());
    }

    #[test]
    fn test_replace_nodes_is_audited() {
        let (_temp, storage) = create_storage();
        let budget = storage
            .insert_budget(Budget::new(Money::from_units(100)).unwrap())
            .unwrap();
        storage.insert_nodes(vec![node(budget.id, "Old", 100)]).unwrap();

        let replacement = storage
            .replace_nodes(budget.id, vec![node(budget.id, "New", 100)])
            .unwrap();
        assert_eq!(replacement.removed[0].name, "Old");
        assert_eq!(replacement.inserted[0].name, "New");

        let entries = storage.audit().read_all().unwrap();
        let ops: Vec<_> = entries.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Create, Operation::Replace]);
        assert_eq!(replacement.inserted, storage.list_nodes(budget.id).unwrap());

        let count = entries[2].nodes.unwrap();
        assert_eq!((count.before, count.after), (1, 1));
        assert_eq!(entries[2].label.as_deref(), Some("New 100%"));
    }

    #[test]
    fn test_replace_nodes_failure_is_not_applied() {
        let (temp, storage) = create_storage();
        let budget = storage
            .insert_budget(Budget::new(Money::from_units(100)).unwrap())
            .unwrap();
        storage.insert_nodes(vec![node(budget.id, "Old", 100)]).unwrap();

        std::fs::create_dir(temp.path().join("data").join("nodes.json.tmp")).unwrap();

        let result = storage.replace_nodes(budget.id, vec![node(budget.id, "New", 100)]);
        assert!(matches!(result, Err(ReplaceError::NotApplied(_))));
        assert_eq!(storage.list_nodes(budget.id).unwrap()[0].name, "Old");
    }

    #[test]
    fn test_without_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap().without_audit();

        storage
            .insert_budget(Budget::new(Money::from_units(1)).unwrap())
            .unwrap();
        assert!(!temp_dir.path().join("audit.log").exists());
    }
}
