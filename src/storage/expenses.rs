//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::NodeBudgetError;
use crate::models::{Expense, ExpenseId, NodeId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    expenses: RwLock<HashMap<ExpenseId, Expense>>,
}

/// Newest first
fn newest_first(mut list: Vec<Expense>) -> Vec<Expense> {
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    list
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            expenses: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), NodeBudgetError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut expenses = self.expenses.write().map_err(lock_error)?;
        expenses.clear();
        for expense in file_data.expenses {
            expenses.insert(expense.id, expense);
        }

        Ok(())
    }

    fn persist(&self, expenses: &HashMap<ExpenseId, Expense>) -> Result<(), NodeBudgetError> {
        let mut list: Vec<_> = expenses.values().cloned().collect();
        list.sort_by_key(|e| e.created_at);
        write_json_atomic(&self.path, &ExpenseData { expenses: list })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, NodeBudgetError> {
        let expenses = self.expenses.read().map_err(lock_error)?;
        Ok(expenses.get(&id).cloned())
    }

    /// Expenses belonging to any of `node_ids`, newest first
    pub fn get_for_nodes(&self, node_ids: &[NodeId]) -> Result<Vec<Expense>, NodeBudgetError> {
        let wanted: HashSet<NodeId> = node_ids.iter().copied().collect();
        let expenses = self.expenses.read().map_err(lock_error)?;
        Ok(newest_first(
            expenses
                .values()
                .filter(|e| wanted.contains(&e.node_id))
                .cloned()
                .collect(),
        ))
    }

    /// Every expense, newest first
    pub fn get_all(&self) -> Result<Vec<Expense>, NodeBudgetError> {
        let expenses = self.expenses.read().map_err(lock_error)?;
        Ok(newest_first(expenses.values().cloned().collect()))
    }

    pub fn insert(&self, expense: Expense) -> Result<Expense, NodeBudgetError> {
        let mut expenses = self.expenses.write().map_err(lock_error)?;
        expenses.insert(expense.id, expense.clone());

        if let Err(e) = self.persist(&expenses) {
            expenses.remove(&expense.id);
            return Err(e);
        }

        Ok(expense)
    }

    /// Delete one expense; `None` if it did not exist
    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, NodeBudgetError> {
        let mut expenses = self.expenses.write().map_err(lock_error)?;
        let Some(removed) = expenses.remove(&id) else {
            return Ok(None);
        };

        if let Err(e) = self.persist(&expenses) {
            expenses.insert(removed.id, removed);
            return Err(e);
        }

        Ok(Some(removed))
    }

    /// Delete every expense of one node
    pub fn delete_for_node(&self, node_id: NodeId) -> Result<Vec<Expense>, NodeBudgetError> {
        let mut expenses = self.expenses.write().map_err(lock_error)?;
        let removed: Vec<Expense> = expenses
            .values()
            .filter(|e| e.node_id == node_id)
            .cloned()
            .collect();

        if removed.is_empty() {
            return Ok(removed);
        }

        for expense in &removed {
            expenses.remove(&expense.id);
        }

        if let Err(e) = self.persist(&expenses) {
            for expense in &removed {
                expenses.insert(expense.id, expense.clone());
            }
            return Err(e);
        }

        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, NodeBudgetError> {
        let expenses = self.expenses.read().map_err(lock_error)?;
        Ok(expenses.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_get_for_nodes_newest_first() {
        let (_temp, repo) = create_test_repo();
        let node = NodeId::new();
        let other = NodeId::new();

        let mut older = Expense::new(node, "Older", Money::from_units(1), None);
        older.created_at -= Duration::minutes(5);
        let newer = Expense::new(node, "Newer", Money::from_units(2), None);

        repo.insert(older).unwrap();
        repo.insert(newer).unwrap();
        repo.insert(Expense::new(other, "Elsewhere", Money::from_units(3), None))
            .unwrap();

        let names: Vec<_> = repo
            .get_for_nodes(&[node])
            .unwrap()
            .into_iter()
            .map(|e| e.item_name)
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
        assert_eq!(repo.get_all().unwrap().len(), 3);
    }

    #[test]
    fn test_delete() {
        let (_temp, repo) = create_test_repo();
        let expense = repo
            .insert(Expense::new(NodeId::new(), "Tea", Money::from_cents(250), None))
            .unwrap();

        assert_eq!(repo.delete(expense.id).unwrap(), Some(expense.clone()));
        assert_eq!(repo.delete(expense.id).unwrap(), None);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_for_node() {
        let (_temp, repo) = create_test_repo();
        let node = NodeId::new();
        repo.insert(Expense::new(node, "A", Money::from_units(1), None)).unwrap();
        repo.insert(Expense::new(node, "B", Money::from_units(1), None)).unwrap();
        repo.insert(Expense::new(NodeId::new(), "C", Money::from_units(1), None))
            .unwrap();

        assert_eq!(repo.delete_for_node(node).unwrap().len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = create_test_repo();
        let expense = repo
            .insert(Expense::new(NodeId::new(), "Rent", Money::from_units(900), Some("June".into())))
            .unwrap();

        let reloaded = ExpenseRepository::new(temp.path().join("expenses.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(expense.id).unwrap(), Some(expense));
    }
}
