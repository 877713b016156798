//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::NodeBudgetError;
use crate::models::{Budget, BudgetId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

/// Serializable budget data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BudgetData {
    pub budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), NodeBudgetError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self.budgets.write().map_err(lock_error)?;
        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }

        Ok(())
    }

    fn persist(&self, budgets: &HashMap<BudgetId, Budget>) -> Result<(), NodeBudgetError> {
        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by_key(|b| b.created_at);
        write_json_atomic(&self.path, &BudgetData { budgets: list })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, NodeBudgetError> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        Ok(budgets.get(&id).cloned())
    }

    /// Insert a budget and write it to disk; memory is untouched on failure
    pub fn insert(&self, budget: Budget) -> Result<Budget, NodeBudgetError> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;
        budgets.insert(budget.id, budget.clone());

        if let Err(e) = self.persist(&budgets) {
            budgets.remove(&budget.id);
            return Err(e);
        }

        Ok(budget)
    }

    pub fn count(&self) -> Result<usize, NodeBudgetError> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        Ok(budgets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_insert_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        let repo = BudgetRepository::new(path.clone());
        repo.load().unwrap();
        let budget = Budget::new(Money::from_units(10_000)).unwrap();
        repo.insert(budget.clone()).unwrap();

        let repo2 = BudgetRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(budget.id).unwrap(), Some(budget));
    }

    #[test]
    fn test_failed_insert_is_rolled_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        std::fs::create_dir(temp_dir.path().join("budgets.json.tmp")).unwrap();

        let repo = BudgetRepository::new(path);
        let budget = Budget::new(Money::from_units(1)).unwrap();

        assert!(repo.insert(budget.clone()).is_err());
        assert_eq!(repo.get(budget.id).unwrap(), None);
    }
}
