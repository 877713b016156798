//! Persisted CLI session state
//!
//! The CLI runs one process per command, so the view controller's state
//! (which budget is active, which node is selected) is saved between runs.

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::NodeBudgetResult;
use crate::models::{BudgetId, NodeId};
use crate::storage::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_node: Option<NodeId>,
}

impl Session {
    /// Load the session, or an empty one if none was saved
    pub fn load(paths: &BudgetPaths) -> NodeBudgetResult<Self> {
        read_json(paths.session_file())
    }

    pub fn save(&self, paths: &BudgetPaths) -> NodeBudgetResult<()> {
        write_json_atomic(paths.session_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_session_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Session::load(&paths).unwrap(), Session::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        let session = Session {
            budget_id: Some(BudgetId::new()),
            selected_node: None,
        };
        session.save(&paths).unwrap();

        assert_eq!(Session::load(&paths).unwrap(), session);
    }
}
