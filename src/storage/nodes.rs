//! Budget node repository for JSON storage
//!
//! Manages loading and saving nodes to nodes.json. Besides the primitive
//! insert and delete-by-budget, it offers a single-write replacement of a
//! budget's whole node set.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::NodeBudgetError;
use crate::models::{BudgetId, BudgetNode, NodeId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

/// Serializable node data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct NodeData {
    pub nodes: Vec<BudgetNode>,
}

/// Repository for node persistence
pub struct NodeRepository {
    path: PathBuf,
    nodes: RwLock<HashMap<NodeId, BudgetNode>>,
}

fn sorted(mut list: Vec<BudgetNode>) -> Vec<BudgetNode> {
    list.sort_by(|a, b| {
        a.budget_id
            .as_uuid()
            .cmp(b.budget_id.as_uuid())
            .then(a.position.cmp(&b.position))
            .then(a.created_at.cmp(&b.created_at))
    });
    list
}

impl NodeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            nodes: RwLock::new(HashMap::new()),
        }
    }

    /// Load nodes from disk
    pub fn load(&self) -> Result<(), NodeBudgetError> {
        let file_data: NodeData = read_json(&self.path)?;

        let mut nodes = self.nodes.write().map_err(lock_error)?;
        nodes.clear();
        for node in file_data.nodes {
            nodes.insert(node.id, node);
        }

        Ok(())
    }

    fn persist(&self, nodes: &HashMap<NodeId, BudgetNode>) -> Result<(), NodeBudgetError> {
        let list = sorted(nodes.values().cloned().collect());
        write_json_atomic(&self.path, &NodeData { nodes: list })
    }

    pub fn get(&self, id: NodeId) -> Result<Option<BudgetNode>, NodeBudgetError> {
        let nodes = self.nodes.read().map_err(lock_error)?;
        Ok(nodes.get(&id).cloned())
    }

    /// Nodes of one budget ordered by position
    pub fn get_for_budget(&self, budget_id: BudgetId) -> Result<Vec<BudgetNode>, NodeBudgetError> {
        let nodes = self.nodes.read().map_err(lock_error)?;
        Ok(sorted(
            nodes
                .values()
                .filter(|n| n.budget_id == budget_id)
                .cloned()
                .collect(),
        ))
    }

    /// Insert nodes in one write
    pub fn insert_many(&self, new_nodes: Vec<BudgetNode>) -> Result<Vec<BudgetNode>, NodeBudgetError> {
        let mut nodes = self.nodes.write().map_err(lock_error)?;
        for node in &new_nodes {
            nodes.insert(node.id, node.clone());
        }

        if let Err(e) = self.persist(&nodes) {
            for node in &new_nodes {
                nodes.remove(&node.id);
            }
            return Err(e);
        }

        Ok(sorted(new_nodes))
    }

    /// Delete every node of a budget, returning what was removed
    pub fn delete_for_budget(&self, budget_id: BudgetId) -> Result<Vec<BudgetNode>, NodeBudgetError> {
        let mut nodes = self.nodes.write().map_err(lock_error)?;
        let removed: Vec<BudgetNode> = nodes
            .values()
            .filter(|n| n.budget_id == budget_id)
            .cloned()
            .collect();

        for node in &removed {
            nodes.remove(&node.id);
        }

        if let Err(e) = self.persist(&nodes) {
            for node in &removed {
                nodes.insert(node.id, node.clone());
            }
            return Err(e);
        }

        Ok(sorted(removed))
    }

    /// Swap a budget's node set for `replacement` with a single file write
    ///
    /// Either both the removal and the insertion reach disk or neither does;
    /// on failure the in-memory map is restored to its prior contents.
    /// Returns the removed and the inserted nodes, each ordered by position.
    pub fn replace_for_budget(
        &self,
        budget_id: BudgetId,
        replacement: Vec<BudgetNode>,
    ) -> Result<(Vec<BudgetNode>, Vec<BudgetNode>), NodeBudgetError> {
        let mut nodes = self.nodes.write().map_err(lock_error)?;
        let snapshot = (*nodes).clone();

        nodes.retain(|_, n| n.budget_id != budget_id);
        for node in &replacement {
            nodes.insert(node.id, node.clone());
        }

        if let Err(e) = self.persist(&nodes) {
            *nodes = snapshot;
            return Err(e);
        }

        let removed = sorted(
            snapshot
                .into_values()
                .filter(|n| n.budget_id == budget_id)
                .collect(),
        );
        Ok((removed, sorted(replacement)))
    }

    pub fn count(&self) -> Result<usize, NodeBudgetError> {
        let nodes = self.nodes.read().map_err(lock_error)?;
        Ok(nodes.len())
    }
}
