//! Hub-and-spoke allocation graph
//!
//! One hub vertex for the budget total, one vertex per node, and one edge
//! from the hub to each node weighted by its share.

use serde::Serialize;

use crate::models::{Budget, BudgetNode, NodeId, Percentage};

/// Identifies a vertex of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VertexId {
    /// The budget total
    Hub,
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vertex {
    pub id: VertexId,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: Percentage,
}

/// What a visualization surface is asked to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationGraph {
    pub hub: Vertex,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl AllocationGraph {
    /// Build the graph of `nodes`, labelling amounts with `currency_symbol`
    pub fn build(
        budget: &Budget,
        nodes: &[BudgetNode],
        selected: Option<NodeId>,
        currency_symbol: &str,
    ) -> Self {
        let hub = Vertex {
            id: VertexId::Hub,
            label: budget.total_amount.format_with_symbol(currency_symbol),
            selected: false,
        };

        let vertices = nodes
            .iter()
            .map(|node| Vertex {
                id: VertexId::Node(node.id),
                label: format!(
                    "{} ({}) {}",
                    node.name,
                    node.percentage,
                    node.allocated_amount.format_with_symbol(currency_symbol)
                ),
                selected: selected == Some(node.id),
            })
            .collect();

        let edges = nodes
            .iter()
            .map(|node| Edge {
                from: VertexId::Hub,
                to: VertexId::Node(node.id),
                weight: node.percentage,
            })
            .collect();

        Self {
            hub,
            vertices,
            edges,
        }
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        if id == VertexId::Hub {
            return Some(&self.hub);
        }
        self.vertices.iter().find(|v| v.id == id)
    }
}
