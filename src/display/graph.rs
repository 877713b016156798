//! Text rendering of the allocation graph

use crate::view::{AllocationGraph, VisualizationSurface};

/// A surface that draws the graph as an indented tree
#[derive(Debug, Default)]
pub struct TextSurface {
    output: String,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered frame
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl VisualizationSurface for TextSurface {
    fn render(&mut self, graph: &AllocationGraph) {
        self.output = format_graph(graph);
    }
}

/// Format the graph as a tree rooted at the hub
pub fn format_graph(graph: &AllocationGraph) -> String {
    let mut output = format!("{}\n", graph.hub.label);

    if graph.vertices.is_empty() {
        output.push_str("  (no nodes)\n");
        return output;
    }

    for (i, vertex) in graph.vertices.iter().enumerate() {
        let is_last = i == graph.vertices.len() - 1;
        let prefix = if is_last { "└── " } else { "├── " };
        let selected = if vertex.selected { "  <" } else { "" };
        output.push_str(&format!("  {}{}{}\n", prefix, vertex.label, selected));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetNode, Money, NodeProposal, Percentage};

    #[test]
    fn test_text_surface_renders_tree() {
        let budget = Budget::new(Money::from_units(100)).unwrap();
        let nodes: Vec<_> = [("A", 60, 60), ("B", 40, 40)]
            .iter()
            .enumerate()
            .map(|(i, (name, pct, amount))| {
                BudgetNode::from_proposal(
                    budget.id,
                    &NodeProposal::new(*name, Percentage::from_whole(*pct)),
                    Money::from_units(*amount),
                    i as i32,
                )
            })
            .collect();
        let graph = AllocationGraph::build(&budget, &nodes, Some(nodes[1].id), "$");

        let mut surface = TextSurface::new();
        surface.render(&graph);

        assert_eq!(
            surface.output(),
            "$100.00\n  ├── A (60%) $60.00\n  └── B (40%) $40.00  <\n"
        );
    }
}
