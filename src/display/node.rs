//! Node and budget summary formatting
//!
//! Formats the node set and its derived figures as terminal tables.

use crate::models::BudgetNode;
use crate::services::DerivedFigures;
use crate::view::{BudgetSummary, NodeSummary};

fn width_of<'a>(items: impl Iterator<Item = &'a str>, min: usize) -> usize {
    items.map(|s| s.chars().count()).max().unwrap_or(min).max(min)
}

/// Format the node set without spend figures
pub fn format_node_list(nodes: &[BudgetNode], symbol: &str) -> String {
    if nodes.is_empty() {
        return "No nodes found.\n\nRun 'nodebudget node edit' to create some.".to_string();
    }

    let name_width = width_of(nodes.iter().map(|n| n.name.as_str()), 4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:>8}  {:>14}  {}\n",
        "Node",
        "Share",
        "Allocated",
        "ID",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->8}  {:->14}  {:-<13}\n",
        "",
        "",
        "",
        "",
        width = name_width
    ));

    for node in nodes {
        output.push_str(&format!(
            "{:<width$}  {:>8}  {:>14}  {}\n",
            node.name,
            node.percentage.to_string(),
            node.allocated_amount.format_with_symbol(symbol),
            node.id,
            width = name_width
        ));
    }

    output
}

fn figures_row(name: &str, figures: &DerivedFigures, marker: &str, symbol: &str, width: usize) -> String {
    format!(
        "{:<width$}  {:>14}  {:>14}  {:>14}  {:>7.1}%{}\n",
        name,
        figures.allocated.format_with_symbol(symbol),
        figures.spent.format_with_symbol(symbol),
        figures.remaining.format_with_symbol(symbol),
        figures.progress,
        marker,
        width = width
    )
}

fn marker(summary: &NodeSummary, selected: Option<&NodeSummary>) -> &'static str {
    let is_selected = selected.map(|s| s.node.id) == Some(summary.node.id);
    match (is_selected, summary.figures.is_over_budget()) {
        (true, true) => "  * OVER",
        (true, false) => "  *",
        (false, true) => "  OVER",
        (false, false) => "",
    }
}

/// Format the budget overview: one row per node plus a total row
pub fn format_summary(summary: &BudgetSummary, symbol: &str) -> String {
    let name_width = width_of(summary.nodes.iter().map(|s| s.node.name.as_str()), 5);

    let mut output = String::new();
    output.push_str(&format!(
        "Budget {}  (created {})\n\n",
        summary.budget.id,
        summary.budget.created_at.format("%Y-%m-%d")
    ));
    output.push_str(&format!(
        "{:<width$}  {:>14}  {:>14}  {:>14}  {:>8}\n",
        "Node",
        "Allocated",
        "Spent",
        "Remaining",
        "Used",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->14}  {:->14}  {:->14}  {:->8}\n",
        "",
        "",
        "",
        "",
        "",
        width = name_width
    ));

    for node in &summary.nodes {
        output.push_str(&figures_row(
            &node.node.name,
            &node.figures,
            marker(node, summary.selected.as_ref()),
            symbol,
            name_width,
        ));
    }

    output.push_str(&format!(
        "{:-<width$}  {:->14}  {:->14}  {:->14}  {:->8}\n",
        "",
        "",
        "",
        "",
        "",
        width = name_width
    ));
    output.push_str(&figures_row("Total", &summary.total, "", symbol, name_width));

    if let Some(selected) = &summary.selected {
        output.push_str(&format!("\nSelected: {}\n", selected.node.name));
    }

    if summary.orphaned_expenses > 0 {
        output.push_str(&format!(
            "\n{} expense(s) belong to replaced nodes. \
             Run 'nodebudget expense prune-orphans' to remove them.\n",
            summary.orphaned_expenses
        ));
    }

    output
}
