//! Expense display formatting

use std::collections::HashMap;

use crate::models::{BudgetNode, Expense, NodeId};

/// Format expenses as a table, naming each expense's node
pub fn format_expense_list(expenses: &[Expense], nodes: &[BudgetNode], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let names: HashMap<NodeId, &str> = nodes.iter().map(|n| (n.id, n.name.as_str())).collect();
    let node_name = |e: &Expense| names.get(&e.node_id).copied().unwrap_or("(replaced)");

    let item_width = expenses
        .iter()
        .map(|e| e.item_name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let node_width = expenses
        .iter()
        .map(|e| node_name(e).chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<item_width$}  {:<node_width$}  {:>12}  {:<12}  {}\n",
        "Date",
        "Item",
        "Node",
        "Amount",
        "ID",
        "Note",
        item_width = item_width,
        node_width = node_width,
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<item_width$}  {:-<node_width$}  {:->12}  {:-<12}  {:-<4}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        item_width = item_width,
        node_width = node_width,
    ));

    for expense in expenses {
        output.push_str(&format!(
            "{:<10}  {:<item_width$}  {:<node_width$}  {:>12}  {:<12}  {}\n",
            expense.created_at.format("%Y-%m-%d"),
            expense.item_name,
            node_name(expense),
            expense.amount.format_with_symbol(symbol),
            expense.id,
            expense.note.as_deref().unwrap_or(""),
            item_width = item_width,
            node_width = node_width,
        ));
    }

    let total: crate::models::Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&format!("\n{} expense(s), {} total\n", expenses.len(), total.format_with_symbol(symbol)));

    output
}
