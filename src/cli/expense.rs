//! Expense CLI commands
//!
//! Implements recording, listing and deleting expenses, and pruning the ones
//! left behind by node set edits.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_expense_list;
use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::Money;
use crate::services::{LedgerService, RecordOutcome};
use crate::storage::BudgetStore;
use crate::view::Controller;

use super::confirm_over_budget;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What was bought
        item: String,
        /// Amount (e.g., "250" or "250.00")
        amount: String,
        /// Node name or ID (defaults to the selected node)
        #[arg(short, long)]
        node: Option<String>,
        /// Optional note
        #[arg(long)]
        note: Option<String>,
        /// Record without asking when it goes over the node's allocation
        #[arg(short, long)]
        yes: bool,
    },

    /// List expenses, newest first
    List {
        /// Only show expenses of this node
        #[arg(short, long)]
        node: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },

    /// Delete expenses whose node was replaced by a node set edit
    #[command(name = "prune-orphans")]
    PruneOrphans,
}

/// Handle an expense command
pub fn handle_expense_command(
    controller: &Controller<'_>,
    store: &dyn BudgetStore,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> NodeBudgetResult<()> {
    let symbol = &settings.currency_symbol;

    match cmd {
        ExpenseCommands::Add {
            item,
            amount,
            node,
            note,
            yes,
        } => {
            let amount = Money::parse(&amount)
                .map_err(|e| NodeBudgetError::InvalidInput(format!("Invalid amount: {}", e)))?;
            let node_id = node
                .map(|n| controller.find_node(&n).map(|node| node.id))
                .transpose()?;

            let outcome = controller.record_expense(node_id, &item, amount, note, |warning| {
                if yes {
                    println!("Warning: {}", warning);
                    true
                } else {
                    confirm_over_budget(warning)
                }
            })?;

            match outcome {
                RecordOutcome::Recorded { expense, .. } => {
                    println!(
                        "Recorded {} for '{}'",
                        expense.amount.format_with_symbol(symbol),
                        expense.item_name
                    );
                    println!("  ID: {}", expense.id);

                    let summary = controller.summary()?;
                    if let Some(node) = summary.nodes.iter().find(|s| s.node.id == expense.node_id) {
                        println!(
                            "  {} remaining: {}",
                            node.node.name,
                            node.figures.remaining.format_with_symbol(symbol)
                        );
                    }
                }
                RecordOutcome::Declined { .. } => {
                    println!("Not recorded.");
                }
            }
        }

        ExpenseCommands::List { node } => {
            let node_id = node
                .map(|n| controller.find_node(&n).map(|node| node.id))
                .transpose()?;
            let expenses = controller.expenses(node_id)?;
            print!("{}", format_expense_list(&expenses, controller.nodes(), symbol));
        }

        ExpenseCommands::Delete { id } => {
            let expense = LedgerService::new(store).find_expense(&id)?;
            let deleted = controller.delete_expense(expense.id)?;
            println!(
                "Deleted expense '{}' ({})",
                deleted.item_name,
                deleted.amount.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::PruneOrphans => {
            controller.budget().ok_or(NodeBudgetError::NoActiveBudget)?;
            let removed = LedgerService::new(store).prune_orphans()?;
            if removed.is_empty() {
                println!("No orphaned expenses.");
            } else {
                let total: Money = removed.iter().map(|e| e.amount).sum();
                println!(
                    "Removed {} orphaned expense(s) totalling {}",
                    removed.len(),
                    total.format_with_symbol(symbol)
                );
            }
        }
    }

    Ok(())
}
