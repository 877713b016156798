//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the view controller.
//!
//! The binary runs one process per command, so the controller is rebuilt
//! from the saved [`Session`] on start and written back when a command
//! succeeds.

pub mod budget;
pub mod expense;
pub mod node;

pub use budget::{handle_graph_command, handle_init_command, handle_select_command, handle_show_command};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use node::{handle_node_command, NodeCommands};

use std::io::Write;

use tracing::warn;

use crate::config::{BudgetPaths, Session};
use crate::error::NodeBudgetResult;
use crate::services::OverBudgetWarning;
use crate::storage::BudgetStore;
use crate::view::Controller;

/// Build a controller, resuming the saved budget if there is one
///
/// A session naming a budget that is no longer in the store is discarded.
pub fn open_controller<'a>(
    store: &'a dyn BudgetStore,
    currency_symbol: &str,
    session: &Session,
) -> NodeBudgetResult<Controller<'a>> {
    let mut controller = Controller::new(store, currency_symbol);

    if let Some(budget_id) = session.budget_id {
        match controller.resume(budget_id, session.selected_node) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(budget_id = %budget_id, "Saved budget no longer exists; starting fresh");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(controller)
}

/// Persist the controller's budget and selection for the next invocation
pub fn save_session(controller: &Controller<'_>, paths: &BudgetPaths) -> NodeBudgetResult<()> {
    let session = Session {
        budget_id: controller.budget().map(|b| b.id),
        selected_node: controller.selected_node(),
    };
    session.save(paths)
}

/// Ask on stdin whether to record past the allocation
///
/// Anything but `y`/`yes`, including a closed stdin, declines.
pub fn confirm_over_budget(warning: &OverBudgetWarning) -> bool {
    println!("Warning: {}", warning);
    print!("Record anyway? (y/N): ");
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
