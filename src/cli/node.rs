//! Node CLI commands
//!
//! Nodes are only edited as a whole set, so there is no per-node create or
//! delete: `node edit` takes the complete new set.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_node_list;
use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::NodeProposal;
use crate::view::Controller;

fn parse_assignment(s: &str) -> Result<NodeProposal, String> {
    NodeProposal::parse_assignment(s)
}

/// Node subcommands
#[derive(Subcommand)]
pub enum NodeCommands {
    /// List the budget's nodes
    List,

    /// Replace the whole node set
    ///
    /// Shares must add up to 100%. Every node gets a new id, so existing
    /// expenses stay with the nodes they were recorded against.
    Edit {
        /// A node as NAME=PERCENT (repeat for each node)
        #[arg(long = "set", value_name = "NAME=PERCENT", required = true, value_parser = parse_assignment)]
        nodes: Vec<NodeProposal>,
    },
}

/// Handle a node command
pub fn handle_node_command(
    controller: &mut Controller<'_>,
    settings: &Settings,
    cmd: NodeCommands,
) -> NodeBudgetResult<()> {
    let symbol = &settings.currency_symbol;

    match cmd {
        NodeCommands::List => {
            controller.budget().ok_or(NodeBudgetError::NoActiveBudget)?;
            print!("{}", format_node_list(controller.nodes(), symbol));
        }

        NodeCommands::Edit { nodes } => {
            let outcome = controller.apply_node_set_edit(&nodes)?;

            println!("Replaced node set ({} node(s))", outcome.nodes.len());
            println!();
            print!("{}", format_node_list(&outcome.nodes, symbol));

            if outcome.orphaned_expenses > 0 {
                println!();
                println!(
                    "{} expense(s) belonged to the replaced nodes and no longer count \
                     toward any node. Run 'nodebudget expense prune-orphans' to remove them.",
                    outcome.orphaned_expenses
                );
            }
        }
    }

    Ok(())
}
