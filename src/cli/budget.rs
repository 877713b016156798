//! Budget CLI commands
//!
//! Implements initialization, the overview, the graph and node selection.

use crate::config::settings::Settings;
use crate::display::{format_node_list, format_summary, TextSurface};
use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::Money;
use crate::view::{Controller, SurfaceEvent, VertexId, VisualizationSurface};

/// Create the budget with the configured default partition
pub fn handle_init_command(
    controller: &mut Controller<'_>,
    settings: &Settings,
    amount: &str,
) -> NodeBudgetResult<()> {
    let total = Money::parse(amount)
        .map_err(|e| NodeBudgetError::InvalidAmount(format!("'{}': {}", amount, e)))?;

    let budget = controller.initialize(total, &settings.default_partition)?;
    println!(
        "Initialized budget {} with total {}",
        budget.id,
        budget.total_amount.format_with_symbol(&settings.currency_symbol)
    );
    println!();
    print!("{}", format_node_list(controller.nodes(), &settings.currency_symbol));

    Ok(())
}

pub fn handle_show_command(controller: &Controller<'_>, settings: &Settings) -> NodeBudgetResult<()> {
    let summary = controller.summary()?;
    print!("{}", format_summary(&summary, &settings.currency_symbol));
    Ok(())
}

pub fn handle_graph_command(controller: &Controller<'_>, json: bool) -> NodeBudgetResult<()> {
    let graph = controller.graph()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    } else {
        let mut surface = TextSurface::new();
        surface.render(&graph);
        print!("{}", surface.output());
    }

    Ok(())
}

/// Select a node by name or id, as if it were tapped on the graph
pub fn handle_select_command(controller: &mut Controller<'_>, node: &str) -> NodeBudgetResult<()> {
    let node = controller.find_node(node)?.clone();
    controller.handle_event(SurfaceEvent::NodeTapped(VertexId::Node(node.id)))?;
    println!("Selected: {} ({})", node.name, node.id);
    Ok(())
}
