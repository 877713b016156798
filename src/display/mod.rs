//! Display formatting for terminal output
//!
//! Provides utilities for formatting nodes, budget summaries, expenses and
//! the allocation graph for terminal display.

pub mod expense;
pub mod graph;
pub mod node;

pub use expense::format_expense_list;
pub use graph::{format_graph, TextSurface};
pub use node::{format_node_list, format_summary};
