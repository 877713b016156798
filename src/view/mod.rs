//! Selection and view state
//!
//! The controller owns which budget is active and which node is selected.
//! Drawing is left to a [`VisualizationSurface`], which receives a fresh
//! [`AllocationGraph`] after every change and reports taps back as
//! [`SurfaceEvent`]s.

pub mod controller;
pub mod graph;

pub use controller::{BudgetSummary, Controller, NodeSummary, ViewState};
pub use graph::{AllocationGraph, Edge, Vertex, VertexId};

/// Events a surface reports back to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    NodeTapped(VertexId),
}

/// Something that can draw an allocation graph
pub trait VisualizationSurface {
    fn render(&mut self, graph: &AllocationGraph);
}
