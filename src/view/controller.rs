//! View state controller
//!
//! `NoBudget` moves to `BudgetActive` once, by initializing or resuming a
//! budget; there is no way back. Inside `BudgetActive` the only state that
//! changes is the selected node, which is cleared by every node set edit
//! because the old node ids no longer exist.

use tracing::debug;

use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::{Budget, BudgetId, BudgetNode, Expense, ExpenseId, Money, NodeId, NodeProposal};
use crate::services::ledger::{expenses_for_node, DerivedFigures, LedgerService, OverBudgetWarning, RecordOutcome};
use crate::services::{AllocationService, NodeSetEditOutcome, NodeSetService};
use crate::storage::BudgetStore;

use super::graph::{AllocationGraph, VertexId};
use super::{SurfaceEvent, VisualizationSurface};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    NoBudget,
    BudgetActive {
        budget: Budget,
        nodes: Vec<BudgetNode>,
        selected_node: Option<NodeId>,
    },
}

/// One node with its derived figures
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSummary {
    pub node: BudgetNode,
    pub figures: DerivedFigures,
}

/// Everything the budget screen shows, recomputed from the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub total: DerivedFigures,
    pub nodes: Vec<NodeSummary>,
    pub selected: Option<NodeSummary>,
    /// Expenses whose node was replaced by an edit
    pub orphaned_expenses: usize,
}

pub struct Controller<'a> {
    store: &'a dyn BudgetStore,
    currency_symbol: String,
    state: ViewState,
    surface: Option<Box<dyn VisualizationSurface + 'a>>,
}

impl<'a> Controller<'a> {
    pub fn new(store: &'a dyn BudgetStore, currency_symbol: impl Into<String>) -> Self {
        Self {
            store,
            currency_symbol: currency_symbol.into(),
            state: ViewState::NoBudget,
            surface: None,
        }
    }

    /// Push a graph to `surface` after every change
    pub fn with_surface(mut self, surface: Box<dyn VisualizationSurface + 'a>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn budget(&self) -> Option<&Budget> {
        match &self.state {
            ViewState::BudgetActive { budget, .. } => Some(budget),
            ViewState::NoBudget => None,
        }
    }

    pub fn nodes(&self) -> &[BudgetNode] {
        match &self.state {
            ViewState::BudgetActive { nodes, .. } => nodes,
            ViewState::NoBudget => &[],
        }
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        match &self.state {
            ViewState::BudgetActive { selected_node, .. } => *selected_node,
            ViewState::NoBudget => None,
        }
    }

    fn active(&self) -> NodeBudgetResult<(&Budget, &[BudgetNode], Option<NodeId>)> {
        match &self.state {
            ViewState::BudgetActive {
                budget,
                nodes,
                selected_node,
            } => Ok((budget, nodes, *selected_node)),
            ViewState::NoBudget => Err(NodeBudgetError::NoActiveBudget),
        }
    }

    fn ensure_no_budget(&self) -> NodeBudgetResult<()> {
        match &self.state {
            ViewState::NoBudget => Ok(()),
            ViewState::BudgetActive { budget, .. } => {
                Err(NodeBudgetError::AlreadyInitialized(budget.id.to_string()))
            }
        }
    }

    /// Create the budget and its starting nodes
    pub fn initialize(&mut self, total: Money, partition: &[NodeProposal]) -> NodeBudgetResult<&Budget> {
        self.ensure_no_budget()?;

        let (budget, nodes) = AllocationService::new(self.store).initialize(total, partition)?;
        self.state = ViewState::BudgetActive {
            budget,
            nodes,
            selected_node: None,
        };
        self.push_graph();

        self.active().map(|(budget, _, _)| budget)
    }

    /// Rebuild the active state from the store
    ///
    /// A selection that no longer names a live node is dropped.
    pub fn resume(&mut self, budget_id: BudgetId, selected: Option<NodeId>) -> NodeBudgetResult<()> {
        self.ensure_no_budget()?;

        let (budget, nodes) = AllocationService::new(self.store).load(budget_id)?;
        let selected_node = selected.filter(|id| nodes.iter().any(|n| n.id == *id));
        if selected.is_some() && selected_node.is_none() {
            debug!(budget_id = %budget_id, "Dropped stale node selection");
        }

        self.state = ViewState::BudgetActive {
            budget,
            nodes,
            selected_node,
        };
        self.push_graph();
        Ok(())
    }

    pub fn select_node(&mut self, id: NodeId) -> NodeBudgetResult<()> {
        match &mut self.state {
            ViewState::NoBudget => return Err(NodeBudgetError::NoActiveBudget),
            ViewState::BudgetActive {
                nodes,
                selected_node,
                ..
            } => {
                if !nodes.iter().any(|n| n.id == id) {
                    return Err(NodeBudgetError::node_not_found(id.to_string()));
                }
                *selected_node = Some(id);
            }
        }
        self.push_graph();
        Ok(())
    }

    /// React to a surface event; taps on the hub are ignored
    pub fn handle_event(&mut self, event: SurfaceEvent) -> NodeBudgetResult<()> {
        match event {
            SurfaceEvent::NodeTapped(VertexId::Hub) => Ok(()),
            SurfaceEvent::NodeTapped(VertexId::Node(id)) => self.select_node(id),
        }
    }

    /// Resolve a node by name (case-insensitive) or id
    pub fn find_node(&self, identifier: &str) -> NodeBudgetResult<&BudgetNode> {
        let (_, nodes, _) = self.active()?;
        let wanted = identifier.trim();

        nodes
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(wanted))
            .or_else(|| nodes.iter().find(|n| n.id.matches(wanted)))
            .ok_or_else(|| NodeBudgetError::node_not_found(wanted))
    }

    /// Replace the node set; the selection is cleared on success
    pub fn apply_node_set_edit(&mut self, proposed: &[NodeProposal]) -> NodeBudgetResult<NodeSetEditOutcome> {
        let (budget_id, total) = {
            let (budget, _, _) = self.active()?;
            (budget.id, budget.total_amount)
        };

        let result = NodeSetService::new(self.store).apply_node_set_edit(budget_id, total, proposed);

        let nodes = match &result {
            Ok(outcome) => Some(outcome.nodes.clone()),
            // The old set was deleted and the new one never written
            Err(e) if e.is_partial_apply() => Some(Vec::new()),
            Err(_) => None,
        };
        let Some(nodes) = nodes else {
            return result;
        };

        if let ViewState::BudgetActive {
            nodes: current,
            selected_node,
            ..
        } = &mut self.state
        {
            *current = nodes;
            *selected_node = None;
        }
        self.push_graph();

        result
    }

    /// Record an expense against `node_id`, or the selected node if `None`
    pub fn record_expense<F>(
        &self,
        node_id: Option<NodeId>,
        item_name: &str,
        amount: Money,
        note: Option<String>,
        confirm: F,
    ) -> NodeBudgetResult<RecordOutcome>
    where
        F: FnOnce(&OverBudgetWarning) -> bool,
    {
        let (_, nodes, selected) = self.active()?;
        let node_id = node_id.or(selected).ok_or_else(|| {
            NodeBudgetError::InvalidInput("No node selected; pick one with --node or 'select'".into())
        })?;
        let node = nodes
            .iter()
            .find(|n| n.id == node_id)
            .ok_or_else(|| NodeBudgetError::node_not_found(node_id.to_string()))?;

        LedgerService::new(self.store).record_expense(node, item_name, amount, note, confirm)
    }

    pub fn delete_expense(&self, id: ExpenseId) -> NodeBudgetResult<Expense> {
        self.active()?;
        LedgerService::new(self.store).delete_expense(id)
    }

    /// Live expenses, newest first, optionally for one node
    pub fn expenses(&self, node_id: Option<NodeId>) -> NodeBudgetResult<Vec<Expense>> {
        let (_, nodes, _) = self.active()?;
        let live = LedgerService::new(self.store).live_expenses(nodes)?;
        Ok(match node_id {
            Some(id) => expenses_for_node(&live, id).into_iter().cloned().collect(),
            None => live,
        })
    }

    /// Current figures, folded from the ledger on every call
    pub fn summary(&self) -> NodeBudgetResult<BudgetSummary> {
        let (budget, nodes, selected) = self.active()?;
        let ledger = LedgerService::new(self.store);
        let live = ledger.live_expenses(nodes)?;

        let node_summaries: Vec<NodeSummary> = nodes
            .iter()
            .map(|node| NodeSummary {
                node: node.clone(),
                figures: DerivedFigures::for_node(node, &live),
            })
            .collect();

        let selected = selected.and_then(|id| node_summaries.iter().find(|s| s.node.id == id).cloned());

        Ok(BudgetSummary {
            budget: budget.clone(),
            total: DerivedFigures::for_total(budget.total_amount, &live),
            nodes: node_summaries,
            selected,
            orphaned_expenses: ledger.orphans()?.len(),
        })
    }

    pub fn graph(&self) -> NodeBudgetResult<AllocationGraph> {
        let (budget, nodes, selected) = self.active()?;
        Ok(AllocationGraph::build(budget, nodes, selected, &self.currency_symbol))
    }

    fn push_graph(&mut self) {
        let graph = match self.graph() {
            Ok(graph) => graph,
            Err(_) => return,
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.render(&graph);
        }
    }
}
