//! Budget node (category) models
//!
//! A node is a named percentage share of a budget. Its allocated amount is
//! always derived from the budget total; it is never accepted from input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, NodeId};
use super::money::Money;
use super::percentage::Percentage;

/// A persisted category of a budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetNode {
    /// Unique identifier, minted fresh on every node set edit
    pub id: NodeId,

    /// The budget this node belongs to
    pub budget_id: BudgetId,

    /// Category name (trimmed, never blank)
    pub name: String,

    /// Share of the budget total
    pub percentage: Percentage,

    /// `total * percentage / 100`, in cents
    pub allocated_amount: Money,

    /// Position within the node set
    pub position: i32,

    /// When the node was created
    pub created_at: DateTime<Utc>,
}

impl BudgetNode {
    /// Build a node from a proposal with an already-derived allocation
    pub fn from_proposal(
        budget_id: BudgetId,
        proposal: &NodeProposal,
        allocated_amount: Money,
        position: i32,
    ) -> Self {
        Self {
            id: NodeId::new(),
            budget_id,
            name: proposal.name.trim().to_string(),
            percentage: proposal.percentage,
            allocated_amount,
            position,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for BudgetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.percentage)
    }
}

/// A user-proposed node: name and share only
///
/// Also used for the configurable default partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeProposal {
    pub name: String,
    pub percentage: Percentage,
}

impl NodeProposal {
    pub fn new(name: impl Into<String>, percentage: Percentage) -> Self {
        Self {
            name: name.into(),
            percentage,
        }
    }

    /// Parse `NAME=PCT`, e.g. `Rent=33.5`
    pub fn parse_assignment(s: &str) -> Result<Self, String> {
        let (name, pct) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("Expected NAME=PERCENT, got '{}'", s))?;
        let percentage = Percentage::parse(pct).map_err(|e| e.to_string())?;
        Ok(Self::new(name.trim(), percentage))
    }
}

/// The built-in partition used when settings do not override it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultNode {
    Investment,
    Wants,
    Needs,
}

impl DefaultNode {
    /// All default nodes in display order
    pub fn all() -> &'static [Self] {
        &[Self::Investment, Self::Wants, Self::Needs]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Investment => "Investment",
            Self::Wants => "Wants",
            Self::Needs => "Needs",
        }
    }

    pub fn percentage(&self) -> Percentage {
        match self {
            Self::Investment => Percentage::from_whole(20),
            Self::Wants => Percentage::from_whole(30),
            Self::Needs => Percentage::from_whole(50),
        }
    }

    pub fn to_proposal(&self) -> NodeProposal {
        NodeProposal::new(self.name(), self.percentage())
    }

    /// The whole default partition as proposals
    pub fn partition() -> Vec<NodeProposal> {
        Self::all().iter().map(Self::to_proposal).collect()
    }
}

/// Rules a proposed node set can break, reported first-violation-wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The node at `index` has a blank (or whitespace-only) name
    BlankName { index: usize },
    /// The node at `index` has a percentage outside [0, 100]
    PercentageOutOfRange { index: usize, percentage: Percentage },
    /// Percentages do not sum to 100 within 0.01
    PercentageSum { total: Percentage },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankName { index } => {
                write!(f, "All nodes must have a name (node #{} is blank)", index + 1)
            }
            Self::PercentageOutOfRange { index, percentage } => write!(
                f,
                "Node #{} has percentage {} outside 0%..100%",
                index + 1,
                percentage
            ),
            Self::PercentageSum { total } => {
                write!(f, "Percentages must total 100% (currently {})", total)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_partition() {
        let partition = DefaultNode::partition();
        let names: Vec<_> = partition.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Investment", "Wants", "Needs"]);

        let total: Percentage = partition.iter().map(|p| p.percentage).sum();
        assert_eq!(total, Percentage::full());
    }

    #[test]
    fn test_from_proposal_trims_name() {
        let budget_id = BudgetId::new();
        let proposal = NodeProposal::new("  Rent  ", Percentage::from_whole(40));
        let node = BudgetNode::from_proposal(budget_id, &proposal, Money::from_units(400), 2);

        assert_eq!(node.name, "Rent");
        assert_eq!(node.budget_id, budget_id);
        assert_eq!(node.position, 2);
        assert_eq!(node.percentage, Percentage::from_whole(40));
    }

    #[test]
    fn test_parse_assignment() {
        let p = NodeProposal::parse_assignment("Eating out=12.5").unwrap();
        assert_eq!(p.name, "Eating out");
        assert_eq!(p.percentage.basis_points(), 1250);

        assert!(NodeProposal::parse_assignment("Rent").is_err());
        assert!(NodeProposal::parse_assignment("Rent=lots").is_err());
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::BlankName { index: 1 }.to_string(),
            "All nodes must have a name (node #2 is blank)"
        );
        assert_eq!(
            ValidationError::PercentageSum {
                total: Percentage::from_basis_points(10_002)
            }
            .to_string(),
            "Percentages must total 100% (currently 100.02%)"
        );
    }
}
