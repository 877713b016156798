//! Allocation service
//!
//! Turns percentages into currency amounts and guards the node set rules:
//! every node named, every share within [0%, 100%], and the shares summing to
//! 100% within 0.01.

use tracing::info;

use crate::error::{NodeBudgetError, NodeBudgetResult};
use crate::models::{Budget, BudgetId, BudgetNode, Money, NodeProposal, Percentage, ValidationError};
use crate::storage::BudgetStore;

/// `total * percentage / 100`, rounded half-up to the cent
pub fn derive_allocated_amount(total: Money, percentage: Percentage) -> Money {
    total.share(percentage)
}

/// Allocate `total` across a whole set of shares
///
/// Uses the largest-remainder method: every amount is within one cent of its
/// exact share and the amounts add up to `total * sum(shares) / 100`, so a set
/// summing to exactly 100% hands out exactly `total`. Ties go to the earlier
/// share.
pub fn derive_allocations(total: Money, percentages: &[Percentage]) -> Vec<Money> {
    let scale = i128::from(Percentage::SCALE);
    let total_cents = i128::from(total.cents());

    let mut floors = Vec::with_capacity(percentages.len());
    let mut remainders = Vec::with_capacity(percentages.len());
    for (index, pct) in percentages.iter().enumerate() {
        let exact = total_cents * i128::from(pct.basis_points());
        floors.push(exact.div_euclid(scale));
        remainders.push((exact.rem_euclid(scale), index));
    }

    let sum_pct: Percentage = percentages.iter().copied().sum();
    let target = i128::from(total.share(sum_pct).cents());
    let handed_out: i128 = floors.iter().sum();
    let leftover = usize::try_from(target - handed_out).unwrap_or(0);

    // Largest remainder first, earlier index on ties
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(remainder, index) in remainders.iter().take(leftover) {
        if remainder > 0 {
            floors[index] += 1;
        }
    }

    floors
        .into_iter()
        .map(|cents| Money::from_cents(cents as i64))
        .collect()
}

/// Check a proposed node set, reporting the first broken rule
///
/// Names are checked first, then each share's range, then the sum.
pub fn validate_node_set(nodes: &[NodeProposal]) -> Result<(), ValidationError> {
    if let Some(index) = nodes.iter().position(|n| n.name.trim().is_empty()) {
        return Err(ValidationError::BlankName { index });
    }

    if let Some((index, node)) = nodes
        .iter()
        .enumerate()
        .find(|(_, n)| !n.percentage.is_in_range())
    {
        return Err(ValidationError::PercentageOutOfRange {
            index,
            percentage: node.percentage,
        });
    }

    let total: Percentage = nodes.iter().map(|n| n.percentage).sum();
    if !total.is_full() {
        return Err(ValidationError::PercentageSum { total });
    }

    Ok(())
}

/// Build fresh nodes for `budget_id` with amounts derived from `total`
///
/// Positions follow the proposal order. Does not validate.
pub fn build_nodes(budget_id: BudgetId, total: Money, proposals: &[NodeProposal]) -> Vec<BudgetNode> {
    let percentages: Vec<Percentage> = proposals.iter().map(|p| p.percentage).collect();
    let amounts = derive_allocations(total, &percentages);

    proposals
        .iter()
        .zip(amounts)
        .enumerate()
        .map(|(position, (proposal, allocated))| {
            BudgetNode::from_proposal(budget_id, proposal, allocated, position as i32)
        })
        .collect()
}

/// Service for creating budgets
pub struct AllocationService<'a> {
    store: &'a dyn BudgetStore,
}

impl<'a> AllocationService<'a> {
    pub fn new(store: &'a dyn BudgetStore) -> Self {
        Self { store }
    }

    /// Create a budget and its starting node set
    ///
    /// Everything is validated before the first store call.
    pub fn initialize(
        &self,
        total_amount: Money,
        partition: &[NodeProposal],
    ) -> NodeBudgetResult<(Budget, Vec<BudgetNode>)> {
        let budget = Budget::new(total_amount)
            .map_err(|e| NodeBudgetError::InvalidAmount(e.to_string()))?;
        validate_node_set(partition)?;

        let nodes = build_nodes(budget.id, budget.total_amount, partition);

        let budget = self.store.insert_budget(budget)?;
        let nodes = self.store.insert_nodes(nodes)?;

        info!(
            budget_id = %budget.id,
            total = %budget.total_amount,
            nodes = nodes.len(),
            "Initialized budget"
        );

        Ok((budget, nodes))
    }

    /// Load a budget with its nodes ordered by position
    pub fn load(&self, budget_id: BudgetId) -> NodeBudgetResult<(Budget, Vec<BudgetNode>)> {
        let budget = self
            .store
            .get_budget(budget_id)?
            .ok_or_else(|| NodeBudgetError::budget_not_found(budget_id.to_string()))?;
        let nodes = self.store.list_nodes(budget_id)?;
        Ok((budget, nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::DefaultNode;
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn pct(s: &str) -> Percentage {
        Percentage::parse(s).unwrap()
    }

    fn proposal(name: &str, p: &str) -> NodeProposal {
        NodeProposal::new(name, pct(p))
    }

    #[test]
    fn test_derive_allocated_amount() {
        let total = Money::from_units(10_000);
        assert_eq!(
            derive_allocated_amount(total, pct("20")),
            Money::from_units(2_000)
        );
        // 0.5 cent rounds up
        assert_eq!(
            derive_allocated_amount(Money::from_cents(1), pct("50")),
            Money::from_cents(1)
        );
    }

    #[test]
    fn test_allocations_sum_to_total() {
        let thirds = [pct("33.33"), pct("33.33"), pct("33.34")];
        for cents in [1, 7, 100, 999, 10_001, 123_456_789] {
            let total = Money::from_cents(cents);
            let amounts = derive_allocations(total, &thirds);
            let sum: Money = amounts.iter().copied().sum();
            assert_eq!(sum, total, "total {}", cents);
        }
    }

    #[test]
    fn test_allocations_stay_within_a_cent() {
        let shares = [pct("12.5"), pct("12.5"), pct("75")];
        let total = Money::from_cents(101);
        let amounts = derive_allocations(total, &shares);

        for (amount, share) in amounts.iter().zip(shares) {
            let exact = total.cents() as f64 * share.basis_points() as f64 / 10_000.0;
            assert!((amount.cents() as f64 - exact).abs() < 1.0);
        }
        assert_eq!(amounts.iter().copied().sum::<Money>(), total);
    }

    #[test]
    fn test_allocations_tie_goes_to_first() {
        let amounts = derive_allocations(Money::from_cents(1), &[pct("50"), pct("50")]);
        assert_eq!(amounts, vec![Money::from_cents(1), Money::zero()]);
    }

    #[test]
    fn test_validate_accepts_within_tolerance() {
        let nodes = vec![proposal("A", "50"), proposal("B", "49.99")];
        assert!(validate_node_set(&nodes).is_ok());

        let nodes = vec![proposal("A", "50"), proposal("B", "50.01")];
        assert!(validate_node_set(&nodes).is_ok());
    }

    #[test]
    fn test_validate_rejects_sum() {
        let nodes = vec![proposal("A", "50"), proposal("B", "49.98")];
        assert_eq!(
            validate_node_set(&nodes),
            Err(ValidationError::PercentageSum { total: pct("99.98") })
        );

        let nodes = vec![proposal("A", "50"), proposal("B", "50.02")];
        assert!(matches!(
            validate_node_set(&nodes),
            Err(ValidationError::PercentageSum { .. })
        ));
    }

    #[test]
    fn test_validate_name_checked_first() {
        let nodes = vec![proposal("A", "10"), proposal("   ", "10")];
        assert_eq!(
            validate_node_set(&nodes),
            Err(ValidationError::BlankName { index: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let nodes = vec![proposal("A", "120"), proposal("B", "-20")];
        assert_eq!(
            validate_node_set(&nodes),
            Err(ValidationError::PercentageOutOfRange {
                index: 0,
                percentage: pct("120")
            })
        );
    }

    #[test]
    fn test_validate_empty_set() {
        assert!(matches!(
            validate_node_set(&[]),
            Err(ValidationError::PercentageSum { .. })
        ));
    }

    #[test]
    fn test_initialize_default_partition() {
        let (_temp, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let (budget, nodes) = service
            .initialize(Money::from_units(10_000), &DefaultNode::partition())
            .unwrap();

        let figures: Vec<_> = nodes
            .iter()
            .map(|n| (n.name.as_str(), n.allocated_amount))
            .collect();
        assert_eq!(
            figures,
            vec![
                ("Investment", Money::from_units(2_000)),
                ("Wants", Money::from_units(3_000)),
                ("Needs", Money::from_units(5_000)),
            ]
        );

        let (loaded, loaded_nodes) = service.load(budget.id).unwrap();
        assert_eq!(loaded, budget);
        assert_eq!(loaded_nodes, nodes);
    }

    #[test]
    fn test_initialize_rejects_non_positive_total() {
        let (_temp, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        for total in [Money::zero(), Money::from_units(-5)] {
            let err = service
                .initialize(total, &DefaultNode::partition())
                .unwrap_err();
            assert!(matches!(err, NodeBudgetError::InvalidAmount(_)));
        }
        assert_eq!(storage.budgets.count().unwrap(), 0);
    }

    #[test]
    fn test_initialize_rejects_bad_partition_before_writing() {
        let (_temp, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let err = service
            .initialize(Money::from_units(100), &[proposal("Only", "90")])
            .unwrap_err();
        assert!(matches!(err, NodeBudgetError::ValidationFailed(_)));
        assert_eq!(storage.budgets.count().unwrap(), 0);
        assert_eq!(storage.nodes.count().unwrap(), 0);
    }
}
