//! Huntington-Hill method (equal proportions)
//!
//! Every entity starts with one seat. Each remaining seat goes to the entity
//! with the highest priority value
//!
//! ```text
//! priority = population / sqrt(n * (n + 1))      n = seats held so far
//! ```
//!
//! This is a priority-list method, not a divisor search: it always finishes in
//! exactly `S - entity_count` steps.
//!
//! # Failure Mode
//!
//! With more entities than seats the one-seat baseline cannot be met. The
//! method then reports `MoreEntitiesThanSeats` and leaves every entity at its
//! baseline of one seat, so the table total does not match the request.

use super::{validate_inputs, ApportionError, ApportionmentMethod};
use crate::models::EntityTable;
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Huntington-Hill apportionment
///
/// # Example
///
/// ```
/// use apportionment_core_rs::methods::{ApportionmentMethod, HuntingtonHillMethod};
/// use apportionment_core_rs::EntityTable;
///
/// let mut table: EntityTable = vec![
///     ("A".to_string(), 1_000),
///     ("B".to_string(), 10),
/// ]
/// .into_iter()
/// .collect();
///
/// HuntingtonHillMethod.apportion(&mut table, 4).unwrap();
/// assert_eq!(table.seats(), vec![3, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HuntingtonHillMethod;

/// Priority-queue entry
///
/// Orders by priority value, then by *lower* table index, so the heap top is
/// the first entity in table order holding the strictly largest priority.
#[derive(Debug, Clone, Copy)]
struct Claim {
    priority: f64,
    index: usize,
}

impl Claim {
    fn new(population: u64, seats: u64, index: usize) -> Self {
        let n = seats as f64;
        Self {
            priority: population as f64 / (n * (n + 1.0)).sqrt(),
            index,
        }
    }
}

impl PartialEq for Claim {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Claim {}

impl PartialOrd for Claim {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Claim {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl ApportionmentMethod for HuntingtonHillMethod {
    fn name(&self) -> &'static str {
        "Huntington-Hill"
    }

    fn apportion(&self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError> {
        validate_inputs(table, total_seats)?;

        for entity in table.iter_mut() {
            entity.set_seats(1);
        }

        let entities = table.len();
        if entities as u64 > total_seats {
            return Err(ApportionError::MoreEntitiesThanSeats {
                entities,
                seats: total_seats,
            });
        }

        let populations = table.populations();
        let mut seats = vec![1u64; entities];
        let mut heap: BinaryHeap<Claim> = populations
            .iter()
            .enumerate()
            .map(|(index, &population)| Claim::new(population, 1, index))
            .collect();

        for _ in 0..(total_seats - entities as u64) {
            let Some(top) = heap.pop() else { break };
            seats[top.index] += 1;
            heap.push(Claim::new(populations[top.index], seats[top.index], top.index));
        }

        debug!(
            "{}: {} baseline seats, {} by priority",
            self.name(),
            entities,
            total_seats - entities as u64
        );
        table.assign_seats(&seats);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, u64)]) -> EntityTable {
        rows.iter().map(|(id, p)| (id.to_string(), *p)).collect()
    }

    #[test]
    fn test_claim_ordering_prefers_lower_index_on_tie() {
        let first = Claim { priority: 5.0, index: 0 };
        let second = Claim { priority: 5.0, index: 1 };
        assert!(first > second);

        let mut heap = BinaryHeap::from(vec![second, first]);
        assert_eq!(heap.pop().unwrap().index, 0);
    }

    #[test]
    fn test_priority_values() {
        // 1000 / sqrt(1 * 2)
        let claim = Claim::new(1000, 1, 0);
        assert!((claim.priority - 707.106_781_186_547_5).abs() < 1e-9);
    }

    #[test]
    fn test_more_entities_than_seats_leaves_baseline() {
        let mut t = table(&[("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5), ("F", 6)]);
        let err = HuntingtonHillMethod.apportion(&mut t, 5).unwrap_err();

        assert_eq!(err, ApportionError::MoreEntitiesThanSeats { entities: 6, seats: 5 });
        assert_eq!(t.seats(), vec![1; 6]);
        assert_ne!(t.total_seats(), 5);
    }

    #[test]
    fn test_exactly_one_seat_each() {
        let mut t = table(&[("A", 1_000_000), ("B", 10)]);
        HuntingtonHillMethod.apportion(&mut t, 2).unwrap();
        assert_eq!(t.seats(), vec![1, 1]);
    }

    #[test]
    fn test_zero_population_entity_keeps_baseline() {
        let mut t = table(&[("A", 500), ("B", 0), ("C", 500)]);
        HuntingtonHillMethod.apportion(&mut t, 7).unwrap();

        assert_eq!(t.get("B").unwrap().seats(), 1);
        assert_eq!(t.total_seats(), 7);
    }
}
