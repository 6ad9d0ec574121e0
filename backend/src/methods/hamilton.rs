//! Hamilton's method (largest remainder)
//!
//! Each entity first receives the integer part of its exact quota
//! `population / (P / S)`; the seats left over go one each to the entities
//! with the largest fractional remainders.
//!
//! # Exact Arithmetic
//!
//! `population / (P / S)` equals `population * S / P`, so the integer part is
//! `population * S div P` and the remainder is `(population * S mod P) / P`.
//! Remainders share the denominator `P`, which means they can be compared
//! through their numerators without any floating-point error: an exact quota
//! of 1.0 is never misread as 0.999... and two equal remainders compare equal.
//!
//! # Tie-Breaking
//!
//! Among equal remainders the entity first in table order (smallest ID) wins.
//! Each entity receives at most one extra seat.

use super::{validate_inputs, ApportionError, ApportionmentMethod};
use crate::models::EntityTable;
use log::debug;

/// Hamilton apportionment
///
/// # Example
///
/// ```
/// use apportionment_core_rs::methods::{ApportionmentMethod, HamiltonMethod};
/// use apportionment_core_rs::EntityTable;
///
/// let mut table: EntityTable = vec![
///     ("A".to_string(), 100),
///     ("B".to_string(), 100),
///     ("C".to_string(), 300),
/// ]
/// .into_iter()
/// .collect();
///
/// HamiltonMethod.apportion(&mut table, 5).unwrap();
/// assert_eq!(table.seats(), vec![1, 1, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HamiltonMethod;

/// Integer part and remainder numerator of one entity's quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Quota {
    whole: u64,
    /// Remainder scaled by P (0 <= remainder < P)
    remainder: u128,
}

fn quota(population: u64, total_seats: u64, total_population: u64) -> Quota {
    let scaled = population as u128 * total_seats as u128;
    let p = total_population as u128;
    Quota {
        whole: (scaled / p) as u64,
        remainder: scaled % p,
    }
}

impl ApportionmentMethod for HamiltonMethod {
    fn name(&self) -> &'static str {
        "Hamilton"
    }

    fn apportion(&self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError> {
        let total_population = validate_inputs(table, total_seats)?;

        let quotas: Vec<Quota> = table
            .iter()
            .map(|e| quota(e.population(), total_seats, total_population))
            .collect();

        let mut seats: Vec<u64> = quotas.iter().map(|q| q.whole).collect();
        let assigned: u64 = seats.iter().sum();
        let leftover = (total_seats - assigned) as usize;

        // Stable sort keeps table order among equal remainders
        let mut order: Vec<usize> = (0..quotas.len()).collect();
        order.sort_by(|&a, &b| quotas[b].remainder.cmp(&quotas[a].remainder));

        for &index in order.iter().take(leftover) {
            seats[index] += 1;
        }

        debug!(
            "{}: {} seats from whole quotas, {} by remainder",
            self.name(),
            assigned,
            leftover
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
    fn test_quota_exact() {
        let q = quota(100, 5, 500);
        assert_eq!(q, Quota { whole: 1, remainder: 0 });
    }

    #[test]
    fn test_quota_fractional() {
        // 7 * 3 / 10 = 2.1
        let q = quota(7, 3, 10);
        assert_eq!(q, Quota { whole: 2, remainder: 1 });
    }

    #[test]
    fn test_largest_remainders_win() {
        // quotas: A=2.6, B=3.3, C=1.1 → leftover 1 goes to A
        let mut t = table(&[("A", 26), ("B", 33), ("C", 11)]);
        HamiltonMethod.apportion(&mut t, 7).unwrap();
        assert_eq!(t.seats(), vec![3, 3, 1]);
    }

    #[test]
    fn test_tie_goes_to_first_id() {
        // quotas 0.5 each, one seat available
        let mut t = table(&[("B", 50), ("A", 50)]);
        HamiltonMethod.apportion(&mut t, 1).unwrap();
        assert_eq!(t.get("A").unwrap().seats(), 1);
        assert_eq!(t.get("B").unwrap().seats(), 0);
    }

    #[test]
    fn test_overwrites_stale_seats() {
        let mut t = table(&[("A", 100), ("B", 100), ("C", 300)]);
        t.assign_seats(&[40, 40, 40]);
        HamiltonMethod.apportion(&mut t, 5).unwrap();
        assert_eq!(t.seats(), vec![1, 1, 3]);
    }
}
