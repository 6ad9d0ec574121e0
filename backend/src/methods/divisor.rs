//! Divisor search shared by Jefferson, Webster and Adams
//!
//! All three methods start from the standard divisor `floor(P / S)`, assign
//! `round(population / divisor)` seats with their own rounding rule, and walk
//! the divisor one unit at a time until the seat total matches. The step is
//! always exactly 1: the first integer divisor reached decides the
//! allocation, so a faster search could settle on a different divisor with a
//! different tie structure.
//!
//! # Termination Guards
//!
//! Seat counts are monotone in the divisor (smaller divisor, never fewer
//! seats), which gives three fail-fast exits instead of an endless loop:
//!
//! - the divisor would reach zero → `DivisorExhausted`
//! - the walk changes direction (the total jumped over the target between two
//!   adjacent divisors) → `NoExactDivisor`
//! - the divisor grows past `2 * max_population`, where no rounding rule can
//!   lower any seat count further → `NoExactDivisor`

use super::ApportionError;
use crate::models::EntityTable;
use log::debug;

/// Rounding rule applied to `population / divisor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// floor (Jefferson)
    Down,
    /// round half up (Webster)
    Nearest,
    /// ceiling (Adams)
    Up,
}

impl Rounding {
    /// Seats for one entity at `divisor`, computed in exact integer arithmetic
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    pub fn seats(self, population: u64, divisor: u64) -> u64 {
        assert!(divisor > 0, "divisor must be positive");
        match self {
            Rounding::Down => population / divisor,
            // floor(p/d + 1/2) == floor((2p + d) / 2d)
            Rounding::Nearest => {
                let p = population as u128;
                let d = divisor as u128;
                ((2 * p + d) / (2 * d)) as u64
            }
            Rounding::Up => population.div_ceil(divisor),
        }
    }
}

/// Which way the search may move the divisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Only decrease (Jefferson)
    DecreasingOnly,
    /// Increase when over target, decrease when under (Webster, Adams)
    Bidirectional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Increase,
    Decrease,
}

/// Write seats for every entity at `divisor` and return their sum
pub fn assign_at(table: &mut EntityTable, divisor: u64, rounding: Rounding) -> u64 {
    let mut assigned = 0;
    for entity in table.iter_mut() {
        let seats = rounding.seats(entity.population(), divisor);
        entity.set_seats(seats);
        assigned += seats;
    }
    assigned
}

/// Walk the divisor in unit steps until the table holds exactly `total_seats`
///
/// Returns the divisor that produced the allocation. Inputs are assumed
/// validated (non-empty table, positive seats and population).
pub fn linear_search(
    method: &'static str,
    table: &mut EntityTable,
    total_seats: u64,
    total_population: u64,
    rounding: Rounding,
    direction: SearchDirection,
) -> Result<u64, ApportionError> {
    let mut divisor = total_population / total_seats;
    if divisor == 0 {
        return Err(ApportionError::DivisorExhausted {
            method,
            assigned: 0,
            target: total_seats,
        });
    }

    let ceiling = table.max_population().saturating_mul(2);
    let mut assigned = assign_at(table, divisor, rounding);
    let mut previous: Option<Step> = None;
    let mut steps = 0u64;

    while assigned != total_seats {
        let step = if assigned > total_seats {
            Step::Increase
        } else {
            Step::Decrease
        };

        let reversed = previous.is_some_and(|p| p != step);
        let blocked = step == Step::Increase
            && (direction == SearchDirection::DecreasingOnly || divisor > ceiling);
        if reversed || blocked {
            return Err(ApportionError::NoExactDivisor {
                method,
                divisor,
                assigned,
                target: total_seats,
            });
        }

        divisor = match step {
            Step::Increase => divisor + 1,
            Step::Decrease => divisor - 1,
        };
        if divisor == 0 {
            return Err(ApportionError::DivisorExhausted {
                method,
                assigned,
                target: total_seats,
            });
        }

        assigned = assign_at(table, divisor, rounding);
        previous = Some(step);
        steps += 1;
    }

    debug!(
        "{}: divisor {} assigns {} seats after {} step(s)",
        method, divisor, assigned, steps
    );
    Ok(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_rules() {
        assert_eq!(Rounding::Down.seats(25, 10), 2);
        assert_eq!(Rounding::Nearest.seats(25, 10), 3); // half rounds up
        assert_eq!(Rounding::Nearest.seats(24, 10), 2);
        assert_eq!(Rounding::Up.seats(21, 10), 3);
        assert_eq!(Rounding::Up.seats(20, 10), 2);
        assert_eq!(Rounding::Up.seats(0, 10), 0);
    }

    #[test]
    #[should_panic(expected = "divisor must be positive")]
    fn test_zero_divisor_panics() {
        Rounding::Down.seats(10, 0);
    }

    #[test]
    fn test_search_accepts_standard_divisor() {
        // P=10, S=2 → d=5; round(1.2) + round(0.8) = 2 on the first pass
        let mut table: EntityTable = vec![("A".to_string(), 6), ("B".to_string(), 4)]
            .into_iter()
            .collect();
        let d = linear_search("test", &mut table, 2, 10, Rounding::Nearest, SearchDirection::Bidirectional)
            .unwrap();
        assert_eq!(d, 5);
        assert_eq!(table.total_seats(), 2);
    }

    #[test]
    fn test_decreasing_only_reports_overshoot() {
        // P=10, S=4 → d=2; floor gives 2+3=5 > 4 and cannot come back down
        let mut table: EntityTable = vec![("A".to_string(), 4), ("B".to_string(), 6)]
            .into_iter()
            .collect();
        let err = linear_search("Jefferson", &mut table, 4, 10, Rounding::Down, SearchDirection::DecreasingOnly)
            .unwrap_err();
        assert!(matches!(err, ApportionError::NoExactDivisor { divisor: 2, assigned: 5, .. }));
    }

    #[test]
    fn test_divisor_below_one_is_exhausted() {
        let mut table: EntityTable = vec![("A".to_string(), 1), ("B".to_string(), 1)]
            .into_iter()
            .collect();
        let err = linear_search("Jefferson", &mut table, 5, 2, Rounding::Down, SearchDirection::DecreasingOnly)
            .unwrap_err();
        assert!(matches!(err, ApportionError::DivisorExhausted { .. }));
    }
}
