//! Entity model
//!
//! Represents one unit receiving seats (a state, district, province...).
//! Each entity has:
//! - Unique identifier (e.g., "CA")
//! - Population (immutable input)
//! - Assigned seats (engine output, overwritten on every apportionment)
//!
//! CRITICAL: Population and seats are u64 counts, never floats

use serde::{Deserialize, Serialize};

/// A single seat-receiving entity
///
/// # Example
/// ```
/// use apportionment_core_rs::Entity;
///
/// let mut entity = Entity::new("CA".to_string(), 39_538_223);
/// assert_eq!(entity.seats(), 0);
///
/// entity.set_seats(52);
/// assert_eq!(entity.seats(), 52);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique entity identifier
    id: String,

    /// Population count, fixed for the lifetime of the table
    population: u64,

    /// Seats assigned by the last apportionment call
    seats: u64,
}

impl Entity {
    /// Create a new entity with zero seats
    pub fn new(id: String, population: u64) -> Self {
        Self {
            id,
            population,
            seats: 0,
        }
    }

    /// Get entity ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get population
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Get currently assigned seats
    pub fn seats(&self) -> u64 {
        self.seats
    }

    /// Overwrite assigned seats
    pub fn set_seats(&mut self, seats: u64) {
        self.seats = seats;
    }

    /// Seats per million inhabitants (0.0 for an empty entity)
    pub fn seats_per_million(&self) -> f64 {
        if self.population == 0 {
            return 0.0;
        }
        self.seats as f64 / self.population as f64 * 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_has_no_seats() {
        let entity = Entity::new("WY".to_string(), 576_851);
        assert_eq!(entity.id(), "WY");
        assert_eq!(entity.population(), 576_851);
        assert_eq!(entity.seats(), 0);
    }

    #[test]
    fn test_seats_per_million_zero_population() {
        let mut entity = Entity::new("EMPTY".to_string(), 0);
        entity.set_seats(3);
        assert_eq!(entity.seats_per_million(), 0.0);
    }

    #[test]
    fn test_seats_per_million() {
        let mut entity = Entity::new("X".to_string(), 2_000_000);
        entity.set_seats(3);
        assert!((entity.seats_per_million() - 1.5).abs() < 1e-12);
    }
}
