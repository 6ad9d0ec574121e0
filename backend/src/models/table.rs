//! Entity Table
//!
//! In-memory collection of all entities taking part in an apportionment.
//! Loaded once, then mutated in place by every apportionment call.
//!
//! # Iteration Order
//!
//! Entities are stored in a `BTreeMap`, so every iteration visits them in
//! lexicographic order of their IDs. The largest-remainder and
//! equal-proportions methods break ties in favour of the entity visited
//! first, which makes "first encountered" mean "smallest ID".
//!
//! # Critical Invariants
//!
//! 1. **Fixed Population**: Populations never change after insertion
//! 2. **Unique IDs**: Each ID maps to exactly one entity
//! 3. **Seat Total**: After a successful apportionment, `total_seats()` equals
//!    the requested seat count

use crate::models::entity::Entity;
use std::collections::BTreeMap;

/// Ordered mapping from entity ID to entity
///
/// # Example
///
/// ```rust
/// use apportionment_core_rs::EntityTable;
///
/// let mut table = EntityTable::new();
/// table.insert("B".to_string(), 100);
/// table.insert("A".to_string(), 300);
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.total_population(), Some(400));
/// assert_eq!(table.ids(), vec!["A", "B"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTable {
    entities: BTreeMap<String, Entity>,
}

impl EntityTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Insert an entity with zero seats
    ///
    /// A duplicate ID replaces the earlier entity (last row wins).
    pub fn insert(&mut self, id: String, population: u64) {
        self.entities
            .insert(id.clone(), Entity::new(id, population));
    }

    /// Get reference to an entity by ID
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get mutable reference to an entity by ID
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the table holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate entities in table order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterate entities mutably in table order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Sum of all populations (P), `None` if it does not fit in a `u64`
    pub fn total_population(&self) -> Option<u64> {
        self.entities
            .values()
            .try_fold(0u64, |total, e| total.checked_add(e.population()))
    }

    /// Sum of all assigned seats
    pub fn total_seats(&self) -> u64 {
        self.entities.values().map(Entity::seats).sum()
    }

    /// Largest single population (0 for an empty table)
    pub fn max_population(&self) -> u64 {
        self.entities
            .values()
            .map(Entity::population)
            .max()
            .unwrap_or(0)
    }

    /// Zero every seat count
    pub fn reset_seats(&mut self) {
        for entity in self.entities.values_mut() {
            entity.set_seats(0);
        }
    }

    /// IDs in table order
    pub fn ids(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    /// Population column in table order
    pub fn populations(&self) -> Vec<u64> {
        self.entities.values().map(Entity::population).collect()
    }

    /// Seat column in table order
    pub fn seats(&self) -> Vec<u64> {
        self.entities.values().map(Entity::seats).collect()
    }

    /// Overwrite seats from a column in table order
    ///
    /// # Panics
    ///
    /// Panics if `seats.len()` differs from the number of entities.
    pub fn assign_seats(&mut self, seats: &[u64]) {
        assert_eq!(
            seats.len(),
            self.entities.len(),
            "seat column length must match entity count"
        );
        for (entity, &count) in self.entities.values_mut().zip(seats) {
            entity.set_seats(count);
        }
    }
}

impl FromIterator<(String, u64)> for EntityTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut table = EntityTable::new();
        for (id, population) in iter {
            table.insert(id, population);
        }
        table
    }
}

impl<'a> IntoIterator for &'a EntityTable {
    type Item = &'a Entity;
    type IntoIter = std::collections::btree_map::Values<'a, String, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.values()
    }
}
