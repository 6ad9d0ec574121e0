//! Domain models for the apportionment engine

pub mod entity;
pub mod table;

// Re-exports
pub use entity::Entity;
pub use table::EntityTable;
