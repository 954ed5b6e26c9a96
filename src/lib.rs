//! Game Dev Combo Finder Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod cli_style;
pub mod combos;
pub mod config;
pub mod inventory;
pub mod repl;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use combos::{load_table, ComboTable, Rating, RatingFilter};
pub use inventory::{Dimension, Inventory, InventoryStore};
pub use sqlite_persistence::{SqliteInventoryStore, INVENTORY_DB_FILE_NAME};
