mod inventory;
mod store;

pub use inventory::{Dimension, Inventory};
pub use store::{load_inventory, InventoryStore, MemoryInventoryStore};
