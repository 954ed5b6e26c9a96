use super::inventory::{Dimension, Inventory};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

pub trait InventoryStore: Send + Sync {
    /// Returns the owned list stored for the given dimension.
    /// A selection that was never saved is an empty list, not an error.
    fn get_owned(&self, dimension: Dimension) -> Result<Vec<String>>;

    /// Replaces the owned list stored for the given dimension.
    fn set_owned(&self, dimension: Dimension, values: &[String]) -> Result<()>;
}

/// Reads both dimensions from the store into a fresh `Inventory`.
pub fn load_inventory(store: &dyn InventoryStore) -> Result<Inventory> {
    let genres = store.get_owned(Dimension::Genre)?;
    let types = store.get_owned(Dimension::Type)?;
    Ok(Inventory::new(genres, types))
}

/// In-memory store for tests and dry runs. Nothing survives the process.
#[derive(Default)]
pub struct MemoryInventoryStore {
    values: Mutex<HashMap<&'static str, Vec<String>>>,
}

impl InventoryStore for MemoryInventoryStore {
    fn get_owned(&self, dimension: Dimension) -> Result<Vec<String>> {
        let values = self.values.lock().unwrap();
        Ok(values
            .get(dimension.store_key())
            .cloned()
            .unwrap_or_default())
    }

    fn set_owned(&self, dimension: Dimension, values: &[String]) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(dimension.store_key(), values.to_vec());
        Ok(())
    }
}
