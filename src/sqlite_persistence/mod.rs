mod sqlite_inventory_store;
mod versioned_schema;

pub use sqlite_inventory_store::{SqliteInventoryStore, INVENTORY_DB_FILE_NAME};
