use super::versioned_schema::{Table, VersionedSchema, BASE_DB_VERSION};
use crate::inventory::{Dimension, InventoryStore};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

pub const INVENTORY_DB_FILE_NAME: &str = "combo_inventory.db";

/// V 0
const OWNED_SELECTION_TABLE_V_0: Table = Table {
    name: "owned_selection",
    schema: "CREATE TABLE owned_selection (key TEXT NOT NULL UNIQUE, value TEXT NOT NULL, updated INTEGER DEFAULT (cast(strftime('%s','now') as int)), PRIMARY KEY (key));",
    indices: &[],
};

fn create_v0(conn: &Connection, schema: &VersionedSchema) -> Result<()> {
    for table in schema.tables {
        conn.execute(table.schema, [])?;
        for index in table.indices {
            conn.execute(index, [])?;
        }
    }
    conn.execute(
        &format!("PRAGMA user_version = {}", BASE_DB_VERSION + schema.version),
        [],
    )?;
    Ok(())
}

fn validate_schema_0(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA table_info({});",
        OWNED_SELECTION_TABLE_V_0.name
    ))?;
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get(1))?
        .collect::<Result<_, _>>()?;

    if columns != ["key", "value", "updated"] {
        bail!(
            "Schema validation failed for owned_selection table, found {:?}",
            columns
        );
    }

    Ok(())
}

const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[OWNED_SELECTION_TABLE_V_0],
    create: create_v0,
    migration: None,
    validate: validate_schema_0,
}];

/// Owned-selection store backed by a single key-value table. Each dimension's
/// list is one row, serialized as a JSON string array.
pub struct SqliteInventoryStore {
    conn: Mutex<Connection>,
}

impl SqliteInventoryStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = if db_path.as_ref().exists() {
            Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            let conn = Connection::open(db_path)?;
            Self::create_schema(&conn)?;
            conn
        };

        // Read the database version
        let raw_version: usize = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .context("Failed to read database version")?;
        let version = raw_version
            .checked_sub(BASE_DB_VERSION)
            .with_context(|| format!("Not an inventory database, user_version {}", raw_version))?;

        if version >= VERSIONED_SCHEMAS.len() {
            bail!("Database version {} is too new", version);
        }
        (VERSIONED_SCHEMAS
            .get(version)
            .context("Failed to get schema")?
            .validate)(&conn)?;

        Self::migrate_if_needed(&conn, version)?;

        Ok(SqliteInventoryStore {
            conn: Mutex::new(conn),
        })
    }

    /// Looks for an existing inventory database in the current directory or
    /// any of its parents.
    pub fn infer_path() -> Option<PathBuf> {
        let mut current_dir = std::env::current_dir().ok()?;

        loop {
            let candidate = current_dir.join(INVENTORY_DB_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }
        None
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        let latest_version = VERSIONED_SCHEMAS.last().unwrap();
        let create_fn = latest_version.create;
        create_fn(conn, latest_version)
    }

    fn migrate_if_needed(conn: &Connection, version: usize) -> Result<()> {
        let mut latest_from = version;
        for schema in VERSIONED_SCHEMAS.iter().skip(version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating db from version {} to {}",
                    latest_from, schema.version
                );
                migration_fn(conn)?;
                latest_from = schema.version;
            }
        }
        conn.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + latest_from),
            [],
        )?;

        Ok(())
    }
}

impl InventoryStore for SqliteInventoryStore {
    fn get_owned(&self, dimension: Dimension) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let value: Option<String> = conn
            .query_row(
                &format!(
                    "SELECT value FROM {} WHERE key = ?1",
                    OWNED_SELECTION_TABLE_V_0.name
                ),
                params![dimension.store_key()],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(json) => serde_json::from_str(&json).with_context(|| {
                format!("Failed to parse stored list for {}", dimension.store_key())
            }),
            None => Ok(Vec::new()),
        }
    }

    fn set_owned(&self, dimension: Dimension, values: &[String]) -> Result<()> {
        let json = serde_json::to_string(values)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
                OWNED_SELECTION_TABLE_V_0.name
            ),
            params![dimension.store_key(), json],
        )
        .with_context(|| format!("Failed to store list for {}", dimension.store_key()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteInventoryStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("test.db");
        let store = SqliteInventoryStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    fn values(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn fresh_store_has_empty_lists() {
        let (store, _temp_dir) = create_tmp_store();
        assert!(store.get_owned(Dimension::Genre).unwrap().is_empty());
        assert!(store.get_owned(Dimension::Type).unwrap().is_empty());
    }

    #[test]
    fn set_then_get_returns_the_same_list() {
        let (store, _temp_dir) = create_tmp_store();

        store
            .set_owned(Dimension::Genre, &values(&["RPG", "Puzzle"]))
            .unwrap();
        store
            .set_owned(Dimension::Type, &values(&["Fantasy"]))
            .unwrap();

        assert_eq!(
            store.get_owned(Dimension::Genre).unwrap(),
            values(&["RPG", "Puzzle"])
        );
        assert_eq!(
            store.get_owned(Dimension::Type).unwrap(),
            values(&["Fantasy"])
        );
    }

    #[test]
    fn set_replaces_the_previous_list() {
        let (store, _temp_dir) = create_tmp_store();

        store
            .set_owned(Dimension::Genre, &values(&["RPG"]))
            .unwrap();
        store
            .set_owned(Dimension::Genre, &values(&["Puzzle", "Shooter"]))
            .unwrap();

        assert_eq!(
            store.get_owned(Dimension::Genre).unwrap(),
            values(&["Puzzle", "Shooter"])
        );
    }

    #[test]
    fn lists_survive_reopening_the_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let store = SqliteInventoryStore::new(&db_path).unwrap();
            store
                .set_owned(Dimension::Type, &values(&["Fantasy", "Marathon"]))
                .unwrap();
        }

        let store = SqliteInventoryStore::new(&db_path).unwrap();
        assert_eq!(
            store.get_owned(Dimension::Type).unwrap(),
            values(&["Fantasy", "Marathon"])
        );
        assert!(store.get_owned(Dimension::Genre).unwrap().is_empty());
    }

    #[test]
    fn rejects_a_database_created_by_something_else() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("other.db");

        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE other (id INTEGER)", []).unwrap();
        }

        assert!(SqliteInventoryStore::new(&db_path).is_err());
    }

    #[test]
    fn rejects_a_database_with_a_newer_version() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("newer.db");

        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute(
                &format!("PRAGMA user_version = {}", BASE_DB_VERSION + 42),
                [],
            )
            .unwrap();
        }

        assert!(SqliteInventoryStore::new(&db_path).is_err());
    }

    #[test]
    fn rejects_a_tampered_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("tampered.db");

        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE owned_selection (key TEXT, garbage TEXT)", [])
                .unwrap();
            conn.execute(&format!("PRAGMA user_version = {}", BASE_DB_VERSION), [])
                .unwrap();
        }

        assert!(SqliteInventoryStore::new(&db_path).is_err());
    }
}
