//! Storage configuration store
//!
//! Thin data-access layer over the application's storage table. The table is
//! created and migrated by the application itself; this store only ever
//! opens an existing database and refuses to run against a missing table.

mod record;

pub use record::{
    Addition, DEFAULT_STATUS, RecordUpdate, StorageRecord, parse_addition, serialize_addition,
};

use crate::error::{PersistenceError, ValidationError};
use crate::utils::validation::{require_non_empty, validate_table_name};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params, params_from_iter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Table name used by a default OpenList installation
pub const DEFAULT_TABLE: &str = "x_storages";

const BUSY_TIMEOUT_MS: u64 = 5_000;
const COLUMNS: &str = r#"id, mount_path, driver, addition, status, disabled, remark, "order""#;

type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the store: bad input or a persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        StoreError::Persistence(PersistenceError::Sqlite(error))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Persistence(PersistenceError::Serialization(error))
    }
}

impl From<StoreError> for crate::AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Persistence(e) => crate::AppError::Persistence(e),
            StoreError::Validation(e) => crate::AppError::Validation(e),
        }
    }
}

/// Handle on one database file and one storage table
pub struct StorageStore {
    conn: Connection,
    table: String,
    path: PathBuf,
}

impl StorageStore {
    /// Open an existing database. The file is never created here.
    pub fn open<P: AsRef<Path>>(path: P, table: &str) -> Result<Self> {
        let path = path.as_ref();
        validate_table_name(table)?;

        if !path.is_file() {
            return Err(PersistenceError::DatabaseNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;

        log::debug!("opened {} (table {})", path.display(), table);

        Ok(Self {
            conn,
            table: table.to_string(),
            path: path.to_path_buf(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the storage table has been created by the application yet
    pub fn table_exists(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            params![self.table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn ensure_table(&self) -> Result<()> {
        if self.table_exists()? {
            Ok(())
        } else {
            Err(PersistenceError::TableNotFound {
                table: self.table.clone(),
                path: self.path.display().to_string(),
            }
            .into())
        }
    }

    /// All records, ordered by `order` then `id`
    pub fn list(&self) -> Result<Vec<StorageRecord>> {
        self.ensure_table()?;

        let sql = format!(
            r#"SELECT {COLUMNS} FROM {} ORDER BY "order" ASC, id ASC"#,
            self.table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<StorageRecord>> {
        self.ensure_table()?;
        self.find_one("id = ?1", SqlValue::Integer(id))
    }

    /// First record using `driver`, if any
    pub fn find_by_driver(&self, driver: &str) -> Result<Option<StorageRecord>> {
        require_non_empty("driver", driver)?;
        self.ensure_table()?;
        self.find_one("driver = ?1", SqlValue::Text(driver.to_string()))
    }

    /// First record mounted at `mount_path`, if any
    pub fn find_by_mount_path(&self, mount_path: &str) -> Result<Option<StorageRecord>> {
        require_non_empty("mount_path", mount_path)?;
        self.ensure_table()?;
        self.find_one("mount_path = ?1", SqlValue::Text(mount_path.to_string()))
    }

    fn find_one(&self, predicate: &str, value: SqlValue) -> Result<Option<StorageRecord>> {
        let sql = format!(
            r#"SELECT {COLUMNS} FROM {} WHERE {predicate} ORDER BY "order" ASC, id ASC LIMIT 1"#,
            self.table
        );
        let record = self
            .conn
            .query_row(&sql, params![value], map_record)
            .optional()?;
        Ok(record)
    }

    /// Insert a new record after the current highest `order`.
    ///
    /// The order lookup and the insert share one transaction; any failure
    /// rolls both back.
    pub fn create(
        &self,
        mount_path: &str,
        driver: &str,
        addition: &Addition,
        remark: &str,
    ) -> Result<StorageRecord> {
        require_non_empty("mount_path", mount_path)?;
        require_non_empty("driver", driver)?;
        self.ensure_table()?;

        let addition_text = serialize_addition(addition)?;

        let tx = self.conn.unchecked_transaction()?;
        let max_order: Option<i64> = tx.query_row(
            &format!(r#"SELECT MAX("order") FROM {}"#, self.table),
            [],
            |row| row.get(0),
        )?;
        let order = max_order
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| {
                ValidationError::InvalidArguments(format!(
                    "no order value left after {} in {}; lower the highest order first",
                    i64::MAX,
                    self.table
                ))
            })?;

        tx.execute(
            &format!(
                r#"INSERT INTO {} (mount_path, driver, addition, status, disabled, remark, "order")
                   VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)"#,
                self.table
            ),
            params![mount_path, driver, addition_text, DEFAULT_STATUS, remark, order],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        log::info!("created storage {} at {} ({})", id, mount_path, driver);

        Ok(StorageRecord {
            id,
            mount_path: mount_path.to_string(),
            driver: driver.to_string(),
            addition: addition.clone(),
            status: DEFAULT_STATUS.to_string(),
            disabled: false,
            remark: remark.to_string(),
            order,
        })
    }

    /// Rewrite the given columns of record `id`.
    ///
    /// `addition` replaces the stored mapping wholesale. Returns the number
    /// of rows changed: 0 when `id` matches nothing or `fields` is empty.
    pub fn update(&self, id: i64, fields: &RecordUpdate) -> Result<usize> {
        self.ensure_table()?;

        if fields.is_empty() {
            return Ok(0);
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(mount_path) = &fields.mount_path {
            require_non_empty("mount_path", mount_path)?;
            assignments.push("mount_path");
            values.push(SqlValue::Text(mount_path.clone()));
        }
        if let Some(driver) = &fields.driver {
            require_non_empty("driver", driver)?;
            assignments.push("driver");
            values.push(SqlValue::Text(driver.clone()));
        }
        if let Some(addition) = &fields.addition {
            assignments.push("addition");
            values.push(SqlValue::Text(serialize_addition(addition)?));
        }
        if let Some(status) = &fields.status {
            assignments.push("status");
            values.push(SqlValue::Text(status.clone()));
        }
        if let Some(disabled) = fields.disabled {
            assignments.push("disabled");
            values.push(SqlValue::Integer(i64::from(disabled)));
        }
        if let Some(remark) = &fields.remark {
            assignments.push("remark");
            values.push(SqlValue::Text(remark.clone()));
        }
        if let Some(order) = fields.order {
            assignments.push(r#""order""#);
            values.push(SqlValue::Integer(order));
        }

        let set_clause = assignments
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        values.push(SqlValue::Integer(id));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            self.table,
            set_clause,
            values.len()
        );
        let changed = self.conn.execute(&sql, params_from_iter(values))?;

        if changed == 0 {
            log::debug!("update of storage {} matched no rows", id);
        } else {
            log::info!("updated storage {} ({})", id, assignments.join(", "));
        }
        Ok(changed)
    }

    /// Remove record `id`. Deleting an unknown id is not an error.
    pub fn delete(&self, id: i64) -> Result<usize> {
        self.ensure_table()?;
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", self.table),
            params![id],
        )?;
        log::info!("deleted storage {} ({} row(s))", id, changed);
        Ok(changed)
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<StorageRecord> {
    let addition: Option<String> = row.get(3)?;
    Ok(StorageRecord {
        id: row.get(0)?,
        mount_path: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        driver: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        addition: parse_addition(addition.as_deref()),
        status: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        disabled: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        remark: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        order: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// Column layout of the application's own `x_storages` table
    pub const SCHEMA: &str = r#"CREATE TABLE x_storages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        mount_path TEXT,
        "order" INTEGER,
        driver TEXT,
        cache_expiration INTEGER,
        status TEXT,
        addition TEXT,
        remark TEXT,
        modified DATETIME,
        disabled NUMERIC,
        disable_index NUMERIC,
        enable_sign NUMERIC,
        order_by TEXT,
        order_direction TEXT,
        extract_folder TEXT,
        web_proxy NUMERIC,
        webdav_policy TEXT,
        proxy_range NUMERIC,
        down_proxy_url TEXT
    )"#;

    /// Create a database file, optionally with the storage table
    pub fn database(with_table: bool) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("data.db");
        let conn = Connection::open(&path).expect("Failed to create database");
        if with_table {
            conn.execute_batch(SCHEMA).expect("Failed to create table");
        }
        (dir, path)
    }

    pub fn store() -> (TempDir, StorageStore) {
        let (dir, path) = database(true);
        let store = StorageStore::open(&path, DEFAULT_TABLE).expect("Failed to open store");
        (dir, store)
    }
}
