//! Storage service: operator-level flows on top of the store
//!
//! The store replaces `addition` wholesale on update. Anything that needs a
//! merge (credential rotation) reads, merges and writes back here.

use crate::AppError;
use crate::core::drivers::is_known_driver;
use crate::error::ValidationError;
use crate::store::{Addition, RecordUpdate, StorageRecord, StorageStore};
use crate::utils::validation::{normalize_mount_path, require_non_empty};
use serde_json::Value;
use std::fmt;

/// How a command addresses one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSelector {
    Id(i64),
    MountPath(String),
    Driver(String),
}

impl fmt::Display for RecordSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSelector::Id(id) => write!(f, "id {}", id),
            RecordSelector::MountPath(path) => write!(f, "mount path {}", path),
            RecordSelector::Driver(driver) => write!(f, "driver {}", driver),
        }
    }
}

/// Result of [`StorageService::configure`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigureOutcome {
    pub record: StorageRecord,
    pub created: bool,
}

pub struct StorageService {
    store: StorageStore,
}

impl StorageService {
    pub fn new(store: StorageStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<StorageRecord>, AppError> {
        Ok(self.store.list()?)
    }

    pub fn find(&self, selector: &RecordSelector) -> Result<Option<StorageRecord>, AppError> {
        let record = match selector {
            RecordSelector::Id(id) => self.store.find_by_id(*id)?,
            RecordSelector::MountPath(path) => {
                self.store.find_by_mount_path(&normalize_mount_path(path)?)?
            }
            RecordSelector::Driver(driver) => self.store.find_by_driver(driver)?,
        };
        Ok(record)
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub fn get(&self, selector: &RecordSelector) -> Result<StorageRecord, AppError> {
        self.find(selector)?.ok_or_else(|| AppError::NotFound {
            selector: selector.to_string(),
        })
    }

    /// Create a record. Mount paths are normalized to start with `/`.
    pub fn add(
        &self,
        mount_path: &str,
        driver: &str,
        addition: &Addition,
        remark: &str,
    ) -> Result<StorageRecord, AppError> {
        let mount_path = normalize_mount_path(mount_path)?;
        require_non_empty("driver", driver)?;
        warn_unknown_driver(driver);

        Ok(self.store.create(&mount_path, driver, addition, remark)?)
    }

    /// Create the record at `mount_path`, or overwrite the driver, addition
    /// and remark of the one already there.
    pub fn configure(
        &self,
        mount_path: &str,
        driver: &str,
        addition: &Addition,
        remark: &str,
    ) -> Result<ConfigureOutcome, AppError> {
        let mount_path = normalize_mount_path(mount_path)?;
        require_non_empty("driver", driver)?;
        warn_unknown_driver(driver);

        match self.store.find_by_mount_path(&mount_path)? {
            Some(existing) => {
                let update = RecordUpdate::new()
                    .driver(driver)
                    .addition(addition.clone())
                    .remark(remark);
                self.store.update(existing.id, &update)?;
                log::info!("reconfigured {} (id {})", mount_path, existing.id);

                Ok(ConfigureOutcome {
                    record: StorageRecord {
                        driver: driver.to_string(),
                        addition: addition.clone(),
                        remark: remark.to_string(),
                        ..existing
                    },
                    created: false,
                })
            }
            None => {
                let record = self.store.create(&mount_path, driver, addition, remark)?;
                Ok(ConfigureOutcome {
                    record,
                    created: true,
                })
            }
        }
    }

    /// Set one `addition` key on the selected record, keeping all others
    pub fn rotate_credential(
        &self,
        selector: &RecordSelector,
        key: &str,
        value: &str,
    ) -> Result<StorageRecord, AppError> {
        require_non_empty("key", key)?;
        if value.trim().is_empty() {
            return Err(ValidationError::empty(key).into());
        }

        let mut record = self.get(selector)?;
        record
            .addition
            .insert(key.to_string(), Value::String(value.trim().to_string()));

        self.store.update(
            record.id,
            &RecordUpdate::new().addition(record.addition.clone()),
        )?;
        log::info!("rotated '{}' on storage {}", key, record.id);

        Ok(record)
    }

    pub fn update(&self, id: i64, fields: &RecordUpdate) -> Result<usize, AppError> {
        let mut fields = fields.clone();
        if let Some(path) = fields.mount_path.take() {
            fields.mount_path = Some(normalize_mount_path(&path)?);
        }
        Ok(self.store.update(id, &fields)?)
    }

    pub fn delete(&self, id: i64) -> Result<usize, AppError> {
        Ok(self.store.delete(id)?)
    }
}

fn warn_unknown_driver(driver: &str) {
    if !is_known_driver(driver) {
        log::warn!("driver '{}' is not in the known driver list", driver);
    }
}
