//! Storage record model and `addition` (de)serialization

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Driver-specific settings, stored as a JSON object in the `addition` column
pub type Addition = Map<String, Value>;

/// Status written on every newly created record
pub const DEFAULT_STATUS: &str = "work";

/// One row of the application's storage table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub id: i64,
    pub mount_path: String,
    pub driver: String,
    pub addition: Addition,
    pub status: String,
    pub disabled: bool,
    pub remark: String,
    pub order: i64,
}

/// Columns an update may rewrite. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    pub mount_path: Option<String>,
    pub driver: Option<String>,
    pub addition: Option<Addition>,
    pub status: Option<String>,
    pub disabled: Option<bool>,
    pub remark: Option<String>,
    pub order: Option<i64>,
}

impl RecordUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn addition(mut self, addition: Addition) -> Self {
        self.addition = Some(addition);
        self
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn mount_path(mut self, mount_path: impl Into<String>) -> Self {
        self.mount_path = Some(mount_path.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mount_path.is_none()
            && self.driver.is_none()
            && self.addition.is_none()
            && self.status.is_none()
            && self.disabled.is_none()
            && self.remark.is_none()
            && self.order.is_none()
    }
}

/// Parse a stored `addition` column.
///
/// NULL, blank, corrupt and non-object values all come back as an empty
/// mapping; the application tolerates the same.
pub fn parse_addition(raw: Option<&str>) -> Addition {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Addition::new();
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            log::warn!("addition is not a JSON object (found {}), treating as empty", kind(&other));
            Addition::new()
        }
        Err(e) => {
            log::warn!("addition is not valid JSON ({}), treating as empty", e);
            Addition::new()
        }
    }
}

/// Serialize an `addition` mapping for storage
pub fn serialize_addition(addition: &Addition) -> serde_json::Result<String> {
    serde_json::to_string(addition)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
