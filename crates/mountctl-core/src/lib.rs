//! # mountctl-core
//!
//! Core library for managing the storage-backend table of an OpenList-style
//! file-aggregation application.
//!
//! The application owns a single SQLite table mapping mount points to
//! backend drivers and their JSON-encoded connection parameters. This crate
//! reads and writes that table directly, renders its rows with sensitive
//! fields masked, and carries a few helpers for the credential material that
//! ends up in it (cookies, refresh tokens, the application's own JWTs).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mountctl_core::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> mountctl_core::Result<()> {
//!     let store = StorageStore::open("data/data.db", DEFAULT_TABLE)?;
//!
//!     let addition = json!({"url": "https://dav.example.com", "username": "u", "password": "p"});
//!     let record = store.create("/demo", "Webdav", addition.as_object().unwrap(), "demo")?;
//!
//!     for record in store.list()? {
//!         println!("{} {} {:?}", record.mount_path, record.driver, mask_sensitive(&record));
//!     }
//!     store.delete(record.id)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  Admin HTTP client for token debugging
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Services, masking, drivers, tokens
//! ├─────────────────────────────────────┤
//! │     Store / Storage Layer           │  SQLite table access, tool config
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, cookies, text helpers
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::AppError;

    pub use crate::api::client::AdminClient;

    pub use crate::core::drivers::{credential_key, supported_drivers, template};
    pub use crate::core::mask::{mask_sensitive, preview_secret};
    pub use crate::core::services::storage_service::{RecordSelector, StorageService};
    pub use crate::core::token::decode_unverified;

    pub use crate::storage::config::Config;
    pub use crate::store::{Addition, DEFAULT_TABLE, RecordUpdate, StorageRecord, StorageStore};

    pub use crate::display::TableDisplay;
}

/// Business logic layer - services and domain helpers.
///
/// - [`core::services::storage_service`]: upsert and credential rotation flows
/// - [`core::mask`]: display masking of sensitive fields
/// - [`core::drivers`]: known driver tags and default settings
/// - [`core::token`]: offline JWT inspection
pub mod core;

/// Storage configuration store over the application's SQLite table.
pub mod store;

/// Tool configuration (database path, table name, API URL).
pub mod storage;

/// Utilities layer - validation, cookie parsing, text helpers.
pub mod utils;

/// API layer - the application's admin HTTP endpoints.
pub mod api;

/// Display layer - table and JSON rendering of storage records.
pub mod display;

/// Error handling - hierarchical error system with troubleshooting hints.
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
