pub mod client;
pub mod error_helpers;
pub mod models;
