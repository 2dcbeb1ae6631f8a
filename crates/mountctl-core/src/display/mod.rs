pub mod status;
pub mod table;

pub use status::{OperationStatus, display_status};
pub use table::{TableDisplay, records_to_json};
