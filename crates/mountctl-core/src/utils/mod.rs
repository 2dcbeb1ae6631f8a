pub mod cookie;
pub mod input;
pub mod logging;
pub mod text;
pub mod validation;
