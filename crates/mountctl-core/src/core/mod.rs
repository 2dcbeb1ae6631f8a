pub mod drivers;
pub mod mask;
pub mod services;
pub mod token;
