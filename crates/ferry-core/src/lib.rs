pub mod config;
pub mod error;

pub use config::FerryConfig;
pub use error::{FerryError, Result};
