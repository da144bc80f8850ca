pub mod config;
pub mod error;
pub mod types;

pub use config::{AiProvider, AppConfig, FileConfig, UnrecognizedDates};
pub use error::ScoutError;
pub use types::*;
