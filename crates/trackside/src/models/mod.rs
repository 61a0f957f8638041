//! Data model for railway infrastructure records.

pub mod record;
pub mod types;

pub use record::{InfraRecord, RecordGeometry};
pub use types::*;
