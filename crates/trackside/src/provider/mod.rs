//! Dataset provider abstraction.
//!
//! The query engine treats its data source as a pure, snapshot-returning
//! provider; whether records come from flat files, a database or a remote
//! sync job is not its concern.

pub mod static_provider;

use std::sync::Arc;

use crate::models::{Category, InfraRecord, Result, SyncMetadata};

/// Source of infrastructure record snapshots.
pub trait DatasetProvider: Send + Sync {
    /// Full current snapshot for one category. Snapshots are immutable;
    /// a reload replaces them wholesale.
    fn load_records(&self, category: Category) -> Result<Arc<Vec<InfraRecord>>>;

    /// Freshness of the loaded data, if known.
    fn sync_metadata(&self) -> Result<SyncMetadata>;
}
