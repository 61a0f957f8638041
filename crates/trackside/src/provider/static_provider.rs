//! In-memory dataset provider.
//!
//! Holds one immutable snapshot per category. This is what tests build
//! fixtures from, and what the file loader in the server crate swaps in
//! wholesale after a reload.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Category, InfraRecord, Result, SyncMetadata};
use crate::provider::DatasetProvider;

/// In-memory provider over per-category record snapshots.
///
/// Cheap to clone; snapshots are shared through `Arc`.
#[derive(Clone, Default)]
pub struct StaticDatasetProvider {
    records: HashMap<Category, Arc<Vec<InfraRecord>>>,
    metadata: SyncMetadata,
}

impl StaticDatasetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from records, grouped by their own category.
    pub fn from_records(records: impl IntoIterator<Item = InfraRecord>) -> Self {
        let mut grouped: HashMap<Category, Vec<InfraRecord>> = HashMap::new();
        for record in records {
            grouped.entry(record.category).or_default().push(record);
        }

        Self {
            records: grouped.into_iter().map(|(k, v)| (k, Arc::new(v))).collect(),
            metadata: SyncMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: SyncMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl DatasetProvider for StaticDatasetProvider {
    fn load_records(&self, category: Category) -> Result<Arc<Vec<InfraRecord>>> {
        Ok(self
            .records
            .get(&category)
            .cloned()
            .unwrap_or_else(|| Arc::new(Vec::new())))
    }

    fn sync_metadata(&self) -> Result<SyncMetadata> {
        Ok(self.metadata)
    }
}
