//! File-backed dataset provider.
//!
//! Each category lives in `<data_dir>/<category>.json` as an array of
//! record objects; `sync.json` carries the last successful sync
//! timestamp. Categories load lazily on first access and the parsed
//! snapshot is kept until [`FileDatasetProvider::reload`] drops it, at
//! which point the next access re-reads the files wholesale.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{info, warn};

use trackside::models::{Category, InfraRecord, QueryError, SyncMetadata};
use trackside::provider::DatasetProvider;

pub struct FileDatasetProvider {
    data_dir: PathBuf,
    snapshots: RwLock<HashMap<Category, Arc<Vec<InfraRecord>>>>,
    metadata: RwLock<Option<SyncMetadata>>,
}

impl FileDatasetProvider {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            snapshots: RwLock::new(HashMap::new()),
            metadata: RwLock::new(None),
        }
    }

    /// Drop all cached snapshots; the next access re-reads from disk.
    pub fn reload(&self) {
        self.snapshots.write().expect("snapshot lock poisoned").clear();
        *self.metadata.write().expect("metadata lock poisoned") = None;
        info!("dataset snapshots dropped, will re-read on next access");
    }

    fn read_category(&self, category: Category) -> trackside::models::Result<Arc<Vec<InfraRecord>>> {
        let path = self.data_dir.join(format!("{category}.json"));
        if !path.exists() {
            warn!(%category, path = %path.display(), "no snapshot file, serving empty dataset");
            return Ok(Arc::new(Vec::new()));
        }

        let bytes = fs::read(&path)
            .map_err(|e| QueryError::Dataset(format!("{}: {e}", path.display())))?;
        let values: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|e| QueryError::Dataset(format!("{}: {e}", path.display())))?;

        let total = values.len();
        let mut records = Vec::with_capacity(total);
        let mut skipped = 0usize;
        for value in values {
            match InfraRecord::from_value(category, value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    warn!(%category, error = %e, "skipping malformed record");
                }
            }
        }
        if skipped > 0 {
            warn!(%category, skipped, total, "snapshot contained malformed records");
        }
        info!(%category, count = records.len(), "snapshot loaded");

        Ok(Arc::new(records))
    }

    fn read_metadata(&self) -> trackside::models::Result<SyncMetadata> {
        let path = self.data_dir.join("sync.json");
        if !path.exists() {
            return Ok(SyncMetadata::default());
        }
        let bytes = fs::read(&path)
            .map_err(|e| QueryError::Dataset(format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| QueryError::Dataset(format!("{}: {e}", path.display())))
    }
}

impl DatasetProvider for FileDatasetProvider {
    fn load_records(&self, category: Category) -> trackside::models::Result<Arc<Vec<InfraRecord>>> {
        if let Some(snapshot) =
            self.snapshots.read().expect("snapshot lock poisoned").get(&category)
        {
            return Ok(snapshot.clone());
        }

        let loaded = self.read_category(category)?;
        self.snapshots
            .write()
            .expect("snapshot lock poisoned")
            .insert(category, loaded.clone());
        Ok(loaded)
    }

    fn sync_metadata(&self) -> trackside::models::Result<SyncMetadata> {
        if let Some(metadata) = *self.metadata.read().expect("metadata lock poisoned") {
            return Ok(metadata);
        }

        let loaded = self.read_metadata()?;
        *self.metadata.write().expect("metadata lock poisoned") = Some(loaded);
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_snapshot(dir: &tempfile::TempDir, name: &str, value: &Value) {
        fs::write(dir.path().join(name), serde_json::to_vec(value).unwrap()).unwrap();
    }

    #[test]
    fn test_loads_records_and_skips_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(
            &dir,
            "track.json",
            &json!([
                {
                    "id": "182",
                    "geometry": {"type": "Line", "coordinates": [[18.07, 59.33], [17.85, 59.50]]},
                    "speedLimit": 200,
                },
                // Empty line geometry: malformed, must be skipped.
                {"id": "bad", "geometry": {"type": "Line", "coordinates": []}},
                // Missing id entirely: also skipped.
                {"designation": "no-id"},
            ]),
        );

        let provider = FileDatasetProvider::new(dir.path().to_path_buf());
        let records = provider.load_records(Category::Track).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "182");
    }

    #[test]
    fn test_missing_file_serves_empty() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileDatasetProvider::new(dir.path().to_path_buf());
        assert!(provider.load_records(Category::Yard).unwrap().is_empty());
    }

    #[test]
    fn test_sync_metadata_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(&dir, "sync.json", &json!({"lastSync": "2025-05-30T03:00:00Z"}));

        let provider = FileDatasetProvider::new(dir.path().to_path_buf());
        let metadata = provider.sync_metadata().unwrap();
        assert!(metadata.last_sync.is_some());

        // Missing sync file is "unknown", not an error.
        let empty_dir = tempfile::tempdir().unwrap();
        let provider = FileDatasetProvider::new(empty_dir.path().to_path_buf());
        assert!(provider.sync_metadata().unwrap().last_sync.is_none());
    }

    #[test]
    fn test_reload_picks_up_new_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(&dir, "station.json", &json!([{"id": "Cst"}]));

        let provider = FileDatasetProvider::new(dir.path().to_path_buf());
        assert_eq!(provider.load_records(Category::Station).unwrap().len(), 1);

        write_snapshot(&dir, "station.json", &json!([{"id": "Cst"}, {"id": "G"}]));
        // Still the old snapshot until an explicit reload.
        assert_eq!(provider.load_records(Category::Station).unwrap().len(), 1);

        provider.reload();
        assert_eq!(provider.load_records(Category::Station).unwrap().len(), 2);
    }

    #[test]
    fn test_top_level_parse_error_is_dataset_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bridge.json"), b"not json").unwrap();

        let provider = FileDatasetProvider::new(dir.path().to_path_buf());
        assert!(matches!(
            provider.load_records(Category::Bridge),
            Err(QueryError::Dataset(_))
        ));
    }
}
