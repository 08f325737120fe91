use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::dictionary::{Candidate, Dictionary, MappingStore};
use crate::errors::ServiceError;
use crate::storage::json_file;

/// Holds the active universal dictionary and mirrors every replacement to
/// its backing file.
///
/// Readers get an immutable snapshot; a replacement publishes a whole new
/// mapping in one atomic swap, so a torn mapping is never observable. The
/// swap happens before the disk write and is kept even when the write
/// fails, so memory may run ahead of disk until the next successful
/// replace or a restart.
pub struct DictionaryStore {
    current: ArcSwap<Dictionary>,
    file_path: PathBuf,
}

impl DictionaryStore {
    /// Load the dictionary from `path`. Never fails: a missing file starts
    /// empty, and an unreadable or corrupt one is logged and ignored.
    pub async fn load<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let initial = match json_file::read_mapping(&file_path).await {
            Ok(Some(map)) => {
                info!(path = %file_path.display(), entries = map.len(), "dictionary loaded from file");
                map
            }
            Ok(None) => {
                info!(path = %file_path.display(), "no dictionary file; starting empty");
                Dictionary::new()
            }
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "failed to load dictionary; starting empty");
                Dictionary::new()
            }
        };

        Arc::new(Self { current: ArcSwap::from_pointee(initial), file_path })
    }

    /// Snapshot of the current dictionary.
    pub fn get(&self) -> Arc<Dictionary> {
        self.current.load_full()
    }

    /// Replace the dictionary with `candidate`, which must be a JSON object.
    pub async fn replace(&self, candidate: Value) -> Result<Arc<Dictionary>, ServiceError> {
        let mapping = Candidate::parse(Some(candidate)).into_mapping()?;
        self.replace_mapping(mapping).await
    }

    pub async fn replace_mapping(&self, mapping: Dictionary) -> Result<Arc<Dictionary>, ServiceError> {
        let next = Arc::new(mapping);
        self.current.store(Arc::clone(&next));

        if let Err(e) = json_file::write_pretty(&self.file_path, &*next).await {
            error!(path = %self.file_path.display(), error = %e, "failed to persist dictionary");
            return Err(e);
        }
        debug!(path = %self.file_path.display(), entries = next.len(), "dictionary persisted");
        Ok(next)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl MappingStore for DictionaryStore {
    fn name(&self) -> &'static str { "dictionary" }
    async fn replace_mapping(&self, mapping: Dictionary) -> Result<Arc<Dictionary>, ServiceError> {
        DictionaryStore::replace_mapping(self, mapping).await
    }
}
