use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, error};

use crate::dictionary::{Candidate, Dictionary, MappingStore};
use crate::errors::ServiceError;
use crate::storage::json_file;

/// Write-through store for the synonym set. Nothing is kept in memory;
/// every accepted mapping goes straight to the backing file.
#[derive(Clone, Debug)]
pub struct SynonymStore {
    file_path: PathBuf,
}

impl SynonymStore {
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        Arc::new(Self { file_path })
    }

    /// Persist `candidate`, which must be a JSON object, and echo it back.
    pub async fn replace(&self, candidate: Value) -> Result<Arc<Dictionary>, ServiceError> {
        let mapping = Candidate::parse(Some(candidate)).into_mapping()?;
        self.replace_mapping(mapping).await
    }

    pub async fn replace_mapping(&self, mapping: Dictionary) -> Result<Arc<Dictionary>, ServiceError> {
        if let Err(e) = json_file::write_pretty(&self.file_path, &mapping).await {
            error!(path = %self.file_path.display(), error = %e, "failed to persist synonyms");
            return Err(e);
        }
        debug!(path = %self.file_path.display(), entries = mapping.len(), "synonyms persisted");
        Ok(Arc::new(mapping))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl MappingStore for SynonymStore {
    fn name(&self) -> &'static str { "synonyms" }
    async fn replace_mapping(&self, mapping: Dictionary) -> Result<Arc<Dictionary>, ServiceError> {
        SynonymStore::replace_mapping(self, mapping).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("svc_synonyms_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn replace_writes_file_and_echoes() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = SynonymStore::new(&tmp).await;

        let d = json!({"dog": ["cão", "canino"]});
        let echoed = store.replace(d.clone()).await?;
        assert_eq!(Value::Object((*echoed).clone()), d);

        let on_disk: Value = serde_json::from_str(&tokio::fs::read_to_string(&tmp).await?)?;
        assert_eq!(on_disk, d);

        // second write overwrites in full
        store.replace(json!({"cat": ["gato"]})).await?;
        let on_disk: Value = serde_json::from_str(&tokio::fs::read_to_string(&tmp).await?)?;
        assert_eq!(on_disk, json!({"cat": ["gato"]}));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let tmp = tmp_path();
        let store = SynonymStore::new(&tmp).await;
        for bad in [json!(null), json!("a string"), json!(42), json!(["a", "b"])] {
            let err = store.replace(bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
        assert!(!tmp.exists());
    }

    #[tokio::test]
    async fn write_failure_is_reported() -> Result<(), anyhow::Error> {
        let blocker = std::env::temp_dir().join(format!("svc_synonyms_blocker_{}", Uuid::new_v4()));
        tokio::fs::write(&blocker, b"x").await?;
        let store = SynonymStore::new(blocker.join("dict.json")).await;

        let err = store.replace(json!({"dog": ["cão"]})).await.unwrap_err();
        assert!(matches!(err, ServiceError::PersistenceFailure(_)));

        let _ = tokio::fs::remove_file(&blocker).await;
        Ok(())
    }

    #[tokio::test]
    async fn usable_through_trait_object() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store: Arc<dyn MappingStore> = SynonymStore::new(&tmp).await;
        assert_eq!(store.name(), "synonyms");
        assert!(store.replace_value(json!("nope")).await.is_err());
        store.replace_value(json!({"a": ["b"]})).await?;
        assert!(tmp.exists());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
