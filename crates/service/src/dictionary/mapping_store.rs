use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::dictionary::{Candidate, Dictionary};
use crate::errors::ServiceError;

/// Trait abstraction over the stores that accept a full replacement mapping.
/// Lets the HTTP layer submit to either store through one handler.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Replace the whole mapping and persist it.
    async fn replace_mapping(&self, mapping: Dictionary) -> Result<Arc<Dictionary>, ServiceError>;

    /// Validate an arbitrary JSON value, then replace.
    async fn replace_value(&self, candidate: Value) -> Result<Arc<Dictionary>, ServiceError> {
        let mapping = Candidate::parse(Some(candidate)).into_mapping()?;
        self.replace_mapping(mapping).await
    }
}
