//! The universal dictionary: a JSON object from term to arbitrary value.

pub mod mapping_store;
pub mod payload;

pub use mapping_store::MappingStore;
pub use payload::{Candidate, InvalidReason, SubmitPayload};

/// Term mapping held by both stores. Key order is preserved as submitted.
pub type Dictionary = serde_json::Map<String, serde_json::Value>;
