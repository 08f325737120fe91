//! File-backed stores.

pub mod dictionary_store;
pub mod synonym_store;
