//! Service layer for the universal dictionary.
//! - `dictionary`: the mapping type, payload parsing and the store trait.
//! - `file`: the two file-backed stores.
//! - `storage`: JSON file persistence shared by both stores.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod dictionary;
pub mod file;

pub use dictionary::Dictionary;
pub use errors::ServiceError;
