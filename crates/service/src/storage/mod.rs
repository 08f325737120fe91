//! Storage helpers for service layer
//!
//! Both stores persist a single JSON object per file; the read and write
//! discipline lives here so they cannot drift apart.

pub mod json_file;
