//! Shared error and canonical-serialization types for the EMOD
//! configuration toolkit.

pub mod canon;
pub mod errors;

pub use canon::{stable_hash_string, to_canonical_json_bytes};
pub use errors::{EmodError, ErrorInfo};
