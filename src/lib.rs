//! symdex - symbol index for generated C API documentation
//!
//! Loads the alphabetically bucketed search data a documentation generator
//! emits, builds an immutable in-memory index and answers prefix and exact
//! symbol queries with deterministic ranking.

pub mod config;
pub mod embedded;
pub mod error;
pub mod index;
pub mod loader;
pub mod searchdata;
pub mod store;

// Re-export commonly used types
pub use error::{Result, SymdexError};
pub use index::{BuildOptions, Index, QueryMode, QueryOptions, QueryResult, RawRecord, RawTarget};
pub use store::IndexSlot;
