//! In-memory symbol index
//!
//! Raw `(key, targets)` records flow through the normalizer into the builder,
//! which produces an immutable [`Index`]. Queries run against the index and
//! every result passes through the disambiguator on the way out.
//!
//! # Usage
//!
//! ```rust
//! use symdex::index::{build_batch, BuildOptions, QueryOptions, RawRecord, RawTarget};
//!
//! let report = build_batch(
//!     vec![RawRecord::new(
//!         "eeprom_read",
//!         vec![RawTarget::new("group__joybus.html", "ga8d4e", "joybus.c")],
//!     )],
//!     BuildOptions::default(),
//! )
//! .unwrap();
//!
//! let results = report.index.query("eeprom", QueryOptions::default()).unwrap();
//! assert_eq!(results[0].key, "eeprom_read");
//! ```

mod builder;
mod disambiguate;
mod fingerprint;
mod normalize;
mod query;
mod types;

pub use builder::{BuildReport, build, build_batch};
pub use disambiguate::disambiguate;
pub use normalize::{Normalized, compare_key, infer_kind, normalize};
pub use types::{
    Bucket, BucketKey, BuildOptions, Index, IndexEntry, IndexStats, KindHint, MatchKind,
    NormalizedRecord, QueryMode, QueryOptions, QueryResult, RawRecord, RawTarget, Target,
};
