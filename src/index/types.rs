use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What kind of symbol a target documents, as far as the markers tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindHint {
    Function,
    Macro,
    Type,
    Field,
    File,
    Group,
    Enumerator,
}

impl KindHint {
    /// Display priority used when a key has several targets. Lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            KindHint::Function => 0,
            KindHint::Macro => 1,
            KindHint::Type => 2,
            KindHint::Enumerator => 3,
            KindHint::Field => 4,
            KindHint::File => 5,
            KindHint::Group => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KindHint::Function => "function",
            KindHint::Macro => "macro",
            KindHint::Type => "type",
            KindHint::Field => "field",
            KindHint::File => "file",
            KindHint::Group => "group",
            KindHint::Enumerator => "enumerator",
        }
    }
}

impl fmt::Display for KindHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One navigation target as the generator emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTarget {
    pub document_path: String,
    #[serde(default)]
    pub anchor: String,
    #[serde(default)]
    pub label: String,
}

impl RawTarget {
    pub fn new(
        document_path: impl Into<String>,
        anchor: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            anchor: anchor.into(),
            label: label.into(),
        }
    }
}

/// A `(key, targets)` record of an input batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub key: String,
    pub targets: Vec<RawTarget>,
}

impl RawRecord {
    pub fn new(key: impl Into<String>, targets: Vec<RawTarget>) -> Self {
        Self {
            key: key.into(),
            targets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub document_path: String,
    pub anchor: String,
    pub provenance_label: String,
    pub kind_hint: KindHint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Position in the key's deduplicated insertion order
    #[serde(skip)]
    pub ordinal: usize,
}

impl Target {
    /// `page.html#anchor`, or just the page for whole-page links.
    pub fn href(&self) -> String {
        if self.anchor.is_empty() {
            self.document_path.clone()
        } else {
            format!("{}#{}", self.document_path, self.anchor)
        }
    }
}

/// A validated record: display key, compare key and deduplicated targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub key: String,
    pub compare_key: String,
    pub targets: Vec<Target>,
}

/// Bucket a key lands in, from its first case-folded character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BucketKey {
    Other,
    Char(char),
}

impl BucketKey {
    pub fn for_text(text: &str) -> Option<Self> {
        let first = text.chars().next()?;
        if first.is_alphanumeric() {
            let folded = first.to_lowercase().next().unwrap_or(first);
            Some(BucketKey::Char(folded))
        } else {
            Some(BucketKey::Other)
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Other => f.write_str("#"),
            BucketKey::Char(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub compare_key: String,
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bucket {
    pub entries: Vec<IndexEntry>,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable, query-ready symbol index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Index {
    pub(crate) buckets: BTreeMap<BucketKey, Bucket>,
}

impl Index {
    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &Bucket)> {
        self.buckets.iter()
    }

    pub fn bucket(&self, key: BucketKey) -> Option<&Bucket> {
        self.buckets.get(&key)
    }

    pub fn key_count(&self) -> usize {
        self.buckets.values().map(Bucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.buckets.values().flat_map(|b| b.entries.iter())
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            buckets: self.buckets.len(),
            ..IndexStats::default()
        };
        for entry in self.entries() {
            stats.keys += 1;
            stats.targets += entry.targets.len();
            for target in &entry.targets {
                *stats.by_kind.entry(target.kind_hint).or_insert(0) += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IndexStats {
    pub buckets: usize,
    pub keys: usize,
    pub targets: usize,
    pub by_kind: BTreeMap<KindHint, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchKind {
    Exact,
    Prefix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub key: String,
    pub targets: Vec<Target>,
    pub match_kind: MatchKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Exact,
    #[default]
    Prefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub max_results: usize,
    pub mode: QueryMode,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_results: 50,
            mode: QueryMode::Prefix,
        }
    }
}

impl QueryOptions {
    pub fn exact() -> Self {
        Self {
            mode: QueryMode::Exact,
            ..Self::default()
        }
    }

    pub fn prefix(max_results: usize) -> Self {
        Self {
            max_results,
            mode: QueryMode::Prefix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub allow_empty: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { allow_empty: true }
    }
}

impl BuildOptions {
    pub fn strict() -> Self {
        Self { allow_empty: false }
    }
}
