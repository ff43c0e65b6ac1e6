use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::normalize::{dedup_targets, normalize};
use super::types::{
    Bucket, BucketKey, BuildOptions, Index, IndexEntry, NormalizedRecord, RawRecord, Target,
};
use crate::error::{Result, SymdexError};

/// A freshly built index together with the records normalization rejected.
#[derive(Debug)]
pub struct BuildReport {
    pub index: Index,
    pub errors: Vec<SymdexError>,
}

struct PendingKey {
    key: String,
    compare_key: String,
    targets: Vec<Target>,
    first_seen: usize,
}

/// Mutable accumulation state; never escapes this module.
#[derive(Default)]
struct IndexBuilder {
    by_key: HashMap<String, usize>,
    pending: Vec<PendingKey>,
    records: usize,
}

impl IndexBuilder {
    fn push(&mut self, record: NormalizedRecord) {
        self.records += 1;

        if let Some(&slot) = self.by_key.get(&record.key) {
            self.pending[slot].targets.extend(record.targets);
            return;
        }

        let first_seen = self.pending.len();
        self.by_key.insert(record.key.clone(), first_seen);
        self.pending.push(PendingKey {
            key: record.key,
            compare_key: record.compare_key,
            targets: record.targets,
            first_seen,
        });
    }

    fn finish(self) -> Index {
        let mut grouped: BTreeMap<BucketKey, Vec<PendingKey>> = BTreeMap::new();
        for pending in self.pending {
            let Some(bucket) = BucketKey::for_text(&pending.key) else {
                continue;
            };
            grouped.entry(bucket).or_default().push(pending);
        }

        let buckets = grouped
            .into_iter()
            .map(|(bucket_key, mut keys)| {
                keys.sort_by(|a, b| {
                    a.compare_key
                        .cmp(&b.compare_key)
                        .then_with(|| a.key.cmp(&b.key))
                        .then(a.first_seen.cmp(&b.first_seen))
                });

                let entries = keys
                    .into_iter()
                    .map(|p| IndexEntry {
                        key: p.key,
                        compare_key: p.compare_key,
                        targets: dedup_targets(p.targets),
                    })
                    .collect();

                debug!(bucket = %bucket_key, "bucket sealed");
                (bucket_key, Bucket { entries })
            })
            .collect();

        Index { buckets }
    }
}

/// Build an immutable index from normalized records.
pub fn build<I>(records: I, options: BuildOptions) -> Result<Index>
where
    I: IntoIterator<Item = NormalizedRecord>,
{
    let start = Instant::now();
    let mut builder = IndexBuilder::default();
    for record in records {
        builder.push(record);
    }

    if builder.records == 0 && !options.allow_empty {
        return Err(SymdexError::EmptyBatch);
    }

    let records = builder.records;
    let index = builder.finish();

    info!(
        records,
        keys = index.key_count(),
        buckets = index.buckets.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "index built"
    );

    Ok(index)
}

/// Normalize a raw batch and build it, keeping per-record errors.
pub fn build_batch<I>(raw: I, options: BuildOptions) -> Result<BuildReport>
where
    I: IntoIterator<Item = RawRecord>,
{
    let normalized = normalize(raw);
    if !normalized.is_clean() {
        warn!(rejected = normalized.errors.len(), "batch had rejected records");
    }
    let index = build(normalized.records, options)?;
    Ok(BuildReport {
        index,
        errors: normalized.errors,
    })
}
