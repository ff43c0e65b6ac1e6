//! The "current index" slot shared between readers and the single writer.

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::error::{Result, SymdexError};
use crate::index::{BuildOptions, BuildReport, Index, QueryOptions, QueryResult, RawRecord, build_batch};

/// Owned, swappable reference to the live [`Index`].
///
/// Readers load a snapshot without locking and keep it for as long as they
/// need it. Rebuilds happen entirely off the live index and are published
/// with one atomic swap, so a reader sees either the old index or the new
/// one, never a partial build.
pub struct IndexSlot {
    current: ArcSwap<Index>,
    generation: AtomicU64,
    writer: Mutex<()>,
}

impl IndexSlot {
    pub fn new(index: Index) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
            generation: AtomicU64::new(0),
            writer: Mutex::new(()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Index::default())
    }

    #[inline]
    pub fn load(&self) -> Arc<Index> {
        self.current.load_full()
    }

    /// Number of indexes published since the slot was created.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Swap in `index` and hand back the one it replaced.
    pub fn publish(&self, index: Index) -> Arc<Index> {
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        self.swap_locked(index)
    }

    /// Normalize and build `raw`, then publish the result.
    ///
    /// On error the live index stays in place. Per-record errors are returned
    /// in the report alongside the published index.
    pub fn rebuild<I>(&self, raw: I, options: BuildOptions) -> Result<Rebuilt>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let BuildReport { index, errors } = build_batch(raw, options)?;
        let fingerprint = index.fingerprint();
        let previous = self.swap_locked(index);

        Ok(Rebuilt {
            generation: self.generation(),
            changed: previous.fingerprint() != fingerprint,
            fingerprint,
            errors,
        })
    }

    pub fn query(&self, input: &str, options: QueryOptions) -> Result<Vec<QueryResult>> {
        self.load().query(input, options)
    }

    fn swap_locked(&self, index: Index) -> Arc<Index> {
        let keys = index.key_count();
        let previous = self.current.swap(Arc::new(index));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, keys, "index published");
        previous
    }
}

impl Default for IndexSlot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of [`IndexSlot::rebuild`].
#[derive(Debug)]
pub struct Rebuilt {
    pub generation: u64,
    pub fingerprint: String,
    pub changed: bool,
    pub errors: Vec<SymdexError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RawTarget;
    use std::thread;

    fn record(key: &str) -> RawRecord {
        RawRecord::new(
            key,
            vec![RawTarget::new("group__joybus.html", key, "joybus.c")],
        )
    }

    #[test]
    fn publish_swaps_and_returns_previous() {
        let slot = IndexSlot::empty();
        assert_eq!(slot.generation(), 0);

        let next = build_batch(vec![record("eeprom_read")], BuildOptions::default())
            .unwrap()
            .index;
        let previous = slot.publish(next);

        assert!(previous.is_empty());
        assert_eq!(slot.generation(), 1);
        assert_eq!(slot.load().key_count(), 1);
    }

    #[test]
    fn snapshot_survives_a_rebuild() {
        let slot = IndexSlot::empty();
        slot.rebuild(vec![record("eeprom_read")], BuildOptions::default())
            .unwrap();

        let snapshot = slot.load();
        let rebuilt = slot
            .rebuild(
                vec![record("eeprom_read"), record("eeprom_write")],
                BuildOptions::default(),
            )
            .unwrap();

        assert!(rebuilt.changed);
        assert_eq!(rebuilt.generation, 2);
        assert_eq!(snapshot.key_count(), 1);
        assert_eq!(slot.load().key_count(), 2);
    }

    #[test]
    fn failed_rebuild_keeps_live_index() {
        let slot = IndexSlot::empty();
        slot.rebuild(vec![record("eeprom_read")], BuildOptions::default())
            .unwrap();

        let err = slot
            .rebuild(vec![record("")], BuildOptions::strict())
            .unwrap_err();
        assert!(matches!(err, SymdexError::EmptyBatch));
        assert_eq!(slot.generation(), 1);
        assert_eq!(
            slot.query("eeprom_read", QueryOptions::exact()).unwrap().len(),
            1
        );
    }

    #[test]
    fn identical_rebuild_reports_unchanged() {
        let slot = IndexSlot::empty();
        slot.rebuild(vec![record("eeprom_read")], BuildOptions::default())
            .unwrap();
        let again = slot
            .rebuild(vec![record("eeprom_read")], BuildOptions::default())
            .unwrap();
        assert!(!again.changed);
    }

    #[test]
    fn readers_always_see_a_complete_index() {
        let slot = Arc::new(IndexSlot::empty());
        let small: Vec<RawRecord> = (0..10).map(|i| record(&format!("sym_{i:03}"))).collect();
        let large: Vec<RawRecord> = (0..200).map(|i| record(&format!("sym_{i:03}"))).collect();
        slot.rebuild(small.clone(), BuildOptions::default()).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let n = slot
                            .query("sym_", QueryOptions::prefix(1000))
                            .unwrap()
                            .len();
                        assert!(n == 10 || n == 200, "saw partial index with {n} keys");
                    }
                })
            })
            .collect();

        for i in 0..20 {
            let batch = if i % 2 == 0 { large.clone() } else { small.clone() };
            slot.rebuild(batch, BuildOptions::default()).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(slot.generation(), 21);
    }
}
