use flate2::read::GzDecoder;
use std::io::Read;
use std::time::Instant;
use tracing::info;

use crate::error::Result;
use crate::index::RawRecord;
use crate::searchdata::{self, SearchData};

// Sample search data, gzipped by build.rs
static COMPRESSED_SAMPLE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/sample-search.js.gz"));

/// Decompress and parse the bundled sample search data.
pub fn sample_data() -> Result<SearchData> {
    let start = Instant::now();

    let mut decoder = GzDecoder::new(COMPRESSED_SAMPLE);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    let decompress_time = start.elapsed();

    let data = searchdata::parse("<sample>", &text)?;

    info!(
        records = data.records.len(),
        decompress_us = decompress_time.as_micros() as u64,
        total_us = start.elapsed().as_micros() as u64,
        "sample search data loaded"
    );

    Ok(data)
}

pub fn sample_records() -> Result<Vec<RawRecord>> {
    Ok(sample_data()?.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{BuildOptions, KindHint, MatchKind, QueryOptions, build_batch};

    #[test]
    fn sample_loads() {
        let data = sample_data().unwrap();
        assert!(data.errors.is_empty());
        assert!(data.records.len() > 40, "sample should hold the whole bucket");
    }

    #[test]
    fn sample_builds_into_a_single_bucket() {
        let report = build_batch(sample_records().unwrap(), BuildOptions::strict()).unwrap();
        assert!(report.errors.is_empty());

        let buckets: Vec<_> = report.index.buckets().map(|(k, _)| k.to_string()).collect();
        assert_eq!(buckets, vec!["e"]);
    }

    #[test]
    fn header_and_source_targets_stay_distinct() {
        let index = build_batch(sample_records().unwrap(), BuildOptions::default())
            .unwrap()
            .index;

        let results = index.query("eepfs_close", QueryOptions::exact()).unwrap();
        assert_eq!(results.len(), 1);
        let paths: Vec<_> = results[0]
            .targets
            .iter()
            .map(|t| t.document_path.as_str())
            .collect();
        assert_eq!(paths, vec!["eepromfs_8h.html", "eepromfs_8c.html"]);
        assert!(results[0]
            .targets
            .iter()
            .all(|t| t.kind_hint == KindHint::Function && t.provenance_label == "eepromfs.c"));
    }

    #[test]
    fn repeated_group_target_is_collapsed() {
        let index = build_batch(sample_records().unwrap(), BuildOptions::default())
            .unwrap()
            .index;
        let targets = index.lookup("enable_interrupts").unwrap();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn eeprom_prefix_query() {
        let index = build_batch(sample_records().unwrap(), BuildOptions::default())
            .unwrap()
            .index;

        let results = index.query("eeprom_", QueryOptions::prefix(3)).unwrap();
        let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["EEPROM_16K", "EEPROM_4K", "EEPROM_BLOCK_SIZE"]);
        assert!(results.iter().all(|r| r.match_kind == MatchKind::Prefix));
    }

    #[test]
    fn sample_kinds_are_inferred() {
        let index = build_batch(sample_records().unwrap(), BuildOptions::default())
            .unwrap()
            .index;
        let kind = |key: &str| index.lookup(key).unwrap()[0].kind_hint;

        assert_eq!(kind("eepfs_entry_t"), KindHint::Type);
        assert_eq!(kind("EEPFS_EBADFS"), KindHint::Macro);
        assert_eq!(kind("EEPROM_16K"), KindHint::Enumerator);
        assert_eq!(kind("eepromfs.h"), KindHint::File);
        assert_eq!(kind("Exception Handler"), KindHint::Group);
        assert_eq!(kind("entry_point"), KindHint::Field);
    }
}
