use super::disambiguate::disambiguate;
use super::normalize::compare_key;
use super::types::{BucketKey, Index, MatchKind, QueryMode, QueryOptions, QueryResult, Target};
use crate::error::{Result, SymdexError};

impl Index {
    /// Resolve `input` against the index.
    ///
    /// Exact case-insensitive matches come first, followed by prefix matches
    /// in bucket order; the list is cut at `options.max_results`. A missing
    /// bucket or no match is an empty success, only unusable input is an error.
    pub fn query(&self, input: &str, options: QueryOptions) -> Result<Vec<QueryResult>> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SymdexError::InvalidQuery("query text is empty".to_string()));
        }
        if text.chars().any(char::is_control) {
            return Err(SymdexError::InvalidQuery(format!(
                "query {:?} contains control characters",
                text
            )));
        }

        let Some(bucket) = BucketKey::for_text(text).and_then(|k| self.buckets.get(&k)) else {
            return Ok(Vec::new());
        };

        let needle = compare_key(text);
        let start = bucket
            .entries
            .partition_point(|e| e.compare_key.as_str() < needle.as_str());

        let results = bucket.entries[start..]
            .iter()
            .take_while(|e| match options.mode {
                QueryMode::Exact => e.compare_key == needle,
                QueryMode::Prefix => e.compare_key.starts_with(&needle),
            })
            .take(options.max_results)
            .map(|e| {
                let match_kind = if e.compare_key == needle {
                    MatchKind::Exact
                } else {
                    MatchKind::Prefix
                };
                disambiguate(QueryResult {
                    key: e.key.clone(),
                    targets: e.targets.clone(),
                    match_kind,
                })
            })
            .collect();

        Ok(results)
    }

    /// Targets for an exact display key, in insertion order.
    pub fn lookup(&self, key: &str) -> Option<&[Target]> {
        let key = key.trim();
        let bucket = self.buckets.get(&BucketKey::for_text(key)?)?;
        let needle = compare_key(key);
        let start = bucket
            .entries
            .partition_point(|e| e.compare_key.as_str() < needle.as_str());

        bucket.entries[start..]
            .iter()
            .take_while(|e| e.compare_key == needle)
            .find(|e| e.key == key)
            .map(|e| e.targets.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::builder::build_batch;
    use crate::index::types::{BuildOptions, KindHint, RawRecord, RawTarget};

    fn joybus(key: &str, anchor: &str) -> RawRecord {
        RawRecord::new(
            key,
            vec![RawTarget::new("group__joybus.html", anchor, "joybus.c")],
        )
    }

    fn sample() -> Index {
        build_batch(
            vec![
                joybus("eeprom_write", "gaf2"),
                joybus("eeprom_read", "ga8d"),
                joybus("eeprom_total_blocks", "gabf"),
                joybus("eeprom_present", "gad8"),
                joybus("eeprom_read_bytes", "ga8f"),
                RawRecord::new(
                    "eepfs_read",
                    vec![
                        RawTarget::new(
                            "eepromfs_8h.html",
                            "a3da",
                            "eepfs_read(const char *path, void *dest, size_t size):\u{a0}eepromfs.h",
                        ),
                        RawTarget::new(
                            "eepromfs_8c.html",
                            "a3da",
                            "eepfs_read(const char *path, void *dest, size_t size):\u{a0}eepromfs.c",
                        ),
                    ],
                ),
                RawRecord::new(
                    "EEPROM",
                    vec![RawTarget::new("group__joybus.html", "ga00", "joybus.h")],
                ),
            ],
            BuildOptions::default(),
        )
        .unwrap()
        .index
    }

    fn keys(results: &[QueryResult]) -> Vec<&str> {
        results.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn empty_query_is_invalid() {
        let index = sample();
        for input in ["", "   "] {
            let err = index.query(input, QueryOptions::default()).unwrap_err();
            assert!(matches!(err, SymdexError::InvalidQuery(_)));
        }
        let err = Index::default().query("", QueryOptions::default()).unwrap_err();
        assert!(matches!(err, SymdexError::InvalidQuery(_)));
    }

    #[test]
    fn prefix_query_truncates_in_lexical_order() {
        let index = sample();
        let results = index
            .query("eeprom_", QueryOptions::prefix(3))
            .unwrap();
        assert_eq!(
            keys(&results),
            vec!["eeprom_present", "eeprom_read", "eeprom_read_bytes"]
        );
        assert!(results.iter().all(|r| r.match_kind == MatchKind::Prefix));
    }

    #[test]
    fn exact_match_comes_first() {
        let index = sample();
        let results = index.query("Eeprom", QueryOptions::default()).unwrap();
        assert_eq!(results[0].key, "EEPROM");
        assert_eq!(results[0].match_kind, MatchKind::Exact);
        assert_eq!(results.len(), 6);
        assert!(results[1..].iter().all(|r| r.match_kind == MatchKind::Prefix));
    }

    #[test]
    fn exact_mode_returns_all_targets() {
        let index = sample();
        let results = index.query("eepfs_read", QueryOptions::exact()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_kind, MatchKind::Exact);

        let labels: Vec<_> = results[0]
            .targets
            .iter()
            .map(|t| t.provenance_label.as_str())
            .collect();
        assert_eq!(labels, vec!["eepromfs.c", "eepromfs.h"]);
        assert!(results[0].targets.iter().all(|t| t.kind_hint == KindHint::Function));

        let again = index.query("eepfs_read", QueryOptions::exact()).unwrap();
        assert_eq!(results, again);
    }

    #[test]
    fn exact_mode_ignores_longer_keys() {
        let index = sample();
        let results = index.query("eeprom_read", QueryOptions::exact()).unwrap();
        assert_eq!(keys(&results), vec!["eeprom_read"]);
    }

    #[test]
    fn missing_bucket_or_key_is_empty_success() {
        let index = sample();
        assert!(index.query("zzz", QueryOptions::default()).unwrap().is_empty());
        assert!(index.query("eez", QueryOptions::default()).unwrap().is_empty());
        assert!(index.query("#define", QueryOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn max_results_zero_yields_nothing() {
        let index = sample();
        let results = index.query("ee", QueryOptions::prefix(0)).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn prefix_results_match_the_folded_prefix_exactly() {
        let index = sample();
        for prefix in ["e", "EE", "eep", "eeprom_r", "eepfs"] {
            let results = index.query(prefix, QueryOptions::prefix(100)).unwrap();
            let folded = compare_key(prefix);
            let expected: Vec<&str> = index
                .entries()
                .filter(|e| compare_key(&e.key).starts_with(&folded))
                .map(|e| e.key.as_str())
                .collect();
            let mut got = keys(&results);
            got.sort_unstable();
            let mut expected = expected;
            expected.sort_unstable();
            assert_eq!(got, expected, "prefix {prefix}");
        }
    }

    #[test]
    fn prefix_folding_does_not_depend_on_position() {
        let index = build_batch(
            vec![RawRecord::new(
                "ΑΣΒ",
                vec![RawTarget::new("greek_8h.html", "a1", "greek.h")],
            )],
            BuildOptions::default(),
        )
        .unwrap()
        .index;

        let results = index.query("ΑΣ", QueryOptions::default()).unwrap();
        assert_eq!(keys(&results), vec!["ΑΣΒ"]);
        assert_eq!(results[0].match_kind, MatchKind::Prefix);

        let results = index.query("ασβ", QueryOptions::exact()).unwrap();
        assert_eq!(keys(&results), vec!["ΑΣΒ"]);
    }

    #[test]
    fn other_bucket_is_queried_in_order() {
        let index = build_batch(
            vec![
                RawRecord::new(
                    "__assert",
                    vec![RawTarget::new("debug_8h.html", "a7f", "debug.h")],
                ),
                RawRecord::new(
                    "_SI_condat",
                    vec![RawTarget::new("si_8h.html", "a13", "si.h")],
                ),
                joybus("eeprom_read", "ga8d"),
            ],
            BuildOptions::default(),
        )
        .unwrap()
        .index;

        let results = index.query("_si", QueryOptions::default()).unwrap();
        assert_eq!(keys(&results), vec!["_SI_condat"]);

        let results = index.query("_", QueryOptions::default()).unwrap();
        assert_eq!(keys(&results), vec!["__assert", "_SI_condat"]);
        assert!(results.iter().all(|r| r.match_kind == MatchKind::Prefix));
    }

    #[test]
    fn lookup_returns_insertion_order() {
        let index = sample();
        let targets = index.lookup("eepfs_read").unwrap();
        assert_eq!(targets[0].document_path, "eepromfs_8h.html");
        assert!(index.lookup("EEPFS_READ").is_none());
        assert!(index.lookup("").is_none());
    }
}
