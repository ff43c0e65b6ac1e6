//! Record normalization: validation, label splitting, kind inference and
//! target deduplication. Pure; a bad record never aborts the batch.

use std::collections::HashSet;
use tracing::warn;

use super::types::{KindHint, NormalizedRecord, RawRecord, RawTarget, Target};
use crate::error::{Result, SymdexError};

/// Doxygen separates a declaration from its file with `:&#160;`.
const LABEL_SEPARATOR: &str = ":\u{a0}";

/// Output of [`normalize`]: the usable records plus one error per rejected record.
#[derive(Debug, Default)]
pub struct Normalized {
    pub records: Vec<NormalizedRecord>,
    pub errors: Vec<SymdexError>,
}

impl Normalized {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Case-insensitive compare key for keys and query text alike.
///
/// Folds one character at a time so the key of a prefix is always a prefix
/// of the key (`str::to_lowercase` maps a word-final `Σ` to `ς`).
pub fn compare_key(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

pub fn normalize<I>(raw: I) -> Normalized
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut out = Normalized::default();

    for (position, record) in raw.into_iter().enumerate() {
        match normalize_record(position, record) {
            Ok(record) => out.records.push(record),
            Err(e) => {
                warn!(error = %e, "rejected record");
                out.errors.push(e);
            }
        }
    }

    out
}

fn normalize_record(position: usize, record: RawRecord) -> Result<NormalizedRecord> {
    let key = record.key.trim();
    if key.is_empty() {
        return Err(SymdexError::invalid_record(position, &record.key, "empty key"));
    }
    if key.chars().any(char::is_control) {
        return Err(SymdexError::invalid_record(
            position,
            key,
            "key contains control characters",
        ));
    }

    let targets: Vec<Target> = record
        .targets
        .into_iter()
        .filter(|t| !t.document_path.trim().is_empty())
        .map(|t| normalize_target(key, t))
        .collect();

    if targets.is_empty() {
        return Err(SymdexError::invalid_record(position, key, "no targets"));
    }

    Ok(NormalizedRecord {
        key: key.to_string(),
        compare_key: compare_key(key),
        targets: dedup_targets(targets),
    })
}

fn normalize_target(key: &str, raw: RawTarget) -> Target {
    let document_path = raw.document_path.trim().to_string();
    let anchor = raw.anchor.trim().to_string();
    let (signature, provenance_label) = split_label(&raw.label);
    let kind_hint = infer_kind(
        key,
        &document_path,
        &anchor,
        signature.as_deref(),
        &provenance_label,
    );

    Target {
        document_path,
        anchor,
        provenance_label,
        kind_hint,
        signature,
        ordinal: 0,
    }
}

/// Keep the first target per `(document_path, anchor)` and renumber ordinals.
pub(crate) fn dedup_targets(targets: Vec<Target>) -> Vec<Target> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut kept = Vec::with_capacity(targets.len());

    for target in targets {
        if seen.insert((target.document_path.clone(), target.anchor.clone())) {
            kept.push(target);
        }
    }

    for (ordinal, target) in kept.iter_mut().enumerate() {
        target.ordinal = ordinal;
    }
    kept
}

/// Split `eepfs_read(...):&#160;eepromfs.c` into signature and provenance.
fn split_label(label: &str) -> (Option<String>, String) {
    match label.rfind(LABEL_SEPARATOR) {
        Some(pos) => {
            let signature = label[..pos].trim();
            let provenance = label[pos + LABEL_SEPARATOR.len()..].trim();
            let signature = (!signature.is_empty()).then(|| signature.to_string());
            (signature, provenance.to_string())
        }
        None => (None, label.trim().to_string()),
    }
}

/// Best-effort guess from anchor/page/label markers; falls back to `Function`.
pub fn infer_kind(
    key: &str,
    document_path: &str,
    anchor: &str,
    signature: Option<&str>,
    provenance_label: &str,
) -> KindHint {
    if ["struct", "union", "class"]
        .iter()
        .any(|m| anchor.starts_with(m))
    {
        return KindHint::Type;
    }

    if anchor.is_empty() {
        let page = document_path.rsplit('/').next().unwrap_or(document_path);
        if page.starts_with("group__") || key.contains(' ') {
            return KindHint::Group;
        }
        if looks_like_file(key) {
            return KindHint::File;
        }
        if page.starts_with("struct") || page.starts_with("union") {
            return KindHint::Type;
        }
    }

    if anchor.starts_with("gga") {
        return KindHint::Enumerator;
    }
    if signature.is_some_and(|s| s.contains('(')) {
        return KindHint::Function;
    }
    if !anchor.is_empty() && !provenance_label.is_empty() && !looks_like_file(provenance_label) {
        return KindHint::Field;
    }
    if is_macro_name(key) {
        return KindHint::Macro;
    }
    if key.ends_with("_t") {
        return KindHint::Type;
    }

    KindHint::Function
}

fn looks_like_file(name: &str) -> bool {
    if name.chars().any(char::is_whitespace) {
        return false;
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && (1..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

fn is_macro_name(key: &str) -> bool {
    key.chars().any(|c| c.is_ascii_uppercase())
        && key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
