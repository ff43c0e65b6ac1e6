//! Reads a directory of searchData files into one ordered batch.

use flate2::read::GzDecoder;
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{Result, SymdexError};
use crate::index::RawRecord;
use crate::searchdata;

/// Everything read from a directory, in file-name order.
#[derive(Debug, Default)]
pub struct LoadedBatch {
    pub files: Vec<PathBuf>,
    pub records: Vec<RawRecord>,
    pub errors: Vec<SymdexError>,
}

/// Load every file in `dir` whose name matches `file_pattern`.
///
/// Files are read in name order so the batch, and therefore the index built
/// from it, is the same on every run. `.gz` files are decompressed on the fly.
pub fn load_dir(dir: &Path, file_pattern: &str) -> Result<LoadedBatch> {
    let start = Instant::now();
    let pattern = Regex::new(file_pattern)?;

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|name| pattern.is_match(&name.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    let mut batch = LoadedBatch::default();
    for path in files {
        let text = read_text(&path)?;
        let name = path.display().to_string();
        let data = searchdata::parse(&name, &text)?;
        debug!(file = %name, records = data.records.len(), "loaded search data");

        batch.records.extend(data.records);
        batch.errors.extend(data.errors);
        batch.files.push(path);
    }

    info!(
        dir = %dir.display(),
        files = batch.files.len(),
        records = batch.records.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "search data loaded"
    );

    Ok(batch)
}

/// Read a file as UTF-8, gunzipping it first when it ends in `.gz`.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let is_gz = path.extension().is_some_and(|ext| ext == "gz");

    if is_gz {
        let mut decoder = GzDecoder::new(bytes.as_slice());
        let mut text = String::new();
        decoder.read_to_string(&mut text)?;
        Ok(text)
    } else {
        String::from_utf8(bytes).map_err(|e| {
            SymdexError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}
