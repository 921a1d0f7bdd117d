use std::path::Path;
use tracing::{debug, error, info};

use super::partition::Chunk;
use crate::errors::{ScanError, ScanResult};
use crate::keywords::KeywordSet;
use crate::results::PartialResult;

/// Reads the whole file and decodes it as UTF-8
pub(crate) fn read_text(path: &Path) -> ScanResult<String> {
    let bytes = std::fs::read(path).map_err(|e| ScanError::from_io(path, e))?;
    String::from_utf8(bytes).map_err(|e| ScanError::encoding_error(path, e.utf8_error()))
}

/// Scans one file and records every keyword it contains into `matches`.
///
/// Failures to open or decode the file are logged against `worker` and the file is skipped
/// without touching `matches`.
pub fn scan_file(path: &Path, keywords: &KeywordSet, matches: &mut PartialResult, worker: &str) {
    let contents = match read_text(path) {
        Ok(contents) => contents,
        Err(e) => {
            error!(worker = %worker, path = %path.display(), error = %e, "Error reading file");
            return;
        }
    };

    info!(worker = %worker, path = %path.display(), "File read");
    for keyword in keywords.iter() {
        if contents.contains(keyword) {
            matches.record(keyword, path);
        }
    }
}

/// Scans every file of `chunk` in order into a fresh accumulator owned by the caller
pub fn scan_chunk(chunk: &Chunk, keywords: &KeywordSet, worker: &str) -> PartialResult {
    debug!(worker = %worker, files = chunk.files.len(), "Worker started");

    let mut matches = PartialResult::new();
    for path in &chunk.files {
        scan_file(path, keywords, &mut matches, worker);
    }

    debug!(worker = %worker, keywords = matches.len(), "Worker finished");
    matches
}
