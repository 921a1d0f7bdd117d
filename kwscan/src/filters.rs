//! Predicates deciding which discovered files make it into the file set.
//!
//! Free functions rather than a trait: discovery is the only caller, and the rules are plain
//! data from [`ScanConfig`](crate::ScanConfig).
use glob::Pattern;
use std::path::Path;
use tracing::warn;

/// Checks if a file has one of the configured extensions (case-insensitive).
///
/// An empty extension list accepts every file.
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Compiles ignore patterns, dropping (and logging) the invalid ones
pub fn compile_patterns(ignore_patterns: &[String]) -> Vec<Pattern> {
    ignore_patterns
        .iter()
        .filter_map(|pattern| match Pattern::new(pattern) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Skipping invalid ignore pattern");
                None
            }
        })
        .collect()
}

/// Checks if a file matches any of the ignore patterns.
///
/// Patterns are tried against the full path and against the file name alone, so `draft_*`
/// works without a leading `**/`.
pub fn should_ignore(path: &Path, patterns: &[Pattern]) -> bool {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let file_name = path.file_name().map(|n| n.to_string_lossy());

    patterns.iter().any(|p| {
        p.matches(&normalized) || file_name.as_deref().is_some_and(|name| p.matches(name))
    })
}

/// Checks if a file should be part of the file set
pub fn should_include_file(path: &Path, extensions: &[String], patterns: &[Pattern]) -> bool {
    has_valid_extension(path, extensions) && !should_ignore(path, patterns)
}
