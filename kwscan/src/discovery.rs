use ignore::WalkBuilder;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::filters::{compile_patterns, should_include_file};

/// Collects the file set for a run.
///
/// Only direct children of `root_path` are considered unless `recursive` is set. The result
/// is sorted so repeated runs over the same directory see the same order.
pub fn discover_files(config: &ScanConfig) -> ScanResult<Vec<PathBuf>> {
    if !config.root_path.is_dir() {
        return Err(ScanError::config_error(format!(
            "root path is not a directory: {}",
            config.root_path.display()
        )));
    }

    let patterns = compile_patterns(&config.ignore_patterns);

    let mut walker = WalkBuilder::new(&config.root_path);
    walker
        .hidden(true)
        .ignore(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true);
    if !config.recursive {
        walker.max_depth(Some(1));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if should_include_file(entry.path(), &config.file_extensions, &patterns) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!(
        root = %config.root_path.display(),
        count = files.len(),
        "Discovered files"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(root: &std::path::Path) -> ScanConfig {
        ScanConfig {
            root_path: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_collects_txt_files_sorted() {
        let dir = tempdir().unwrap();
        for name in ["c.txt", "a.txt", "b.md", "b.txt"] {
            fs::write(dir.path().join(name), "content").unwrap();
        }

        let files = discover_files(&config_for(dir.path())).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_recursion_is_opt_in() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("top.txt"), "x").unwrap();
        fs::write(dir.path().join("nested").join("deep.txt"), "x").unwrap();

        let mut config = config_for(dir.path());
        assert_eq!(discover_files(&config).unwrap().len(), 1);

        config.recursive = true;
        assert_eq!(discover_files(&config).unwrap().len(), 2);
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "x").unwrap();
        fs::write(dir.path().join("draft_1.txt"), "x").unwrap();

        let mut config = config_for(dir.path());
        config.ignore_patterns = vec!["draft_*".to_string()];
        let files = discover_files(&config).unwrap();
        assert_eq!(files, vec![dir.path().join("keep.txt")]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(discover_files(&config_for(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let dir = tempdir().unwrap();
        let result = discover_files(&config_for(&dir.path().join("missing")));
        assert!(matches!(result, Err(ScanError::ConfigError(_))));
    }
}
