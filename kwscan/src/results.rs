//! Result types shared by both worker pools.
//!
//! A worker builds a [`PartialResult`] from its own chunk and hands over ownership when it
//! publishes it; after that nothing mutates it. The driver folds the partials into an
//! [`AggregateResult`]. Both are the same [`KeywordMatches`] type, and because a partial is
//! moved (or serialized) rather than shared, two workers never hold a reference to the same map.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Mapping from keyword to the files that contain it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordMatches {
    #[serde(with = "crate::path_serde::keyword_map")]
    entries: BTreeMap<String, Vec<PathBuf>>,
}

/// One worker's matches for its own chunk
pub type PartialResult = KeywordMatches;

/// Matches merged across every worker of a run
pub type AggregateResult = KeywordMatches;

impl KeywordMatches {
    /// Creates an empty mapping
    pub fn new() -> Self {
        Default::default()
    }

    /// Records that `path` contains `keyword`, creating the entry on first hit
    pub fn record(&mut self, keyword: &str, path: &Path) {
        self.entries
            .entry(keyword.to_string())
            .or_default()
            .push(path.to_path_buf());
    }

    /// Appends every file list of `other` to the matching entry of `self`
    pub fn merge(&mut self, other: KeywordMatches) {
        for (keyword, paths) in other.entries {
            self.entries.entry(keyword).or_default().extend(paths);
        }
    }

    /// Files recorded under `keyword`, if any
    pub fn get(&self, keyword: &str) -> Option<&[PathBuf]> {
        self.entries.get(keyword).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(keyword, paths)| (keyword.as_str(), paths.as_slice()))
    }

    /// Number of keywords with at least one match
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of (keyword, file) pairs recorded
    pub fn total_matches(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// The content as a set of (keyword, file) pairs, ignoring file order
    pub fn pairs(&self) -> BTreeSet<(String, PathBuf)> {
        self.entries
            .iter()
            .flat_map(|(keyword, paths)| {
                paths
                    .iter()
                    .map(move |path| (keyword.clone(), path.clone()))
            })
            .collect()
    }

    /// Compares two mappings as sets of (keyword, file) pairs
    pub fn set_eq(&self, other: &KeywordMatches) -> bool {
        self.pairs() == other.pairs()
    }
}

/// The concurrency model a run was executed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConcurrencyModel {
    /// Threads of one process publishing to a shared channel
    SharedMemory,
    /// Child processes returning results by message passing
    IsolatedWorker,
}

impl ConcurrencyModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcurrencyModel::SharedMemory => "shared-memory",
            ConcurrencyModel::IsolatedWorker => "isolated-worker",
        }
    }

    /// Label attached to log events emitted by worker `id`
    pub fn worker_label(&self, id: usize) -> String {
        match self {
            ConcurrencyModel::SharedMemory => format!("Thread-{}", id),
            ConcurrencyModel::IsolatedWorker => format!("Process-{}", id),
        }
    }
}

impl fmt::Display for ConcurrencyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single driver invocation
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Merged keyword matches
    pub matches: AggregateResult,
    /// Wall-clock time from partitioning to the end of aggregation
    pub elapsed: Duration,
    /// Which pool produced the report
    pub model: ConcurrencyModel,
    /// Number of workers spawned, zero for an empty file set
    pub workers: usize,
}

impl RunReport {
    /// Report for a run that had no files to scan
    pub fn empty(model: ConcurrencyModel) -> Self {
        Self {
            matches: AggregateResult::new(),
            elapsed: Duration::ZERO,
            model,
            workers: 0,
        }
    }
}
