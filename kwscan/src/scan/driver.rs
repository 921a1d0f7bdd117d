use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use super::aggregate::aggregate;
use super::partition::{partition, Chunk};
use crate::errors::{ScanError, ScanResult};
use crate::keywords::KeywordSet;
use crate::results::{ConcurrencyModel, PartialResult, RunReport};

/// The execution substrate a run is scheduled on.
///
/// Implementations start one worker per chunk, block until every worker has terminated, and
/// only then hand back the partial results that arrived on their channel. Partitioning,
/// scanning and aggregation stay outside of the pool.
pub trait WorkerPool {
    /// Model reported for runs on this pool
    fn model(&self) -> ConcurrencyModel;

    /// Runs `chunks` to completion and returns one partial result per chunk, in arrival order
    fn execute(&self, chunks: Vec<Chunk>, keywords: &KeywordSet) -> ScanResult<Vec<PartialResult>>;
}

/// Scans `files` for `keywords` on `pool` and reports the merged matches.
///
/// An empty file set returns an empty report without starting any worker.
pub fn run<P>(
    pool: &P,
    files: &[PathBuf],
    keywords: &KeywordSet,
    max_workers: NonZeroUsize,
) -> ScanResult<RunReport>
where
    P: WorkerPool + ?Sized,
{
    let model = pool.model();
    if files.is_empty() {
        debug!(model = %model, "No files to scan, skipping worker start");
        return Ok(RunReport::empty(model));
    }

    let start = Instant::now();
    let chunks = partition(files, max_workers);
    let workers = chunks.len();
    info!(
        model = %model,
        workers,
        files = files.len(),
        keywords = keywords.len(),
        "Starting scan"
    );

    let partials = pool.execute(chunks, keywords)?;
    if partials.len() != workers {
        return Err(ScanError::MissingResults {
            expected: workers,
            received: partials.len(),
        });
    }

    let matches = aggregate(partials);
    let elapsed = start.elapsed();
    info!(
        model = %model,
        keywords_matched = matches.len(),
        total_matches = matches.total_matches(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Scan complete"
    );

    Ok(RunReport {
        matches,
        elapsed,
        model,
        workers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scanner::scan_chunk;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    /// Runs chunks one after another on the calling thread, recording what it was given
    struct InlinePool {
        seen: RefCell<Vec<Chunk>>,
        drop_last: bool,
    }

    impl InlinePool {
        fn new() -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
                drop_last: false,
            }
        }
    }

    impl WorkerPool for InlinePool {
        fn model(&self) -> ConcurrencyModel {
            ConcurrencyModel::SharedMemory
        }

        fn execute(
            &self,
            chunks: Vec<Chunk>,
            keywords: &KeywordSet,
        ) -> ScanResult<Vec<PartialResult>> {
            self.seen.borrow_mut().extend(chunks.iter().cloned());
            let mut partials: Vec<PartialResult> = chunks
                .iter()
                .map(|chunk| scan_chunk(chunk, keywords, "Inline-0"))
                .collect();
            if self.drop_last {
                partials.pop();
            }
            Ok(partials)
        }
    }

    fn three() -> NonZeroUsize {
        NonZeroUsize::new(3).unwrap()
    }

    #[test]
    fn test_empty_file_set_starts_no_workers() {
        let pool = InlinePool::new();
        let keywords = KeywordSet::new(["error"]).unwrap();

        let report = run(&pool, &[], &keywords, three()).unwrap();
        assert!(report.matches.is_empty());
        assert_eq!(report.workers, 0);
        assert!(pool.seen.borrow().is_empty());
    }

    #[test]
    fn test_every_file_goes_to_exactly_one_chunk() {
        let dir = tempdir().unwrap();
        let files: Vec<PathBuf> = (0..5)
            .map(|i| {
                let path = dir.path().join(format!("{}.txt", i));
                fs::write(&path, "error").unwrap();
                path
            })
            .collect();
        let keywords = KeywordSet::new(["error"]).unwrap();
        let pool = InlinePool::new();

        let report = run(&pool, &files, &keywords, three()).unwrap();
        assert_eq!(report.workers, 3);
        assert_eq!(report.model, ConcurrencyModel::SharedMemory);

        let seen: Vec<PathBuf> = pool
            .seen
            .borrow()
            .iter()
            .flat_map(|c| c.files.clone())
            .collect();
        assert_eq!(seen, files);
        assert_eq!(report.matches.get("error").unwrap(), files.as_slice());
    }

    #[test]
    fn test_lost_partial_result_fails_the_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "error").unwrap();
        let keywords = KeywordSet::new(["error"]).unwrap();
        let pool = InlinePool {
            seen: RefCell::new(Vec::new()),
            drop_last: true,
        };

        let result = run(&pool, &[path], &keywords, three());
        assert!(matches!(
            result,
            Err(ScanError::MissingResults {
                expected: 1,
                received: 0
            })
        ));
    }
}
