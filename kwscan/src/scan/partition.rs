use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Default upper bound on concurrent workers
pub const DEFAULT_MAX_WORKERS: usize = 3;

/// A contiguous run of the file set owned by one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Identifier of the worker that owns this chunk
    pub worker_id: usize,
    /// Files in their original order
    #[serde(with = "crate::path_serde::list")]
    pub files: Vec<PathBuf>,
}

/// Number of workers used for `file_count` files
pub fn worker_count(file_count: usize, max_workers: NonZeroUsize) -> usize {
    file_count.min(max_workers.get())
}

/// Splits `files` into at most `max_workers` contiguous chunks.
///
/// Every chunk but the last holds `files.len() / worker_count` files and the last one takes
/// the remainder as well, so it may carry up to `worker_count - 1` extra files. An empty
/// input yields no chunks.
pub fn partition(files: &[PathBuf], max_workers: NonZeroUsize) -> Vec<Chunk> {
    let workers = worker_count(files.len(), max_workers);
    if workers == 0 {
        return Vec::new();
    }

    let chunk_size = files.len() / workers;
    (0..workers)
        .map(|worker_id| {
            let start = worker_id * chunk_size;
            let end = if worker_id + 1 < workers {
                start + chunk_size
            } else {
                files.len()
            };
            Chunk {
                worker_id,
                files: files[start..end].to_vec(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("{}.txt", i))).collect()
    }

    fn three() -> NonZeroUsize {
        NonZeroUsize::new(DEFAULT_MAX_WORKERS).unwrap()
    }

    fn sizes(chunks: &[Chunk]) -> Vec<usize> {
        chunks.iter().map(|c| c.files.len()).collect()
    }

    #[test]
    fn test_last_chunk_takes_remainder() {
        let chunks = partition(&files(5), three());
        assert_eq!(sizes(&chunks), vec![1, 1, 3]);
    }

    #[test]
    fn test_fewer_files_than_workers() {
        let chunks = partition(&files(2), three());
        assert_eq!(sizes(&chunks), vec![1, 1]);
        assert_eq!(
            chunks.iter().map(|c| c.worker_id).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_even_split() {
        let chunks = partition(&files(9), three());
        assert_eq!(sizes(&chunks), vec![3, 3, 3]);
    }

    #[test]
    fn test_empty_input_has_no_chunks() {
        assert!(partition(&[], three()).is_empty());
        assert_eq!(worker_count(0, three()), 0);
    }

    #[test]
    fn test_chunks_reassemble_input() {
        for n in 1..40 {
            for max in 1..6 {
                let input = files(n);
                let max = NonZeroUsize::new(max).unwrap();
                let chunks = partition(&input, max);

                assert_eq!(chunks.len(), worker_count(n, max));
                let rebuilt: Vec<PathBuf> =
                    chunks.into_iter().flat_map(|c| c.files).collect();
                assert_eq!(rebuilt, input, "n={} max={}", n, max);
            }
        }
    }
}
