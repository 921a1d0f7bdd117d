//! Error types for kwscan.
//!
//! # Where errors stop
//!
//! The engine distinguishes between errors that are absorbed and errors that end a run:
//!
//! 1. **File-level failures** (missing file, permission denied, invalid UTF-8, any other read
//!    error) carry the offending path. The scanner logs them against the worker that hit them
//!    and skips the file; they never reach the caller of a driver.
//!
//! 2. **Run-level failures** (a worker that cannot be spawned, panics, exits abnormally, or
//!    sends a malformed reply) are returned from the driver as `Err`:
//!    ```rust,ignore
//!    match run(&SharedMemoryPool::new(), &files, &keywords, max_workers) {
//!        Ok(report) => // Print report,
//!        Err(ScanError::WorkerSpawn { worker_id, .. }) => // Pool could not start,
//!        Err(e) => // Any other fatal error
//!    }
//!    ```
//!
//! 3. **Configuration failures** (bad keyword list, unreadable config file) surface before any
//!    worker is started.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while configuring or running a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
    #[error("IO error reading {path}: {source}")]
    FileIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),
    #[error("Failed to spawn worker {worker_id}: {source}")]
    WorkerSpawn {
        worker_id: usize,
        source: std::io::Error,
    },
    #[error("Worker {worker_id} exited abnormally: {status}")]
    WorkerFailed { worker_id: usize, status: String },
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),
    #[error("Worker protocol error: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("Missing worker results: expected {expected}, received {received}")]
    MissingResults { expected: usize, received: usize },
}

impl ScanError {
    /// Classifies an I/O error raised while opening or reading `path`
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::FileIo {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::str::Utf8Error) -> Self {
        Self::EncodingError {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_keyword(msg: impl Into<String>) -> Self {
        Self::InvalidKeyword(msg.into())
    }

    pub fn worker_spawn(worker_id: usize, source: std::io::Error) -> Self {
        Self::WorkerSpawn { worker_id, source }
    }

    pub fn worker_failed(worker_id: usize, status: impl ToString) -> Self {
        Self::WorkerFailed {
            worker_id,
            status: status.to_string(),
        }
    }

    pub fn worker_panicked(msg: impl Into<String>) -> Self {
        Self::WorkerPanicked(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let path = Path::new("test.txt");
        let err = ScanError::file_not_found(path);
        assert!(matches!(err, ScanError::FileNotFound(_)));

        let err = ScanError::permission_denied(path);
        assert!(matches!(err, ScanError::PermissionDenied(_)));

        let err = ScanError::invalid_keyword("empty");
        assert!(matches!(err, ScanError::InvalidKeyword(_)));

        let err = ScanError::worker_failed(2, "exit status: 1");
        assert!(matches!(err, ScanError::WorkerFailed { worker_id: 2, .. }));
    }

    #[test]
    fn test_from_io_classifies_kind() {
        let path = Path::new("missing.txt");
        let err = ScanError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ScanError::FileNotFound(ref p) if p == path));

        let err = ScanError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ScanError::PermissionDenied(_)));

        let err = ScanError::from_io(path, io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(matches!(err, ScanError::FileIo { path: ref p, .. } if p == path));
        assert_eq!(err.to_string(), "IO error reading missing.txt: boom");
    }

    #[test]
    fn test_error_messages() {
        let err = ScanError::config_error("Missing required field");
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field"
        );

        let err = ScanError::file_not_found("test.txt");
        assert_eq!(err.to_string(), "File not found: test.txt");

        let err = ScanError::MissingResults {
            expected: 3,
            received: 2,
        };
        assert_eq!(
            err.to_string(),
            "Missing worker results: expected 3, received 2"
        );
    }
}
