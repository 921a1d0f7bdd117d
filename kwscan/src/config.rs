use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::ScanResult;
use crate::keywords::KeywordSet;
use crate::scan::DEFAULT_MAX_WORKERS;

/// Configuration for a keyword scan.
///
/// # Configuration Locations
///
/// Configuration is layered from these files, later ones overriding earlier ones:
/// 1. Global `$CONFIG_DIR/kwscan/config.yaml`
/// 2. Local `.kwscan.yaml` in the current directory
/// 3. Custom config file passed via `--config`
///
/// Command-line values are applied last through [`ScanConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Keywords searched for, matched as case-sensitive substrings
/// keywords: ["error", "keyword", "test"]
///
/// # Directory whose files are scanned
/// root_path: "."
///
/// # Only files with these extensions are scanned
/// file_extensions: ["txt"]
///
/// # Files to skip (glob syntax)
/// ignore_patterns:
///   - "**/draft_*.txt"
///
/// # Descend into subdirectories
/// recursive: false
///
/// # Upper bound on concurrent workers
/// max_workers: 3
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Keywords to search for
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Root directory to collect files from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Extensions of the files to scan, without the leading dot
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Glob patterns of files to skip
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Whether to descend into subdirectories of `root_path`
    #[serde(default)]
    pub recursive: bool,

    /// Maximum number of workers started for a run
    #[serde(default = "default_max_workers")]
    pub max_workers: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values given on the command line; `None` leaves the configured value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub keywords: Vec<String>,
    pub root_path: Option<PathBuf>,
    pub file_extensions: Option<Vec<String>>,
    pub ignore_patterns: Vec<String>,
    pub recursive: bool,
    pub max_workers: Option<NonZeroUsize>,
    pub log_level: Option<String>,
}

fn default_keywords() -> Vec<String> {
    vec!["error".to_string(), "keyword".to_string(), "test".to_string()]
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

fn default_max_workers() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_MAX_WORKERS).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            root_path: default_root_path(),
            file_extensions: default_file_extensions(),
            ignore_patterns: Vec::new(),
            recursive: false,
            max_workers: default_max_workers(),
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an optional custom file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("kwscan/config.yaml")),
            Some(PathBuf::from(".kwscan.yaml")),
        ];
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // A custom file must exist; the default locations are optional.
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Applies command-line values on top of the loaded configuration
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if !cli.keywords.is_empty() {
            self.keywords = cli.keywords;
        }
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(file_extensions) = cli.file_extensions {
            self.file_extensions = file_extensions;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if cli.recursive {
            self.recursive = true;
        }
        if let Some(max_workers) = cli.max_workers {
            self.max_workers = max_workers;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Validated keyword set built from `keywords`
    pub fn keyword_set(&self) -> ScanResult<KeywordSet> {
        KeywordSet::new(self.keywords.iter().cloned())
    }
}
