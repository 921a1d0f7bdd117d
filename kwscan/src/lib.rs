pub mod config;
pub mod discovery;
pub mod errors;
pub mod filters;
pub mod keywords;
mod path_serde;
pub mod results;
pub mod scan;

pub use config::ScanConfig;
pub use discovery::discover_files;
pub use errors::{ScanError, ScanResult};
pub use keywords::KeywordSet;
pub use results::{AggregateResult, ConcurrencyModel, KeywordMatches, PartialResult, RunReport};
pub use scan::{run, IsolatedWorkerPool, SharedMemoryPool, WorkerPool};
