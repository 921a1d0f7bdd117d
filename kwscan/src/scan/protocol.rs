//! Wire format between the isolated-worker driver and its child processes.
//!
//! The driver writes one [`WorkerJob`] as JSON to the child's stdin and closes it. The child
//! answers with one [`WorkerReply`] on stdout and exits. Logging goes to stderr so it never
//! mixes with the reply.
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;

use super::partition::Chunk;
use super::scanner::scan_chunk;
use crate::errors::ScanResult;
use crate::keywords::KeywordSet;
use crate::results::{ConcurrencyModel, PartialResult};

/// Work assigned to one isolated worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerJob {
    pub worker_id: usize,
    pub keywords: KeywordSet,
    #[serde(with = "crate::path_serde::list")]
    pub files: Vec<PathBuf>,
}

impl WorkerJob {
    pub fn new(chunk: Chunk, keywords: &KeywordSet) -> Self {
        Self {
            worker_id: chunk.worker_id,
            keywords: keywords.clone(),
            files: chunk.files,
        }
    }
}

/// Partial result sent back by an isolated worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReply {
    pub worker_id: usize,
    pub matches: PartialResult,
}

/// Runs the worker side of the protocol: read one job, scan it, write one reply
pub fn serve<R: Read, W: Write>(input: R, mut output: W) -> ScanResult<()> {
    let job: WorkerJob = serde_json::from_reader(input)?;
    let label = ConcurrencyModel::IsolatedWorker.worker_label(job.worker_id);

    let chunk = Chunk {
        worker_id: job.worker_id,
        files: job.files,
    };
    let matches = scan_chunk(&chunk, &job.keywords, &label);

    serde_json::to_writer(
        &mut output,
        &WorkerReply {
            worker_id: chunk.worker_id,
            matches,
        },
    )?;
    output.flush()?;
    Ok(())
}

pub(crate) fn read_reply<R: Read>(input: R) -> ScanResult<WorkerReply> {
    Ok(serde_json::from_reader(input)?)
}
