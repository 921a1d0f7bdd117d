use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use tracing::{debug, warn};

use super::driver::WorkerPool;
use super::partition::Chunk;
use super::scanner::scan_chunk;
use crate::errors::{ScanError, ScanResult};
use crate::keywords::KeywordSet;
use crate::results::{ConcurrencyModel, PartialResult};

/// Worker pool made of threads in the current process.
///
/// Each run builds a dedicated rayon pool with exactly one thread per chunk. Workers keep their
/// accumulator to themselves and publish it once on an mpsc channel; the rayon scope is the
/// join barrier, and the channel is drained only after it returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedMemoryPool;

impl SharedMemoryPool {
    pub fn new() -> Self {
        Self
    }
}

impl WorkerPool for SharedMemoryPool {
    fn model(&self) -> ConcurrencyModel {
        ConcurrencyModel::SharedMemory
    }

    fn execute(&self, chunks: Vec<Chunk>, keywords: &KeywordSet) -> ScanResult<Vec<PartialResult>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(chunks.len())
            .thread_name(|i| format!("kwscan-worker-{}", i))
            .build()
            .map_err(|e| ScanError::PoolBuild(e.to_string()))?;

        let (tx, rx) = mpsc::channel::<PartialResult>();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.scope(|scope| {
                for chunk in chunks {
                    let tx = tx.clone();
                    scope.spawn(move |_| {
                        let label = model.worker_label(chunk.worker_id);
                        let partial = scan_chunk(&chunk, keywords, &label);
                        if tx.send(partial).is_err() {
                            warn!(worker = %label, "Result channel closed before publish");
                        }
                    });
                }
            })
        }));
        drop(tx);

        if let Err(payload) = outcome {
            return Err(ScanError::worker_panicked(panic_message(&*payload)));
        }

        let partials: Vec<PartialResult> = rx.try_iter().collect();
        debug!(received = partials.len(), "Drained result channel");
        Ok(partials)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
