//! The keyword scan engine and its two worker pools.
//!
//! # Shared memory vs. isolated workers
//!
//! A run always goes through the same steps, whatever pool executes it:
//!
//! 1. **Partition** the file set into at most `max_workers` contiguous chunks
//!    ([`partition`]).
//! 2. **Execute** one worker per chunk. Each worker scans its files in order into an
//!    accumulator nobody else can see ([`scan_chunk`]), then publishes it.
//! 3. **Join** every worker before reading any result.
//! 4. **Aggregate** the partial results ([`aggregate`]).
//!
//! Only step 2 differs between the pools, which is why it is the only thing behind the
//! [`WorkerPool`] trait:
//!
//! - [`SharedMemoryPool`] runs workers as threads of a rayon pool. The keyword set is borrowed,
//!   not copied, and partials travel over an `mpsc` channel:
//!   ```rust,ignore
//!   pool.scope(|scope| {
//!       for chunk in chunks {
//!           let tx = tx.clone();
//!           scope.spawn(move |_| tx.send(scan_chunk(&chunk, keywords, &label)));
//!       }
//!   });
//!   ```
//! - [`IsolatedWorkerPool`] runs workers as child processes. The job and the reply are
//!   serialized as JSON over the child's stdin and stdout ([`protocol`]), so a worker cannot
//!   observe anything but its own chunk.
//!
//! Neither pool needs a lock around the keyword map: ownership of each partial result moves
//! from the worker to the driver exactly once.
pub mod aggregate;
pub mod driver;
pub mod isolated;
pub mod partition;
pub mod protocol;
pub mod scanner;
pub mod shared;

pub use aggregate::aggregate;
pub use driver::{run, WorkerPool};
pub use isolated::IsolatedWorkerPool;
pub use partition::{partition, worker_count, Chunk, DEFAULT_MAX_WORKERS};
pub use protocol::{serve, WorkerJob, WorkerReply};
pub use scanner::{scan_chunk, scan_file};
pub use shared::SharedMemoryPool;
