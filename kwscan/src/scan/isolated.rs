use std::ffi::OsString;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use super::driver::WorkerPool;
use super::partition::Chunk;
use super::protocol::{read_reply, WorkerJob, WorkerReply};
use crate::errors::{ScanError, ScanResult};
use crate::keywords::KeywordSet;
use crate::results::{ConcurrencyModel, PartialResult};

/// Worker pool made of child processes.
///
/// Every chunk is handed to a fresh process started as `program args...`, which is expected to
/// run [`serve`](super::protocol::serve) on its stdin and stdout. Nothing is shared with the
/// child: the job is serialized in, the partial result is serialized out, and a forwarder
/// thread per child moves the decoded reply onto the driver's message channel.
#[derive(Debug, Clone)]
pub struct IsolatedWorkerPool {
    program: PathBuf,
    args: Vec<OsString>,
}

/// A spawned child and the thread forwarding its reply
struct RunningWorker {
    worker_id: usize,
    child: Child,
    forwarder: Option<JoinHandle<()>>,
}

impl IsolatedWorkerPool {
    /// Default arguments selecting the worker entry point of the program
    pub const DEFAULT_ARGS: &'static [&'static str] = &["worker"];

    /// Pool whose workers run `program worker`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Self::DEFAULT_ARGS.iter().map(OsString::from).collect(),
        }
    }

    /// Pool that re-executes the running binary as its workers
    pub fn current_exe() -> ScanResult<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    /// Replaces the arguments passed to every worker process
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn spawn_worker(
        &self,
        chunk: Chunk,
        keywords: &KeywordSet,
        tx: mpsc::Sender<ScanResult<WorkerReply>>,
    ) -> ScanResult<RunningWorker> {
        let worker_id = chunk.worker_id;
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ScanError::worker_spawn(worker_id, e))?;
        debug!(worker_id, pid = child.id(), "Spawned worker process");

        let mut worker = RunningWorker {
            worker_id,
            child,
            forwarder: None,
        };

        // The child reads its whole job before writing anything, so writing it in full
        // here cannot deadlock against a full stdout pipe.
        if let Err(e) = worker.send_job(&WorkerJob::new(chunk, keywords)) {
            return Err(worker.abort_with(e));
        }
        let Some(stdout) = worker.child.stdout.take() else {
            worker.abort();
            return Err(pipe_error(worker_id, "worker stdout unavailable"));
        };

        let forwarder = thread::Builder::new()
            .name(format!("kwscan-forward-{}", worker_id))
            .spawn(move || {
                let reply = read_reply(BufReader::new(stdout));
                if tx.send(reply).is_err() {
                    warn!(worker_id, "Message channel closed before reply arrived");
                }
            });
        match forwarder {
            Ok(handle) => {
                worker.forwarder = Some(handle);
                Ok(worker)
            }
            Err(e) => {
                worker.abort();
                Err(ScanError::worker_spawn(worker_id, e))
            }
        }
    }
}

impl RunningWorker {
    /// Writes the job and closes stdin so the child sees end of input
    fn send_job(&mut self, job: &WorkerJob) -> ScanResult<()> {
        let stdin = self
            .child
            .stdin
            .take()
            .ok_or_else(|| pipe_error(self.worker_id, "worker stdin unavailable"))?;
        let mut writer = BufWriter::new(stdin);
        serde_json::to_writer(&mut writer, job)?;
        writer.flush()?;
        Ok(())
    }

    /// Kills the child and reaps it; used when the run cannot continue
    fn abort(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!(worker_id = self.worker_id, error = %e, "Worker already exited");
        }
        let _ = self.child.wait();
    }

    /// Aborts after `err`, preferring the child's own exit status when it already quit
    fn abort_with(&mut self, err: ScanError) -> ScanError {
        let _ = self.child.kill();
        match self.child.wait() {
            Ok(status) if status.code().is_some() && !status.success() => {
                ScanError::worker_failed(self.worker_id, status)
            }
            _ => err,
        }
    }

    /// Waits for the child to exit and for its reply to be forwarded
    fn join(mut self) -> ScanResult<()> {
        let status = self.child.wait()?;
        if let Some(forwarder) = self.forwarder.take() {
            forwarder
                .join()
                .map_err(|_| ScanError::worker_panicked("reply forwarder panicked"))?;
        }
        if !status.success() {
            return Err(ScanError::worker_failed(self.worker_id, status));
        }
        debug!(worker_id = self.worker_id, "Worker process exited");
        Ok(())
    }
}

fn pipe_error(worker_id: usize, msg: &str) -> ScanError {
    ScanError::worker_spawn(
        worker_id,
        std::io::Error::new(std::io::ErrorKind::BrokenPipe, msg.to_string()),
    )
}

impl WorkerPool for IsolatedWorkerPool {
    fn model(&self) -> ConcurrencyModel {
        ConcurrencyModel::IsolatedWorker
    }

    fn execute(&self, chunks: Vec<Chunk>, keywords: &KeywordSet) -> ScanResult<Vec<PartialResult>> {
        let expected = chunks.len();
        let (tx, rx) = mpsc::channel::<ScanResult<WorkerReply>>();

        let mut workers: Vec<RunningWorker> = Vec::with_capacity(expected);
        for chunk in chunks {
            match self.spawn_worker(chunk, keywords, tx.clone()) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    for worker in &mut workers {
                        worker.abort();
                    }
                    return Err(e);
                }
            }
        }
        drop(tx);

        // Join barrier: every process has exited before the channel is read.
        let mut failure = None;
        for worker in workers {
            if let Err(e) = worker.join() {
                failure.get_or_insert(e);
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        let mut partials = Vec::with_capacity(expected);
        for reply in rx.try_iter() {
            let reply = reply?;
            debug!(worker_id = reply.worker_id, "Received worker reply");
            partials.push(reply.matches);
        }
        Ok(partials)
    }
}
