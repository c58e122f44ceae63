//! In-process background jobs
//!
//! A `JobQueue` owns one worker thread fed through a crossbeam channel.
//! Dispatching a job returns a `JobHandle`; waiting on it enforces the
//! job's wall-clock timeout. A timed-out job is reported to the caller
//! but keeps its worker busy until it returns.

mod scan_job;

pub use scan_job::ScanJob;

use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Unit of background work
pub trait Job: Send + 'static {
    type Output: Send + 'static;

    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    /// Queue the job must be dispatched on
    fn queue(&self) -> &'static str;

    /// Attempts before giving up (1 = no retry)
    fn tries(&self) -> u32 {
        1
    }

    /// Wall-clock budget for all attempts together
    fn timeout(&self) -> Duration;

    fn handle(&mut self) -> anyhow::Result<Self::Output>;
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job {job} belongs on queue '{expected}', not '{queue}'")]
    WrongQueue {
        job: &'static str,
        expected: &'static str,
        queue: String,
    },

    #[error("queue '{0}' is shut down")]
    QueueClosed(String),

    #[error("job {job} timed out after {timeout:?}")]
    TimedOut { job: &'static str, timeout: Duration },

    #[error("job {job} failed after {attempts} attempt(s): {message}")]
    Failed {
        job: &'static str,
        attempts: u32,
        message: String,
    },

    #[error("job {0} panicked")]
    Panicked(&'static str),
}

type Task = Box<dyn FnOnce() + Send>;

/// Single-worker queue
pub struct JobQueue {
    name: String,
    sender: Option<Sender<Task>>,
    worker: Option<JoinHandle<()>>,
}

impl JobQueue {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (sender, receiver) = unbounded::<Task>();
        let worker_name = name.clone();
        let worker = thread::spawn(move || {
            debug!("Queue '{}' worker started", worker_name);
            for task in receiver {
                task();
            }
            debug!("Queue '{}' worker stopped", worker_name);
        });

        Self {
            name,
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hand `job` to the worker
    pub fn dispatch<J: Job>(&self, mut job: J) -> Result<JobHandle<J::Output>, JobError> {
        let name = job.name();
        if job.queue() != self.name {
            return Err(JobError::WrongQueue {
                job: name,
                expected: job.queue(),
                queue: self.name.clone(),
            });
        }

        let timeout = job.timeout();
        let (done_tx, done_rx) = bounded(1);
        let task: Task = Box::new(move || {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                run_attempts(&mut job)
            }))
            .unwrap_or(Err(JobError::Panicked(name)));
            // The handle may already have given up waiting
            let _ = done_tx.send(outcome);
        });

        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| JobError::QueueClosed(self.name.clone()))?;
        sender
            .send(task)
            .map_err(|_| JobError::QueueClosed(self.name.clone()))?;

        info!("Dispatched {} on queue '{}'", name, self.name);
        Ok(JobHandle {
            name,
            timeout,
            receiver: done_rx,
        })
    }

    /// Stop accepting jobs and wait for queued ones to finish
    pub fn shutdown(mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Queue '{}' worker panicked", self.name);
            }
        }
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once queued tasks drain
        self.sender.take();
    }
}

fn run_attempts<J: Job>(job: &mut J) -> Result<J::Output, JobError> {
    let tries = job.tries().max(1);
    let mut last_error = String::new();
    for attempt in 1..=tries {
        match job.handle() {
            Ok(output) => return Ok(output),
            Err(e) => {
                warn!("{} attempt {}/{} failed: {:#}", job.name(), attempt, tries, e);
                last_error = format!("{:#}", e);
            }
        }
    }
    Err(JobError::Failed {
        job: job.name(),
        attempts: tries,
        message: last_error,
    })
}

/// Pending result of a dispatched job
pub struct JobHandle<T> {
    name: &'static str,
    timeout: Duration,
    receiver: crossbeam_channel::Receiver<Result<T, JobError>>,
}

impl<T> JobHandle<T> {
    /// Block until the job finishes or its timeout elapses
    pub fn wait(self) -> Result<T, JobError> {
        match self.receiver.recv_timeout(self.timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                warn!("{} exceeded its {:?} budget", self.name, self.timeout);
                Err(JobError::TimedOut {
                    job: self.name,
                    timeout: self.timeout,
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(JobError::Panicked(self.name)),
        }
    }
}
