//! Generation scheduler: builds geometry off the render thread.
//!
//! One named worker thread is started on the first submit and lives for
//! the session. Jobs go through a one-slot channel, so at most one job is
//! pending behind the one being built. Finished jobs come back over an
//! unbounded channel which the render thread drains with [`Scheduler::poll`]
//! once per frame; it never blocks on the worker.
//!
//! Failures are contained here. They are logged, reported through the
//! [`NoticeSender`], and handed to the caller as an `Err` result so it can
//! leave its shape unset.

mod notice;
mod worker;

use std::sync::mpsc;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::ShapeSpec;

pub use notice::{notice_channel, Notice, NoticeSender};
pub use worker::{Completed, Job, JobError, JobId, WORKER_NAME};

use worker::Worker;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("a generation job is already pending")]
    Busy,

    #[error("generation worker is unavailable: {0}")]
    WorkerUnavailable(String),
}

pub struct Scheduler<J: Job = ShapeSpec> {
    worker: Option<Worker<J>>,
    results_tx: mpsc::Sender<Completed<J::Output>>,
    results_rx: mpsc::Receiver<Completed<J::Output>>,
    notices: NoticeSender,
    next_id: u64,
    in_flight: usize,
}

impl<J: Job> Scheduler<J> {
    pub fn new(notices: NoticeSender) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            worker: None,
            results_tx,
            results_rx,
            notices,
            next_id: 0,
            in_flight: 0,
        }
    }

    /// Queues `job`, starting the worker on first use.
    ///
    /// Fails with [`SchedulerError::Busy`] while another job is already
    /// waiting in the slot.
    pub fn submit(&mut self, job: J) -> Result<JobId, SchedulerError> {
        let label = job.label();
        let worker = match self.worker.take() {
            Some(w) => w,
            None => {
                let w = Worker::spawn(self.results_tx.clone())
                    .map_err(|e| SchedulerError::WorkerUnavailable(e.to_string()))?;
                log::info!("started {WORKER_NAME} thread");
                w
            }
        };

        let id = JobId(self.next_id);
        match worker.jobs.try_send((id, job)) {
            Ok(()) => {
                self.worker = Some(worker);
                self.next_id += 1;
                self.in_flight += 1;
                log::debug!("queued {label} as job {}", id.0);
                Ok(id)
            }
            Err(mpsc::TrySendError::Full(_)) => {
                self.worker = Some(worker);
                log::debug!("rejected {label}: slot is full");
                Err(SchedulerError::Busy)
            }
            Err(mpsc::TrySendError::Disconnected(_)) => {
                // Dropping the worker here lets the next submit start a new one.
                log::error!("{WORKER_NAME} thread is gone; {label} not queued");
                Err(SchedulerError::WorkerUnavailable(format!("{WORKER_NAME} exited")))
            }
        }
    }

    /// Takes the next finished job without blocking.
    pub fn poll(&mut self) -> Option<Completed<J::Output>> {
        let done = self.results_rx.try_recv().ok()?;
        Some(self.finish(done))
    }

    /// Blocks up to `timeout` for the next finished job.
    ///
    /// For tools and tests; the render loop uses [`poll`](Self::poll).
    pub fn wait(&mut self, timeout: Duration) -> Option<Completed<J::Output>> {
        let done = self.results_rx.recv_timeout(timeout).ok()?;
        Some(self.finish(done))
    }

    /// Jobs submitted but not yet returned by `poll`/`wait`.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    pub fn worker_started(&self) -> bool {
        self.worker.is_some()
    }

    pub fn notices(&self) -> &NoticeSender {
        &self.notices
    }

    /// Drops finished results that have not been collected yet.
    ///
    /// Returns how many were discarded.
    pub fn relieve_memory_pressure(&mut self) -> usize {
        let mut dropped = 0;
        while self.results_rx.try_recv().is_ok() {
            dropped += 1;
        }
        self.in_flight = self.in_flight.saturating_sub(dropped);
        log::warn!("memory pressure: discarded {dropped} cached result(s)");
        dropped
    }

    fn finish(&mut self, done: Completed<J::Output>) -> Completed<J::Output> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match &done.result {
            Ok(_) => log::debug!("{} built in {:.1?}", done.label, done.elapsed),
            Err(e) if e.is_allocation() => {
                log::error!("{}: {e}", done.label);
                self.relieve_memory_pressure();
                self.notices.post(Notice::OutOfMemory { what: done.label.clone() });
            }
            Err(e) => {
                log::error!("{}: {e}", done.label);
                self.notices.post(Notice::GenerationFailed {
                    what: done.label.clone(),
                    reason: e.to_string(),
                });
            }
        }
        done
    }
}
