use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::catalog::{GeneratedShape, ShapeSpec};
use crate::geometry::GeometryError;

/// Name of the generation thread.
pub const WORKER_NAME: &str = "shape-generator";

/// A unit of work for the generation worker.
pub trait Job: Send + 'static {
    type Output: Send + 'static;

    /// Short name used in logs and notices.
    fn label(&self) -> String;

    fn run(self) -> Result<Self::Output, GeometryError>;
}

impl Job for ShapeSpec {
    type Output = GeneratedShape;

    fn label(&self) -> String {
        self.kind().name().to_string()
    }

    fn run(self) -> Result<GeneratedShape, GeometryError> {
        self.build()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JobError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("job panicked: {0}")]
    Panicked(String),
}

impl JobError {
    pub fn is_allocation(&self) -> bool {
        matches!(self, JobError::Geometry(e) if e.is_allocation())
    }
}

/// Opaque identifier for a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub(super) u64);

/// A finished job as handed back to the render thread.
#[derive(Debug)]
pub struct Completed<T> {
    pub id: JobId,
    pub label: String,
    pub elapsed: Duration,
    pub result: Result<T, JobError>,
}

pub(super) struct Worker<J: Job> {
    pub(super) jobs: mpsc::SyncSender<(JobId, J)>,
}

impl<J: Job> Worker<J> {
    /// Starts the worker thread. The job slot holds one pending job.
    pub(super) fn spawn(results: mpsc::Sender<Completed<J::Output>>) -> std::io::Result<Self> {
        let (jobs, rx) = mpsc::sync_channel::<(JobId, J)>(1);
        thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || run_loop(rx, results))?;
        Ok(Self { jobs })
    }
}

fn run_loop<J: Job>(jobs: mpsc::Receiver<(JobId, J)>, results: mpsc::Sender<Completed<J::Output>>) {
    for (id, job) in jobs {
        let label = job.label();
        let started = Instant::now();
        let result = match panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
            Ok(r) => r.map_err(JobError::from),
            Err(payload) => Err(JobError::Panicked(panic_message(payload.as_ref()))),
        };
        let done = Completed { id, label, elapsed: started.elapsed(), result };
        if results.send(done).is_err() {
            break;
        }
    }
    log::debug!("{WORKER_NAME}: exiting");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }

    #[test]
    fn only_geometry_allocation_counts_as_out_of_memory() {
        let oom = JobError::Geometry(GeometryError::Allocation { shape: "spheres", bytes: 1 << 40 });
        assert!(oom.is_allocation());
        assert!(!JobError::Panicked("x".into()).is_allocation());
    }
}
