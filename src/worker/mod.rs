//! A single background thread that runs queued jobs in order.
//!
//! Hosts that drive a state machine from an event loop can push slow work
//! (loading, saving, network calls) onto a [`SingleThreadWorker`] and fire
//! triggers from the callbacks. The machine itself stays on the host thread.
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::worker::SingleThreadWorker;
//! use std::sync::mpsc;
//!
//! let worker = SingleThreadWorker::new().unwrap();
//! let (tx, rx) = mpsc::channel();
//!
//! let failed = tx.clone();
//! worker.enqueue_with_callback(
//!     || "42".parse::<u32>(),
//!     move |value| tx.send(Ok(value)).unwrap(),
//!     move |error| failed.send(Err(error.to_string())).unwrap(),
//! );
//!
//! assert_eq!(rx.recv().unwrap(), Ok(42));
//! worker.join();
//! ```

mod error;

pub use error::WorkerError;

use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

const DEFAULT_NAME: &str = "hsm-worker";

struct Shared {
    queue: Mutex<VecDeque<Job>>,
    available: Condvar,
    stopped: AtomicBool,
}

impl Shared {
    fn next_job(&self) -> Option<Job> {
        let mut queue = self.queue.lock();
        loop {
            if self.stopped.load(Ordering::Acquire) {
                return None;
            }
            if let Some(job) = queue.pop_front() {
                return Some(job);
            }
            self.available.wait(&mut queue);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

fn run(shared: Arc<Shared>) {
    while let Some(job) = shared.next_job() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!(panic = panic_message(payload.as_ref()), "worker job panicked");
        }
    }
    debug!("worker stopped");
}

/// Settings for spawning a [`SingleThreadWorker`].
#[derive(Debug, Clone, Default)]
pub struct WorkerBuilder {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl WorkerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the worker thread. Defaults to `hsm-worker`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stack size of the worker thread in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn spawn(self) -> Result<SingleThreadWorker, WorkerError> {
        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            stopped: AtomicBool::new(false),
        });

        let mut builder = thread::Builder::new().name(name.clone());
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        let worker_shared = Arc::clone(&shared);
        let handle = builder
            .spawn(move || run(worker_shared))
            .map_err(|source| WorkerError::Spawn {
                name: name.clone(),
                source,
            })?;

        debug!(name = %name, "worker started");
        Ok(SingleThreadWorker {
            shared,
            handle: Some(handle),
        })
    }
}

/// Runs jobs one at a time, in enqueue order, on a dedicated thread.
///
/// A job that panics is logged and the worker moves on to the next one.
/// Stopping is cooperative: the flag is checked before each job, the job in
/// progress finishes, and anything still queued is discarded. Dropping the
/// worker stops it without waiting for the thread.
pub struct SingleThreadWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl SingleThreadWorker {
    /// Spawn a worker with default settings.
    pub fn new() -> Result<Self, WorkerError> {
        WorkerBuilder::new().spawn()
    }

    pub fn builder() -> WorkerBuilder {
        WorkerBuilder::new()
    }

    /// Queue `job` to run after everything already queued.
    ///
    /// Jobs handed to a stopped worker are dropped.
    pub fn enqueue<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_stopped() {
            warn!("worker is stopped, dropping job");
            return;
        }
        self.shared.queue.lock().push_back(Box::new(job));
        self.shared.available.notify_one();
    }

    /// Queue `producer`, then hand its result to `on_success` or `on_failure`.
    ///
    /// Both callbacks run on the worker thread, right after the producer.
    pub fn enqueue_with_callback<R, E, P, OnSuccess, OnFailure>(
        &self,
        producer: P,
        on_success: OnSuccess,
        on_failure: OnFailure,
    ) where
        P: FnOnce() -> Result<R, E> + Send + 'static,
        OnSuccess: FnOnce(R) + Send + 'static,
        OnFailure: FnOnce(E) + Send + 'static,
    {
        self.enqueue(move || match producer() {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        });
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().len()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Ask the worker to stop before its next job.
    pub fn stop(&self) {
        let _queue = self.shared.queue.lock();
        self.shared.stopped.store(true, Ordering::Release);
        self.shared.available.notify_all();
    }

    /// Stop the worker and wait for its thread to exit.
    pub fn join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
    }
}

impl Drop for SingleThreadWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SingleThreadWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleThreadWorker")
            .field("pending", &self.pending())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn jobs_run_in_fifo_order() {
        let worker = SingleThreadWorker::new().unwrap();
        let (tx, rx) = mpsc::channel();

        for i in 0..10 {
            let tx = tx.clone();
            worker.enqueue(move || tx.send(i).unwrap());
        }

        let received: Vec<i32> = (0..10).map(|_| rx.recv_timeout(TIMEOUT).unwrap()).collect();
        assert_eq!(received, (0..10).collect::<Vec<_>>());
        worker.join();
    }

    #[test]
    fn callback_receives_success_or_failure() {
        let worker = SingleThreadWorker::new().unwrap();
        let (tx, rx) = mpsc::channel();

        let ok = tx.clone();
        let err = tx.clone();
        worker.enqueue_with_callback(
            || Ok::<_, String>(7),
            move |value| ok.send(format!("ok {value}")).unwrap(),
            move |e| err.send(format!("err {e}")).unwrap(),
        );

        let ok = tx.clone();
        worker.enqueue_with_callback(
            || Err::<i32, _>("nope".to_string()),
            move |value| ok.send(format!("ok {value}")).unwrap(),
            move |e| tx.send(format!("err {e}")).unwrap(),
        );

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "ok 7");
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "err nope");
        worker.join();
    }

    #[test]
    fn panicking_job_does_not_stop_the_worker() {
        let worker = SingleThreadWorker::new().unwrap();
        let (tx, rx) = mpsc::channel();

        worker.enqueue(|| panic!("job failed"));
        worker.enqueue(move || tx.send("still running").unwrap());

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "still running");
        worker.join();
    }

    #[test]
    fn stop_discards_queued_jobs() {
        let worker = SingleThreadWorker::new().unwrap();
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();

        worker.enqueue(move || {
            started_tx.send(()).unwrap();
            gate_rx.recv().unwrap();
        });
        worker.enqueue(move || tx.send("should not run").unwrap());

        started_rx.recv_timeout(TIMEOUT).unwrap();
        worker.stop();
        assert!(worker.is_stopped());
        gate_tx.send(()).unwrap();
        worker.join();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn jobs_enqueued_after_stop_are_dropped() {
        let worker = SingleThreadWorker::new().unwrap();
        worker.stop();

        let (tx, rx) = mpsc::channel();
        for _ in 0..1000 {
            let tx = tx.clone();
            worker.enqueue(move || tx.send(()).unwrap());
        }
        drop(tx);

        assert_eq!(worker.pending(), 0);
        worker.join();
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn builder_names_the_thread() {
        let worker = WorkerBuilder::new()
            .name("loader")
            .stack_size(256 * 1024)
            .spawn()
            .unwrap();
        let (tx, rx) = mpsc::channel();

        worker.enqueue(move || {
            tx.send(thread::current().name().map(str::to_string)).unwrap();
        });

        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            Some("loader".to_string())
        );
        worker.join();
    }

    #[test]
    fn panic_message_reads_common_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(3);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
