// Bounded worker pool for permutation jobs
// N permanent threads share one FIFO queue; every job carries a cancel token

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub workers: usize,
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            thread_name: "simx-worker".to_string(),
        }
    }
}

/// Names a job for diagnostics: which routine, on what input shape
#[derive(Debug, Clone)]
pub struct JobLabel {
    pub routine: &'static str,
    pub shape: String,
}

impl JobLabel {
    pub fn new(routine: &'static str, shape: impl Into<String>) -> Self {
        Self { routine, shape: shape.into() }
    }
}

/// Runs the job; `true` forces the abort path without computing
type Runner = Box<dyn FnOnce(bool) + Send>;

struct QueuedJob {
    token: CancelToken,
    run: Runner,
}

struct Shared {
    queue: Mutex<VecDeque<QueuedJob>>,
    condvar: Condvar,
    running: AtomicBool,
    active: AtomicUsize,
    completed: AtomicU64,
    root: Mutex<CancelToken>,
}

/// Handle to a submitted job; resolves with its result or `Error::Aborted`
pub struct JobHandle<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> JobHandle<T> {
    /// Already-resolved handle
    pub fn ready(result: Result<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Block the current thread until the job resolves.
    /// Must not be called from inside an async runtime.
    pub fn wait(self) -> Result<T> {
        self.rx.blocking_recv().unwrap_or(Err(Error::Aborted))
    }
}

impl<T> Future for JobHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // sender dropped without an answer
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::Aborted)),
            Poll::Pending => Poll::Pending,
        }
    }
}

pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Result<Self> {
        let size = config.workers.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            running: AtomicBool::new(true),
            active: AtomicUsize::new(0),
            completed: AtomicU64::new(0),
            root: Mutex::new(CancelToken::new()),
        });

        let mut handles = Vec::with_capacity(size);
        for worker_id in 0..size {
            let shared = shared.clone();
            let handle = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name, worker_id))
                .spawn(move || worker_loop(shared))?;
            handles.push(handle);
        }
        debug!(workers = size, "worker pool started");

        Ok(Self {
            shared,
            handles: Mutex::new(handles),
            size,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// A fresh token under the pool root; `abort_all` cancels it
    pub fn token(&self) -> CancelToken {
        self.shared.root.lock().child()
    }

    /// Queue `f` for execution on a worker
    ///
    /// The job resolves `Err(Error::Aborted)` if its token is cancelled before
    /// it starts or while it runs. A panic inside `f` becomes `Error::Worker`.
    pub fn submit<T, F>(&self, label: JobLabel, token: CancelToken, f: F) -> JobHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> Result<T> + Send + 'static,
    {
        if !self.shared.running.load(Ordering::Acquire) {
            return JobHandle::ready(Err(Error::PoolClosed));
        }

        let (tx, rx) = oneshot::channel();
        let job_token = token.clone();
        let run: Runner = Box::new(move |force_abort| {
            if force_abort || job_token.is_cancelled() {
                let _ = tx.send(Err(Error::Aborted));
                return;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&job_token)));
            let result = match outcome {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(routine = label.routine, shape = %label.shape, %message, "worker routine panicked");
                    Err(Error::Worker {
                        routine: label.routine.to_string(),
                        message,
                    })
                }
            };

            let result = match result {
                Ok(_) if job_token.is_cancelled() => Err(Error::Aborted),
                Err(e) if !e.is_aborted() => {
                    warn!(routine = label.routine, shape = %label.shape, error = %e, "worker routine failed");
                    Err(e)
                }
                other => other,
            };
            let _ = tx.send(result);
        });

        let mut queue = self.shared.queue.lock();
        // shutdown clears `running` before draining the queue under this lock
        if !self.shared.running.load(Ordering::Acquire) {
            return JobHandle::ready(Err(Error::PoolClosed));
        }
        queue.push_back(QueuedJob { token, run });
        self.shared.condvar.notify_one();

        JobHandle { rx }
    }

    /// Cancel every outstanding job and start a new root for later ones
    pub fn abort_all(&self) {
        let previous = {
            let mut root = self.shared.root.lock();
            std::mem::replace(&mut *root, CancelToken::new())
        };
        previous.cancel();
        let reaped = self.reap_cancelled();
        debug!(reaped, "aborted all outstanding jobs");
    }

    /// Resolve queued jobs whose token is already cancelled without running
    /// them. Returns how many were removed.
    pub fn reap_cancelled(&self) -> usize {
        let dead: Vec<QueuedJob> = {
            let mut queue = self.shared.queue.lock();
            let (dead, live): (Vec<QueuedJob>, Vec<QueuedJob>) =
                queue.drain(..).partition(|job| job.token.is_cancelled());
            *queue = VecDeque::from(live);
            dead
        };
        let count = dead.len();
        for job in dead {
            (job.run)(true);
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.shared.queue.lock().len()
    }

    pub fn active(&self) -> usize {
        self.shared.active.load(Ordering::Acquire)
    }

    pub fn completed(&self) -> u64 {
        self.shared.completed.load(Ordering::Relaxed)
    }

    /// Stop accepting work, abort queued jobs and join the workers
    pub fn shutdown(&self) {
        if !self.shared.running.swap(false, Ordering::AcqRel) {
            return;
        }
        self.shared.root.lock().cancel();

        let remaining: Vec<QueuedJob> = self.shared.queue.lock().drain(..).collect();
        for job in remaining {
            (job.run)(true);
        }
        self.shared.condvar.notify_all();

        for handle in self.handles.lock().drain(..) {
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
        debug!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            while queue.is_empty() && shared.running.load(Ordering::Acquire) {
                shared.condvar.wait(&mut queue);
            }
            if !shared.running.load(Ordering::Acquire) {
                break;
            }
            queue.pop_front()
        };

        if let Some(job) = job {
            shared.active.fetch_add(1, Ordering::AcqRel);
            (job.run)(false);
            shared.active.fetch_sub(1, Ordering::AcqRel);
            shared.completed.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
