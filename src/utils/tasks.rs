use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Cooperative cancellation flag handed to every job.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub type Job = Box<dyn FnOnce(&CancelToken) + Send + 'static>;

/// Handle to a submitted background job.
pub struct TaskHandle {
    pub id: Uuid,
    pub label: String,
    cancel: CancelToken,
    join: Mutex<Option<JoinHandle<()>>>,
    finished: Arc<AtomicBool>,
}

impl TaskHandle {
    fn new(label: &str, cancel: CancelToken, finished: Arc<AtomicBool>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            cancel,
            join: Mutex::new(None),
            finished,
        }
    }

    /// Requests cancellation. A job that has not started yet never runs.
    pub fn cancel(&self) {
        self.cancel.cancel();
        if let Some(join) = self.join.lock().as_ref() {
            join.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Runs fire-and-forget work off the caller's thread.
pub trait TaskRunner: Send + Sync {
    fn submit(&self, label: &str, job: Job) -> TaskHandle;
}

fn wrap(job: Job, cancel: CancelToken, finished: Arc<AtomicBool>) -> impl FnOnce() + Send {
    move || {
        if !cancel.is_cancelled() {
            job(&cancel);
        }
        finished.store(true, Ordering::SeqCst);
    }
}

/// Background runner on a dedicated tokio runtime.
pub struct TokioRunner {
    runtime: Option<Runtime>,
}

impl TokioRunner {
    pub fn new() -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("session-keeper-bg")
            .build()?;
        Ok(Self {
            runtime: Some(runtime),
        })
    }
}

impl TaskRunner for TokioRunner {
    fn submit(&self, label: &str, job: Job) -> TaskHandle {
        let cancel = CancelToken::default();
        let finished = Arc::new(AtomicBool::new(false));
        let handle = TaskHandle::new(label, cancel.clone(), finished.clone());

        match self.runtime.as_ref() {
            Some(rt) => {
                debug!("Submitting task {} ({})", handle.label, handle.id);
                *handle.join.lock() = Some(rt.spawn_blocking(wrap(job, cancel, finished)));
            }
            None => finished.store(true, Ordering::SeqCst),
        }

        handle
    }
}

impl Drop for TokioRunner {
    fn drop(&mut self) {
        // Unfinished jobs are abandoned, not awaited.
        if let Some(rt) = self.runtime.take() {
            rt.shutdown_background();
        }
    }
}

/// Runs jobs synchronously on the submitting thread.
pub struct InlineRunner;

impl TaskRunner for InlineRunner {
    fn submit(&self, label: &str, job: Job) -> TaskHandle {
        let cancel = CancelToken::default();
        let finished = Arc::new(AtomicBool::new(false));
        let handle = TaskHandle::new(label, cancel.clone(), finished.clone());
        wrap(job, cancel, finished)();
        handle
    }
}
