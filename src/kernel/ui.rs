use std::io;
use std::thread::{self, ThreadId};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to the UI-affinity thread.
///
/// Jobs run one at a time, in submission order, on a single dedicated OS
/// thread. The thread exits once every handle is dropped.
#[derive(Clone, Debug)]
pub struct UiThread {
    tx: mpsc::UnboundedSender<Job>,
    thread_id: ThreadId,
}

impl UiThread {
    pub fn spawn() -> io::Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        let handle = thread::Builder::new()
            .name("perfwatch-ui".to_string())
            .spawn(move || {
                debug!("UI thread started");
                while let Some(job) = rx.blocking_recv() {
                    job();
                }
                debug!("UI thread exited");
            })?;

        Ok(Self {
            tx,
            thread_id: handle.thread().id(),
        })
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Runs `job` on the UI thread: inline when already there, queued otherwise.
    /// Fire-and-forget.
    pub fn run<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_current() {
            job();
            return;
        }
        if self.tx.send(Box::new(job)).is_err() {
            warn!("UI thread is gone, dropping job");
        }
    }

    /// Resolves once every job queued before this call has run.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.run(move || {
            let _ = done_tx.send(());
        });
        let _ = done_rx.await;
    }
}
