//! Bounded queue for detached side effects.
//!
//! Last-activity touches and similar fire-and-forget work run off the
//! request path: a failed touch must never fail the request it decorates.
//! The queue is bounded so a slow store cannot back memory up without
//! limit; when full, new work is dropped with a warning. Detached work
//! cannot outlive the owning process uncontrolled: [`BackgroundQueue::shutdown`]
//! drains the queue and joins the worker, and the worker also exits on its
//! own once every queue handle is gone.

use std::future::Future;
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::AuthResult;

enum Job {
    Work {
        label: &'static str,
        work: BoxFuture<'static, AuthResult<()>>,
    },
    Shutdown,
}

/// Handle to the background worker. Cheap to clone.
#[derive(Clone)]
pub struct BackgroundQueue {
    tx: mpsc::Sender<Job>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl BackgroundQueue {
    /// Creates a queue and spawns its worker task.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Job>(capacity);

        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    Job::Work { label, work } => {
                        if let Err(error) = work.await {
                            tracing::warn!(task = label, %error, "background task failed");
                        }
                    }
                    // Closing the receiver lets already-buffered work drain
                    // while refusing anything new, then the loop ends.
                    Job::Shutdown => rx.close(),
                }
            }
            tracing::debug!("background queue worker stopped");
        });

        Self {
            tx,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    /// Enqueues detached work.
    ///
    /// Never blocks and never reports failure to the caller: a full or
    /// closed queue drops the work with a warning.
    pub fn dispatch<F>(&self, label: &'static str, work: F)
    where
        F: Future<Output = AuthResult<()>> + Send + 'static,
    {
        let job = Job::Work {
            label,
            work: Box::pin(work),
        };

        match self.tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(task = label, "background queue full, dropping task");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(task = label, "background queue closed, dropping task");
            }
        }
    }

    /// Drains queued work and joins the worker.
    ///
    /// Work dispatched after this call is dropped with a warning. Safe to
    /// call from any clone of the handle; later calls are no-ops.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Job::Shutdown).await;

        let handle = self.worker.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            if let Err(error) = handle.await {
                tracing::warn!(%error, "background worker did not stop cleanly");
            }
        }
    }
}
