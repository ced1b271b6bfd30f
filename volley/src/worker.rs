//! worker module runs the fixed pool of tasks that drain the dispatcher

use crate::client::Requester;
use crate::dispatcher::Dispatcher;
use crate::statistics::Outcome;
use log::{debug, error};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// [WorkerPool] owns one join handle per spawned worker
pub struct WorkerPool {
    handles: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// spawn `concurrency` workers, each holding its own clone of `sender`.
    ///
    /// The pool keeps no sender of its own, so the outcome channel closes
    /// exactly when the last worker returns.
    pub fn spawn<R>(
        concurrency: NonZeroUsize,
        dispatcher: Arc<dyn Dispatcher>,
        requester: Arc<R>,
        sender: mpsc::Sender<Outcome>,
    ) -> WorkerPool
    where
        R: Requester + 'static,
    {
        let handles = (0..concurrency.get())
            .map(|id| {
                let worker = Worker {
                    id,
                    dispatcher: dispatcher.clone(),
                    requester: requester.clone(),
                    sender: sender.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        WorkerPool { handles }
    }

    /// number of spawned workers
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// wait for every worker to terminate, returning how many units they
    /// handled in total
    pub async fn join(self) -> u64 {
        let mut handled = 0;
        for (id, handle) in self.handles.into_iter().enumerate() {
            match handle.await {
                Ok(count) => handled += count,
                Err(err) => {
                    error!("worker-{} terminated abnormally: {}", id, err)
                },
            }
        }
        handled
    }
}

struct Worker<R> {
    id: usize,
    dispatcher: Arc<dyn Dispatcher>,
    requester: Arc<R>,
    sender: mpsc::Sender<Outcome>,
}

impl<R: Requester> Worker<R> {
    async fn run(self) -> u64 {
        debug!("worker-{} started", self.id);
        let mut handled = 0;
        while self.dispatcher.try_apply_job().await {
            let outcome = self.requester.fetch().await;
            if self.sender.send(outcome).await.is_err() {
                error!("worker-{} lost the outcome channel", self.id);
                break;
            }
            self.dispatcher.complete_job();
            handled += 1;
        }
        debug!("worker-{} exited after {} requests", self.id, handled);
        handled
    }
}
