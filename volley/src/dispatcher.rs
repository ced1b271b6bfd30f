//! dispatcher module hands out work units to the workers

use crate::error::{Error, Result};
use async_trait::async_trait;
use log::debug;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering::*};
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

/// upper bound of work units a single dispatcher will buffer
pub const MAX_REQUESTS: u64 = 10_000_000;

/// one request to perform, units are fungible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit;

#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// query current task process, returning 0 to 1
    fn get_process(&self) -> f64;

    /// worker apply a job from dispatcher, return true continue to handle,
    /// return false worker will exit.
    async fn try_apply_job(&self) -> bool;

    /// when worker complete job, it will notify the dispatcher
    fn complete_job(&self);
}

/// [CountDispatcher] is a count based task dispatcher
///
/// All units are queued up front into a channel sized to hold every one of
/// them, and the sending side is dropped right away, so workers see the
/// channel as closed once it is drained.
pub struct CountDispatcher {
    /// total requests number will send to server
    total: u64,

    /// queued work units, shared by every worker
    receiver: Mutex<mpsc::Receiver<WorkUnit>>,

    /// the amount of work done
    completed: AtomicU64,

    /// indicate whether to complete
    is_done: AtomicBool,

    /// instant taken right before the first unit was queued
    started_at: Instant,
}

impl CountDispatcher {
    /// queue `total` work units and close the queue
    pub fn new(total: NonZeroU64) -> Result<Self> {
        let total = total.get();
        if total > MAX_REQUESTS {
            return Err(Error::Config(format!(
                "requests must not exceed {}, got {}",
                MAX_REQUESTS, total
            )));
        }

        let (sender, receiver) = mpsc::channel(total as usize);
        let started_at = Instant::now();
        for _ in 0..total {
            // capacity equals total, a full queue is impossible here
            if sender.try_send(WorkUnit).is_err() {
                break;
            }
        }
        drop(sender);
        debug!("queued {} work units", total);

        Ok(Self {
            total,
            receiver: Mutex::new(receiver),
            completed: AtomicU64::new(0),
            is_done: AtomicBool::new(false),
            started_at,
        })
    }

    /// number of units this dispatcher produced
    pub fn total(&self) -> u64 {
        self.total
    }

    /// channel capacity able to hold one message per unit
    pub fn capacity(&self) -> usize {
        self.total as usize
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

#[async_trait]
impl Dispatcher for CountDispatcher {
    fn get_process(&self) -> f64 {
        if self.is_done.load(Acquire) {
            return 1.0;
        }
        self.completed.load(Acquire) as f64 / self.total as f64
    }

    async fn try_apply_job(&self) -> bool {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await.is_some()
    }

    fn complete_job(&self) {
        let completed = self.completed.fetch_add(1, SeqCst) + 1;
        if completed >= self.total && !self.is_done.load(Acquire) {
            self.is_done.store(true, SeqCst);
        }
    }
}
