//! volley is a minimal http load testing tool.
//!
//! A [CountDispatcher](dispatcher::CountDispatcher) queues one work unit per
//! request, a [WorkerPool](worker::WorkerPool) drains them with a fixed
//! number of tasks and a single [Statistics](statistics::Statistics) owner
//! folds every outcome into the final [Report].

pub mod arg;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod report;
pub mod statistics;
pub mod worker;

pub use self::arg::Arg;
pub use self::config::Config;
pub use self::error::{Error, Result};
pub use self::statistics::{Outcome, Report, FAILED};

use crate::client::{HttpRequester, Requester};
use crate::dispatcher::{CountDispatcher, Dispatcher};
use crate::statistics::Statistics;
use crate::worker::WorkerPool;
use log::{info, warn};
use std::num::{NonZeroU64, NonZeroUsize};
use std::sync::Arc;
use tokio::sync::mpsc;

/// run a load test against the target described by `config`
pub async fn run(config: &Config) -> Result<Report> {
    let requester = Arc::new(HttpRequester::new(config)?);
    run_with(requester, config.requests, config.concurrency).await
}

/// run `requests` fetches through `concurrency` workers sharing `requester`,
/// returning once every outcome has been collected
pub async fn run_with<R>(
    requester: Arc<R>,
    requests: NonZeroU64,
    concurrency: NonZeroUsize,
) -> Result<Report>
where
    R: Requester + 'static,
{
    let dispatcher = Arc::new(CountDispatcher::new(requests)?);
    info!(
        "dispatched {} requests to {} workers",
        dispatcher.total(),
        concurrency
    );

    let (sender, receiver) = mpsc::channel(dispatcher.capacity());
    let aggregator =
        tokio::spawn(Statistics::collect(receiver, dispatcher.started_at()));

    let pool = WorkerPool::spawn(
        concurrency,
        dispatcher.clone() as Arc<dyn Dispatcher>,
        requester,
        sender,
    );
    pool.join().await;

    let report = aggregator.await?;
    if report.total_requests != requests.get() {
        warn!(
            "collected {} outcomes for {} requests",
            report.total_requests, requests
        );
    }
    info!(
        "completed {} requests in {:?}, progress {:.2}",
        report.total_requests,
        report.total_time,
        dispatcher.get_process()
    );

    Ok(report)
}
