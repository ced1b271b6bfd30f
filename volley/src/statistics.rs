//! mod statistics counts all relevant information about the server response

use log::debug;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// histogram key of a request that never got a status code back
pub const FAILED: u16 = 0;

/// result of executing one work unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// the server answered, whatever the status
    Status(StatusCode),

    /// transport error, no status code obtained
    Failed,
}

impl Outcome {
    /// histogram key of the outcome, [FAILED] for a transport error
    pub fn code(&self) -> u16 {
        match self {
            Outcome::Status(status) => status.as_u16(),
            Outcome::Failed => FAILED,
        }
    }
}

/// [Statistics] is the single owner of every collected outcome
#[derive(Debug, Default)]
pub struct Statistics {
    total: u64,
    successful: u64,
    status_codes: BTreeMap<u16, u64>,
}

impl Statistics {
    pub fn new() -> Statistics {
        Self::default()
    }

    /// receive outcomes until every sender is dropped, then build the report
    /// with the time elapsed since `start`
    pub async fn collect(
        mut receiver: mpsc::Receiver<Outcome>,
        start: Instant,
    ) -> Report {
        let mut statistics = Statistics::new();
        while let Some(outcome) = receiver.recv().await {
            statistics.record(outcome);
        }
        debug!("outcome channel closed after {} outcomes", statistics.total);
        statistics.into_report(start.elapsed())
    }

    pub fn record(&mut self, outcome: Outcome) {
        let code = outcome.code();
        if code == StatusCode::OK.as_u16() {
            self.successful += 1;
        }
        *self.status_codes.entry(code).or_insert(0) += 1;
        self.total += 1;
    }

    /// number of outcomes recorded so far
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn into_report(self, total_time: Duration) -> Report {
        Report {
            total_requests: self.total,
            successful_requests: self.successful,
            status_codes: self.status_codes,
            total_time,
        }
    }
}

/// aggregate snapshot of a finished load test
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_requests: u64,

    /// requests answered with status 200
    pub successful_requests: u64,

    /// occurrences per status code, [FAILED] included
    pub status_codes: BTreeMap<u16, u64>,

    /// wall clock time from dispatch start to the last outcome
    pub total_time: Duration,
}

impl Report {
    pub fn requests_per_second(&self) -> f64 {
        let seconds = self.total_time.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.total_requests as f64 / seconds
    }

    /// number of requests that failed at the transport level
    pub fn failed_requests(&self) -> u64 {
        self.status_codes.get(&FAILED).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_code() {
        assert_eq!(Outcome::Status(StatusCode::OK).code(), 200);
        assert_eq!(Outcome::Status(StatusCode::NOT_FOUND).code(), 404);
        assert_eq!(Outcome::Failed.code(), FAILED);
    }

    #[test]
    fn test_record() {
        let mut statistics = Statistics::new();
        statistics.record(Outcome::Status(StatusCode::OK));
        statistics.record(Outcome::Status(StatusCode::OK));
        statistics.record(Outcome::Status(StatusCode::INTERNAL_SERVER_ERROR));
        statistics.record(Outcome::Failed);

        let report = statistics.into_report(Duration::from_secs(2));
        assert_eq!(report.total_requests, 4);
        assert_eq!(report.successful_requests, 2);
        assert_eq!(
            report.status_codes,
            BTreeMap::from([(FAILED, 1), (200, 2), (500, 1)])
        );
        assert_eq!(report.failed_requests(), 1);
        assert_eq!(report.requests_per_second(), 2.0);
    }

    #[test]
    fn test_other_2xx_not_successful() {
        let mut statistics = Statistics::new();
        statistics.record(Outcome::Status(StatusCode::CREATED));
        statistics.record(Outcome::Status(StatusCode::NO_CONTENT));

        let report = statistics.into_report(Duration::from_secs(1));
        assert_eq!(report.successful_requests, 0);
        assert_eq!(report.failed_requests(), 0);
    }

    #[test]
    fn test_zero_time() {
        let report = Statistics::new().into_report(Duration::ZERO);
        assert_eq!(report.requests_per_second(), 0.0);
    }

    #[tokio::test]
    async fn test_collect_until_closed() {
        let (sender, receiver) = mpsc::channel(10);
        let start = Instant::now();
        let collector = tokio::spawn(Statistics::collect(receiver, start));

        let mut senders = Vec::new();
        for _ in 0..3 {
            senders.push(sender.clone());
        }
        drop(sender);

        for (i, sender) in senders.into_iter().enumerate() {
            sender.send(Outcome::Status(StatusCode::OK)).await.unwrap();
            if i == 2 {
                sender.send(Outcome::Failed).await.unwrap();
            }
        }

        let report = collector.await.unwrap();
        assert_eq!(report.total_requests, 4);
        assert_eq!(report.successful_requests, 3);
        assert_eq!(report.status_codes.values().sum::<u64>(), 4);
    }
}
