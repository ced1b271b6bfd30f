//! report module renders a [Report] for humans

use crate::statistics::{Report, FAILED};
use std::fmt;

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Load Test Report ===")?;
        writeln!(f, "Total Time: {:?}", self.total_time)?;
        writeln!(f, "Total Requests: {}", self.total_requests)?;
        writeln!(f, "Successful Requests (200): {}", self.successful_requests)?;

        writeln!(f, "\nStatus Code Distribution:")?;
        for (code, count) in &self.status_codes {
            if *code == FAILED {
                writeln!(f, "Failed Requests (Error): {}", count)?;
            } else {
                writeln!(f, "Status {}: {}", code, count)?;
            }
        }

        writeln!(
            f,
            "\nRequests per second: {:.2}",
            self.requests_per_second()
        )
    }
}
