use std::time::{Duration, SystemTime};

/// What one dispatched request produced: an HTTP status, how long the
/// request took, and when it finished. Status 0 means the request never got
/// a response (timeout, connection refused, DNS failure).
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: u16,
    pub duration: Duration,
    pub completed_at: SystemTime,
}

impl Outcome {
    /// Sentinel status for transport-level failures.
    pub const ERROR_STATUS: u16 = 0;

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
