use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out tickets 1..=total exactly once across any number of workers.
/// Exhaustion is permanent: once a claim fails, every later claim fails.
pub struct TicketCounter {
    cursor: AtomicU64,
    total: u64,
}

impl TicketCounter {
    pub fn new(total: u64) -> Self {
        TicketCounter {
            cursor: AtomicU64::new(0),
            total,
        }
    }

    /// The next unclaimed ticket, or `None` once all have been handed out.
    /// `fetch_add` gives every caller a distinct pre-increment value, so no
    /// ticket is issued twice and none below the total are skipped.
    pub fn claim(&self) -> Option<u64> {
        let ticket = self.cursor.fetch_add(1, Ordering::Relaxed) + 1;
        (ticket <= self.total).then_some(ticket)
    }
}
