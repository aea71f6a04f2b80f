//! Usage counting for operational telemetry.

use std::sync::atomic::{AtomicU64, Ordering};

/// Label recorded after a successful bulk creation.
pub const BULK_CREATE_APPOINTMENTS: &str = "Bulk create appointments";
/// Label recorded after a reason search.
pub const GET_APPOINTMENTS_BY_REASON: &str = "Get appointments by reason";
/// Label recorded after appointments were deleted.
pub const DELETE_APPOINTMENTS_BY_SSN: &str = "Delete appointments by SSN";
/// Label recorded after a latest-appointment lookup.
pub const FIND_LATEST_APPOINTMENT_BY_SSN: &str = "Find latest appointment by SSN";

/// Side-effect-only sink notified after service operations.
///
/// Implementations must not fail and must tolerate concurrent callers.
pub trait UsageRecorder: Send + Sync {
    fn record(&self, label: &str);
}

/// Counter shared by every caller of the service.
///
/// Starts at zero; create one per process and share it.
#[derive(Debug, Default)]
pub struct UsageCounter {
    count: AtomicU64,
}

impl UsageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded invocations so far.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl UsageRecorder for UsageCounter {
    fn record(&self, label: &str) {
        let current = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(counter = current, context = label, "hospital service used");
    }
}

/// Recorder that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopUsageRecorder;

impl UsageRecorder for NoopUsageRecorder {
    fn record(&self, _label: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counter_starts_at_zero() {
        assert_eq!(UsageCounter::new().count(), 0);
    }

    #[test]
    fn test_counter_increments() {
        let counter = UsageCounter::new();
        counter.record(BULK_CREATE_APPOINTMENTS);
        counter.record(GET_APPOINTMENTS_BY_REASON);
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_concurrent_increments_not_lost() {
        let counter = Arc::new(UsageCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.record("test");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.count(), 8000);
    }
}
