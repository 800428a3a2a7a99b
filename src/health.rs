//! Failure counting and up/down status for the remote gateway

use crate::types::ServiceStatus;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

#[derive(Debug)]
struct HealthState {
    failure_count: u32,
    is_up: bool,
}

/// Tracks consecutive transport failures for one adapter instance
///
/// Every read and transition takes the same lock, so the counter and the
/// flag always change together.
#[derive(Debug)]
pub struct HealthTracker {
    failure_reporting_threshold: u32,
    state: Mutex<HealthState>,
}

impl HealthTracker {
    /// Create a healthy tracker
    pub fn new(failure_reporting_threshold: u32) -> Self {
        Self {
            failure_reporting_threshold,
            state: Mutex::new(HealthState {
                failure_count: 0,
                is_up: true,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HealthState> {
        // The state is two plain fields; a panicking holder cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a failure; the status flips to down once the threshold is reached
    pub(crate) fn record_failure(&self) -> ServiceStatus {
        let mut state = self.lock();
        if state.failure_count < self.failure_reporting_threshold {
            state.failure_count += 1;
        }

        if state.is_up && state.failure_count >= self.failure_reporting_threshold {
            state.is_up = false;
            warn!(
                failures = state.failure_count,
                threshold = self.failure_reporting_threshold,
                "PayPal service marked down"
            );
        }

        status_of(&state)
    }

    /// Reset the counter and mark the service up
    pub(crate) fn record_success(&self) {
        let mut state = self.lock();
        if !state.is_up {
            info!("PayPal service recovered");
        }
        state.failure_count = 0;
        state.is_up = true;
    }

    pub fn status(&self) -> ServiceStatus {
        status_of(&self.lock())
    }

    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    pub fn failure_reporting_threshold(&self) -> u32 {
        self.failure_reporting_threshold
    }
}

fn status_of(state: &HealthState) -> ServiceStatus {
    if state.is_up {
        ServiceStatus::Up
    } else {
        ServiceStatus::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_starts_up() {
        let tracker = HealthTracker::new(3);
        assert_eq!(tracker.status(), ServiceStatus::Up);
        assert_eq!(tracker.failure_count(), 0);
    }

    #[test]
    fn test_threshold_failures_mark_down() {
        for threshold in 1..6 {
            let tracker = HealthTracker::new(threshold);
            for _ in 0..threshold - 1 {
                assert_eq!(tracker.record_failure(), ServiceStatus::Up);
            }
            assert_eq!(tracker.status(), ServiceStatus::Up);
            assert_eq!(tracker.record_failure(), ServiceStatus::Down);
        }
    }

    #[test]
    fn test_counter_freezes_at_threshold() {
        let tracker = HealthTracker::new(2);
        for _ in 0..10 {
            tracker.record_failure();
        }
        assert_eq!(tracker.failure_count(), 2);
        assert_eq!(tracker.status(), ServiceStatus::Down);
    }

    #[test]
    fn test_zero_threshold_first_failure_marks_down() {
        let tracker = HealthTracker::new(0);
        assert_eq!(tracker.status(), ServiceStatus::Up);
        assert_eq!(tracker.record_failure(), ServiceStatus::Down);
        assert_eq!(tracker.failure_count(), 0);
    }

    #[test]
    fn test_success_resets() {
        let tracker = HealthTracker::new(2);
        tracker.record_failure();
        tracker.record_failure();
        assert_eq!(tracker.status(), ServiceStatus::Down);

        tracker.record_success();
        assert_eq!(tracker.status(), ServiceStatus::Up);
        assert_eq!(tracker.failure_count(), 0);

        // A fresh run of failures is needed to go down again
        assert_eq!(tracker.record_failure(), ServiceStatus::Up);
    }

    #[test]
    fn test_concurrent_failures_are_not_lost() {
        let tracker = Arc::new(HealthTracker::new(1000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        tracker.record_failure();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.failure_count(), 800);
        assert_eq!(tracker.status(), ServiceStatus::Up);
    }
}
