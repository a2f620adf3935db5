//! Process-wide generation usage accounting.
//!
//! ARCHITECTURAL RULE: the counter is an injected dependency, never a
//! module-level global. Every component that calls the generation backend
//! receives an `Arc<dyn UsageRecorder>` (in practice via `GenerationClient`).

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of the usage counter.
#[derive(Debug, Clone, Serialize)]
pub struct UsageStats {
    pub enabled: bool,
    pub total: u64,
    pub successes: u64,
    pub failures: u64,
    pub tokens: u64,
    pub last_call_time: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Records the outcome of every generation call in the process.
pub trait UsageRecorder: Send + Sync {
    fn record(&self, success: bool, tokens: u64, error: Option<&str>);
    fn stats(&self) -> UsageStats;
    /// Admin-only: zero the counters. The enabled flag is not reset.
    fn reset(&self);
    /// Whether the generation backend may be called at all.
    fn enabled(&self) -> bool;
}

#[derive(Debug, Default)]
struct Inner {
    total: u64,
    successes: u64,
    failures: u64,
    tokens: u64,
    last_call_time: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Mutex-backed [`UsageRecorder`] safe for concurrent simulations.
#[derive(Debug)]
pub struct UsageCounter {
    enabled: bool,
    inner: Mutex<Inner>,
}

impl UsageCounter {
    /// `enabled` is captured once at startup (from `GENERATION_ENABLED`).
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl UsageRecorder for UsageCounter {
    fn record(&self, success: bool, tokens: u64, error: Option<&str>) {
        let mut inner = self.inner.lock().expect("usage counter lock poisoned");
        inner.total += 1;
        if success {
            inner.successes += 1;
        } else {
            inner.failures += 1;
        }
        inner.tokens += tokens;
        inner.last_call_time = Some(Utc::now());
        if let Some(e) = error {
            inner.last_error = Some(e.to_string());
        }
    }

    fn stats(&self) -> UsageStats {
        let inner = self.inner.lock().expect("usage counter lock poisoned");
        UsageStats {
            enabled: self.enabled,
            total: inner.total,
            successes: inner.successes,
            failures: inner.failures,
            tokens: inner.tokens,
            last_call_time: inner.last_call_time,
            last_error: inner.last_error.clone(),
        }
    }

    fn reset(&self) {
        let mut inner = self.inner.lock().expect("usage counter lock poisoned");
        *inner = Inner::default();
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_success_and_failure() {
        let counter = UsageCounter::new(true);
        counter.record(true, 120, None);
        counter.record(false, 0, Some("quota exceeded"));

        let stats = counter.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.tokens, 120);
        assert!(stats.last_call_time.is_some());
        assert_eq!(stats.last_error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_reset_keeps_enabled_flag() {
        let counter = UsageCounter::new(false);
        counter.record(true, 10, None);
        counter.reset();

        let stats = counter.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.tokens, 0);
        assert!(stats.last_call_time.is_none());
        assert!(!stats.enabled);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let counter = Arc::new(UsageCounter::new(true));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        c.record(true, 1, None);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stats = counter.stats();
        assert_eq!(stats.total, 800);
        assert_eq!(stats.tokens, 800);
    }
}
