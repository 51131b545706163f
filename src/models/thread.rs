use std::sync::atomic::{AtomicI64, Ordering};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref THREAD_ID_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    pub message_count: u64,
}

/// Body of `GET /threads`.
#[derive(Debug, Default, Deserialize)]
pub struct ThreadListResponse {
    #[serde(default)]
    pub threads: Option<Vec<ThreadSummary>>,
}

/// Thread ids end up as a path segment of backend URLs, so only a safe
/// alphabet is accepted from the browser.
pub fn is_valid_thread_id(thread_id: &str) -> bool {
    THREAD_ID_PATTERN.is_match(thread_id)
}

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Issues `thread_{millis}` identifiers. Never hands out the same value twice,
/// even when called repeatedly within one millisecond.
pub struct ThreadIdGenerator {
    clock: Clock,
    last: AtomicI64,
}

impl ThreadIdGenerator {
    pub fn new() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp_millis())
    }

    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        ThreadIdGenerator {
            clock: Box::new(clock),
            last: AtomicI64::new(i64::MIN),
        }
    }

    pub fn next_id(&self) -> String {
        let now = (self.clock)();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if now > last { now } else { last + 1 };
            match self.last.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed) {
                Ok(_) => return format!("thread_{}", candidate),
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for ThreadIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn ids_are_timestamp_based() {
        let generator = ThreadIdGenerator::with_clock(|| 1_700_000_000_000);
        assert_eq!(generator.next_id(), "thread_1700000000000");
    }

    #[test]
    fn same_millisecond_still_yields_distinct_ids() {
        let generator = ThreadIdGenerator::with_clock(|| 42);
        let first = generator.next_id();
        let second = generator.next_id();
        assert_eq!(first, "thread_42");
        assert_eq!(second, "thread_43");
    }

    #[test]
    fn concurrent_callers_never_collide() {
        let generator = Arc::new(ThreadIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || (0..250).map(|_| generator.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate thread id issued");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn generated_ids_pass_validation() {
        let generator = ThreadIdGenerator::new();
        assert!(is_valid_thread_id(&generator.next_id()));
        assert!(!is_valid_thread_id("../secrets"));
        assert!(!is_valid_thread_id(""));
    }

    #[test]
    fn missing_threads_field_defaults_to_none() {
        let parsed: ThreadListResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.threads.is_none());
    }
}
