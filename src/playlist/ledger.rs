use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::playback::source_file_name;

/// Tracks sources that keep failing so selection can route around them
#[derive(Debug, Clone)]
pub struct FailureLedger {
    max_failures: u32,
    attempts: HashMap<String, u32>,
    failed: HashSet<String>,
}

impl FailureLedger {
    pub fn new(max_failures: u32) -> Self {
        Self {
            max_failures: max_failures.max(1),
            attempts: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Count a failure; returns true once the source is marked failed
    pub fn record_failure(&mut self, source: &str) -> bool {
        let count = self.attempts.entry(source.to_string()).or_insert(0);
        *count += 1;

        if *count >= self.max_failures && self.failed.insert(source.to_string()) {
            warn!(
                target: "dreamreel::video",
                "Marking {} as permanently failed after {} attempts",
                source_file_name(source),
                count
            );
        }
        self.failed.contains(source)
    }

    pub fn is_failed(&self, source: &str) -> bool {
        self.failed.contains(source)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_fails_after_threshold() {
        let mut ledger = FailureLedger::new(3);
        let source = "https://cdn.example.com/0004.mp4";

        assert!(!ledger.record_failure(source));
        assert!(!ledger.record_failure(source));
        assert!(ledger.record_failure(source));
        assert!(ledger.is_failed(source));

        assert_eq!(ledger.failed_count(), 1);
        assert!(!ledger.is_failed("https://cdn.example.com/0005.mp4"));
    }
}
