// file: src/models/track.rs
// description: per-track processing summary consumed by the merger
// reference: internal data structures

use crate::models::{FailureReason, IndicatorSet, Ioc, Track};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub source: String,
    pub reason: FailureReason,
}

/// Text of one fetched document, kept only when corpus output is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusEntry {
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct TrackResult {
    pub track: Track,
    pub documents_attempted: usize,
    pub documents_failed: usize,
    pub indicators: IndicatorSet,
    /// Non-IP IOCs seen by the general scanner, refanged but otherwise untouched.
    pub passthrough_iocs: BTreeSet<Ioc>,
    pub failures: Vec<ItemFailure>,
    pub corpus: Vec<CorpusEntry>,
    pub cancelled: bool,
}

impl TrackResult {
    pub fn new(track: Track) -> Self {
        Self {
            track,
            documents_attempted: 0,
            documents_failed: 0,
            indicators: IndicatorSet::new(),
            passthrough_iocs: BTreeSet::new(),
            failures: Vec::new(),
            corpus: Vec::new(),
            cancelled: false,
        }
    }

    pub fn documents_succeeded(&self) -> usize {
        self.documents_attempted - self.documents_failed
    }

    pub fn record_failure(&mut self, source: String, reason: FailureReason) {
        self.documents_failed += 1;
        self.failures.push(ItemFailure { source, reason });
    }

    pub fn success_rate(&self) -> f64 {
        if self.documents_attempted == 0 {
            return 0.0;
        }
        (self.documents_succeeded() as f64 / self.documents_attempted as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_accounting() {
        let mut result = TrackResult::new(Track::Html);
        result.documents_attempted = 4;
        result.record_failure("https://a.example".to_string(), FailureReason::fetch("404"));

        assert_eq!(result.documents_failed, 1);
        assert_eq!(result.documents_succeeded(), 3);
        assert!((result.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_track_success_rate() {
        let result = TrackResult::new(Track::Pdf);
        assert_eq!(result.success_rate(), 0.0);
    }
}
