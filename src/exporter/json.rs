// file: src/exporter/json.rs
// description: json run report describing one pipeline run

use crate::error::Result;
use crate::exporter::artifacts::write_atomic;
use crate::models::{ItemFailure, Track, TrackResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    pub track: Track,
    pub documents_attempted: usize,
    pub documents_failed: usize,
    pub indicator_count: usize,
    pub passthrough_count: usize,
    pub cancelled: bool,
    pub failures: Vec<ItemFailure>,
}

impl From<&TrackResult> for TrackReport {
    fn from(result: &TrackResult) -> Self {
        Self {
            track: result.track,
            documents_attempted: result.documents_attempted,
            documents_failed: result.documents_failed,
            indicator_count: result.indicators.len(),
            passthrough_count: result.passthrough_iocs.len(),
            cancelled: result.cancelled,
            failures: result.failures.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub query: Option<String>,
    pub started_at: String,
    pub finished_at: String,
    pub links_total: usize,
    pub tracks: Vec<TrackReport>,
    pub track_errors: Vec<String>,
    pub indicator_count: usize,
    pub outputs: Vec<PathBuf>,
}

impl RunReport {
    pub fn new(run_id: Uuid, query: Option<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            query,
            started_at: started_at.to_rfc3339(),
            finished_at: started_at.to_rfc3339(),
            links_total: 0,
            tracks: Vec::new(),
            track_errors: Vec::new(),
            indicator_count: 0,
            outputs: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Utc::now().to_rfc3339();
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())?;
        info!("Run report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureReason;
    use tempfile::tempdir;

    #[test]
    fn test_track_report_from_result() {
        let mut result = TrackResult::new(Track::Pdf);
        result.documents_attempted = 3;
        result.record_failure("https://a.example/x.pdf".to_string(), FailureReason::extract("bad xref"));

        let report = TrackReport::from(&result);
        assert_eq!(report.documents_failed, 1);
        assert_eq!(report.failures[0].reason.message, "bad xref");
    }

    #[test]
    fn test_report_written_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut report = RunReport::new(Uuid::new_v4(), Some("apt".to_string()), Utc::now());
        report.tracks.push(TrackReport::from(&TrackResult::new(Track::Html)));
        report.indicator_count = 2;
        report.finish();
        report.write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["query"], "apt");
        assert_eq!(value["indicator_count"], 2);
        assert_eq!(value["tracks"][0]["track"], "html");
    }
}
