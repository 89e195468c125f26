// file: src/models/document.rs
// description: fetched document model with per-item status
// reference: internal data structures

use crate::error::PipelineError;
use crate::models::SourceRef;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Fetch,
    Extract,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub stage: FailureStage,
    pub message: String,
}

impl FailureReason {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self {
            stage: FailureStage::Fetch,
            message: message.into(),
        }
    }

    pub fn extract(message: impl Into<String>) -> Self {
        Self {
            stage: FailureStage::Extract,
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            FailureStage::Fetch => "fetch",
            FailureStage::Extract => "extract",
        };
        write!(f, "{}: {}", stage, self.message)
    }
}

impl From<&PipelineError> for FailureReason {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::Extract { message, .. } => FailureReason::extract(message.clone()),
            PipelineError::Fetch { message, .. } => FailureReason::fetch(message.clone()),
            other => FailureReason::fetch(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Fetched,
    FetchFailed(FailureReason),
}

#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: SourceRef,
    pub text: String,
    pub status: DocumentStatus,
}

impl RawDocument {
    pub fn fetched(source: SourceRef, text: String) -> Self {
        Self {
            source,
            text,
            status: DocumentStatus::Fetched,
        }
    }

    pub fn failed(source: SourceRef, reason: FailureReason) -> Self {
        Self {
            source,
            text: String::new(),
            status: DocumentStatus::FetchFailed(reason),
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self.status, DocumentStatus::Fetched)
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            DocumentStatus::Fetched => None,
            DocumentStatus::FetchFailed(reason) => Some(reason),
        }
    }
}
