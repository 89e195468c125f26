// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod cancel;
mod orchestrator;
mod progress;
mod scratch;
mod track;

pub use cancel::CancelFlag;
pub use orchestrator::{PipelineOrchestrator, RunSummary, TrackError, scan_file};
pub use progress::{ProgressBoard, TrackProgress};
pub use scratch::ScratchDir;
pub use track::TrackProcessor;
