// file: src/exporter/mod.rs
// description: output artifacts, merging and run reports
// reference: internal module structure

pub mod artifacts;
pub mod json;
pub mod merge;

pub use artifacts::{PDF_SENTINEL, read_lines, render_corpus, write_atomic, write_corpus, write_lines};
pub use json::{RunReport, TrackReport};
pub use merge::{dedup_file, dedup_lines, merge, merge_passthrough, merge_sets};
