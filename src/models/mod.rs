// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod indicator;
pub mod ioc;
pub mod source;
pub mod track;

pub use document::{DocumentStatus, FailureReason, FailureStage, RawDocument};
pub use indicator::{Indicator, IndicatorCandidate, IndicatorSet, SyntacticForm};
pub use ioc::{Ioc, IocType};
pub use source::{ClassifiedLinks, SourceRef, Track, classify_link, classify_links};
pub use track::{CorpusEntry, ItemFailure, TrackResult};
