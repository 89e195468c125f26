// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

//! Harvests IPv4 indicators of compromise from web search results.
//!
//! Links are split into an html track, rendered in a headless browser, and a
//! pdf track, downloaded and parsed. Each track scans its text with its own
//! [`IndicatorScanner`] and the results are merged into one sorted list.

pub mod config;
pub mod document;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod utils;

pub use config::{Config, CorpusFormat, FetchConfig, OutputConfig, ScanConfig, SearchConfig};
pub use document::{DocumentTextExtractor, HtmlTextExtractor, PdfTextExtractor};
pub use error::{PipelineError, Result};
pub use exporter::{RunReport, dedup_file, merge, merge_sets};
pub use extractor::{
    GeneralIocScanner, IndicatorScanner, IpOnlyScanner, ScanOutput, ScanStrategy, normalize,
};
pub use models::{
    DocumentStatus, FailureReason, Indicator, IndicatorSet, RawDocument, SourceRef,
    SyntacticForm, Track, TrackResult,
};
pub use pipeline::{CancelFlag, PipelineOrchestrator, RunSummary, TrackProcessor, scan_file};
pub use sources::{
    BrowserRenderer, ChromiumRenderer, Collaborators, Downloader, GoogleSearchClient,
    HttpDownloader, PdfExtractReader, PdfTextReader, SearchClient,
};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());

        let scanner = ScanStrategy::for_track(Track::Pdf).build(&config.scan);
        assert_eq!(scanner.name(), "ip-only");
        assert_eq!(normalize("8[.]8[.]8[.]8", SyntacticForm::Bracketed).as_str(), "8.8.8.8");
    }
}
