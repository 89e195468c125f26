// file: src/pipeline/track.rs
// description: drives one content track from sources to an indicator set
// reference: acquire, extract, scan and accumulate with per-item failure isolation

use crate::document::DocumentTextExtractor;
use crate::extractor::IndicatorScanner;
use crate::models::{CorpusEntry, DocumentStatus, RawDocument, SourceRef, Track, TrackResult};
use crate::pipeline::cancel::CancelFlag;
use crate::pipeline::progress::TrackProgress;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct TrackProcessor<'a, E: DocumentTextExtractor> {
    extractor: &'a E,
    scanner: Box<dyn IndicatorScanner>,
    concurrency: usize,
    keep_corpus: bool,
    cancel: CancelFlag,
    progress: TrackProgress,
}

impl<'a, E: DocumentTextExtractor> TrackProcessor<'a, E> {
    pub fn new(extractor: &'a E, scanner: Box<dyn IndicatorScanner>) -> Self {
        Self {
            extractor,
            scanner,
            concurrency: 1,
            keep_corpus: false,
            cancel: CancelFlag::new(),
            progress: TrackProgress::hidden(),
        }
    }

    /// Items fetched at once. Results are still consumed in input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_corpus(mut self, keep_corpus: bool) -> Self {
        self.keep_corpus = keep_corpus;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: TrackProgress) -> Self {
        self.progress = progress;
        self
    }

    pub fn track(&self) -> Track {
        self.extractor.track()
    }

    pub async fn run(&self, sources: Vec<SourceRef>) -> TrackResult {
        let track = self.track();
        let total = sources.len();
        let started = Instant::now();
        let mut result = TrackResult::new(track);

        info!(
            "Processing {} {} sources with {} worker(s) using the {} scanner",
            total,
            track,
            self.concurrency,
            self.scanner.name()
        );

        let cancel = self.cancel.clone();
        let mut documents = stream::iter(sources)
            .take_while(move |_| futures::future::ready(!cancel.is_cancelled()))
            .map(|source| async move { self.extractor.fetch(&source).await })
            .buffered(self.concurrency);

        while let Some(document) = documents.next().await {
            self.absorb(&mut result, document);
        }

        if result.documents_attempted < total {
            result.cancelled = true;
            warn!(
                "{} track cancelled after {}/{} sources",
                track, result.documents_attempted, total
            );
        }

        self.progress.finish();
        info!(
            "{} track finished in {:.2}s: {} attempted, {} failed, {} unique IPs",
            track,
            started.elapsed().as_secs_f64(),
            result.documents_attempted,
            result.documents_failed,
            result.indicators.len()
        );

        result
    }

    fn absorb(&self, result: &mut TrackResult, document: RawDocument) {
        result.documents_attempted += 1;

        let RawDocument {
            source,
            text,
            status,
        } = document;

        match status {
            DocumentStatus::Fetched => {
                let output = self.scanner.scan_with_passthrough(&text);
                debug!(
                    "Found {} IPs and {} other IOCs in {}",
                    output.indicators.len(),
                    output.passthrough.len(),
                    source
                );

                result.indicators.extend(output.indicators);
                result.passthrough_iocs.extend(output.passthrough);

                if self.keep_corpus {
                    result.corpus.push(CorpusEntry {
                        source: source.origin().to_string(),
                        text,
                    });
                }

                self.progress.inc_succeeded(result.indicators.len());
            }
            DocumentStatus::FetchFailed(reason) => {
                warn!("Failed to process {}: {}", source, reason);
                result.record_failure(source.origin().to_string(), reason);
                self.progress.inc_failed();
            }
        }
    }
}
