// file: src/pipeline/orchestrator.rs
// description: coordinates search, both content tracks, merging and artifact output
// reference: orchestrates asynchronous harvesting workflow

use crate::config::{Config, ScanConfig};
use crate::document::{HtmlTextExtractor, PdfTextExtractor};
use crate::error::{PipelineError, Result};
use crate::exporter::{self, RunReport, TrackReport};
use crate::extractor::{ScanOutput, ScanStrategy};
use crate::models::{Indicator, Ioc, SourceRef, Track, TrackResult, classify_links};
use crate::pipeline::cancel::CancelFlag;
use crate::pipeline::progress::ProgressBoard;
use crate::pipeline::scratch::ScratchDir;
use crate::pipeline::track::TrackProcessor;
use crate::sources::Collaborators;
use crate::utils::Validator;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// A track that could not run at all, as opposed to one with failed items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackError {
    pub track: Track,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub links_total: usize,
    pub tracks: Vec<TrackResult>,
    pub indicators: Vec<Indicator>,
    pub iocs: Vec<Ioc>,
    pub track_errors: Vec<TrackError>,
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    pub fn cancelled(&self) -> bool {
        self.tracks.iter().any(|t| t.cancelled)
    }

    pub fn track(&self, track: Track) -> Option<&TrackResult> {
        self.tracks.iter().find(|t| t.track == track)
    }

    /// Artifacts are already on disk when this reports a failed track.
    pub fn check(&self) -> Result<()> {
        match self.track_errors.as_slice() {
            [] => Ok(()),
            [only] => Err(PipelineError::Track {
                track: only.track.to_string(),
                message: only.message.clone(),
            }),
            many => Err(PipelineError::Track {
                track: many
                    .iter()
                    .map(|e| e.track.as_str())
                    .collect::<Vec<_>>()
                    .join("+"),
                message: many
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }
}

pub struct PipelineOrchestrator {
    config: Config,
    collaborators: Collaborators,
    cancel: CancelFlag,
    progress: ProgressBoard,
}

impl PipelineOrchestrator {
    pub fn new(config: Config, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            collaborators,
            cancel: CancelFlag::new(),
            progress: ProgressBoard::hidden(),
        })
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBoard) -> Self {
        self.progress = progress;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Search, persist the link list, then harvest every link.
    pub async fn run(&self, query: &str) -> Result<RunSummary> {
        Validator::validate_query(query)?;
        Validator::validate_output_dir(&self.config.output.directory)?;

        let search = self.collaborators.search.as_ref().ok_or_else(|| {
            PipelineError::Config("no search client configured for a query run".to_string())
        })?;

        let links = search.search(query).await?;
        info!("Search returned {} links", links.len());

        let links_path = self.config.output.links_path();
        exporter::write_lines(&links_path, &links)?;
        info!("Links written to {}", links_path.display());

        let mut summary = self.run_links(links, Some(query.to_string())).await?;
        summary.outputs.insert(0, links_path);
        Ok(summary)
    }

    /// Harvest an already known link list.
    pub async fn run_links(&self, links: Vec<String>, query: Option<String>) -> Result<RunSummary> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        Validator::validate_output_dir(&self.config.output.directory)?;

        let valid: Vec<String> = links
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .filter(|l| match Validator::validate_url(l) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping link: {}", e);
                    false
                }
            })
            .collect();

        let classified = classify_links(&valid);
        let links_total = classified.total();
        info!(
            "Run {}: {} links ({} html, {} pdf)",
            run_id,
            links_total,
            classified.html.len(),
            classified.pdf.len()
        );

        let (html, pdf) = tokio::join!(
            self.run_html_track(classified.html),
            self.run_pdf_track(classified.pdf)
        );

        let mut tracks = Vec::new();
        let mut track_errors = Vec::new();
        for (track, outcome) in [(Track::Html, html), (Track::Pdf, pdf)] {
            match outcome {
                Ok(result) => tracks.push(result),
                Err(e) => {
                    error!("{} track could not run: {}", track, e);
                    track_errors.push(TrackError {
                        track,
                        message: e.to_string(),
                    });
                }
            }
        }

        let indicators = exporter::merge(&tracks);
        let iocs = exporter::merge_passthrough(&tracks);
        let outputs = self.write_artifacts(&tracks, &indicators, &iocs)?;

        let summary = RunSummary {
            run_id,
            links_total,
            tracks,
            indicators,
            iocs,
            track_errors,
            outputs,
        };

        let mut report = RunReport::new(run_id, query, started_at);
        report.links_total = summary.links_total;
        report.tracks = summary.tracks.iter().map(TrackReport::from).collect();
        report.track_errors = summary
            .track_errors
            .iter()
            .map(|e| format!("{}: {}", e.track, e.message))
            .collect();
        report.indicator_count = summary.indicators.len();
        report.outputs = summary.outputs.clone();
        report.finish();
        report.write(&self.config.output.report_path())?;

        self.log_final_stats(&summary);
        Ok(summary)
    }

    async fn run_html_track(&self, sources: Vec<SourceRef>) -> Result<TrackResult> {
        if sources.is_empty() {
            info!("No html sources, skipping browser launch");
            return Ok(TrackResult::new(Track::Html));
        }

        let renderer = Arc::clone(&self.collaborators.renderer);
        if let Err(e) = renderer.start().await {
            renderer.shutdown().await;
            return Err(e);
        }

        let extractor = HtmlTextExtractor::new(Arc::clone(&renderer), self.config.fetch.pacing_delay());
        let processor = TrackProcessor::new(
            &extractor,
            ScanStrategy::for_track(Track::Html).build(&self.config.scan),
        )
        .with_corpus(self.config.output.write_corpus)
        .with_cancel_flag(self.cancel.clone())
        .with_progress(self.progress.track(Track::Html, sources.len()));

        let result = processor.run(sources).await;
        renderer.shutdown().await;
        Ok(result)
    }

    async fn run_pdf_track(&self, sources: Vec<SourceRef>) -> Result<TrackResult> {
        if sources.is_empty() {
            info!("No pdf sources");
            return Ok(TrackResult::new(Track::Pdf));
        }

        let scratch = ScratchDir::create(self.config.fetch.scratch_root.as_deref())?;

        let result = {
            let extractor = PdfTextExtractor::new(
                Arc::clone(&self.collaborators.downloader),
                Arc::clone(&self.collaborators.pdf_reader),
                &scratch,
            );
            let processor = TrackProcessor::new(
                &extractor,
                ScanStrategy::for_track(Track::Pdf).build(&self.config.scan),
            )
            .with_concurrency(self.config.fetch.pdf_workers)
            .with_corpus(self.config.output.write_corpus)
            .with_cancel_flag(self.cancel.clone())
            .with_progress(self.progress.track(Track::Pdf, sources.len()));

            processor.run(sources).await
        };

        if let Err(e) = scratch.release() {
            warn!("Failed to remove scratch directory: {}", e);
        }
        Ok(result)
    }

    fn write_artifacts(
        &self,
        tracks: &[TrackResult],
        indicators: &[Indicator],
        iocs: &[Ioc],
    ) -> Result<Vec<PathBuf>> {
        let output = &self.config.output;
        let mut written = Vec::new();

        let ips_path = output.ips_path();
        exporter::write_lines(&ips_path, indicators.iter().map(Indicator::as_str))?;
        written.push(ips_path);

        let iocs_path = output.iocs_path();
        exporter::write_lines(&iocs_path, iocs.iter().map(|ioc| ioc.value.as_str()))?;
        written.push(iocs_path);

        if output.write_corpus {
            let corpus_of = |track: Track| {
                tracks
                    .iter()
                    .find(|t| t.track == track)
                    .map(|t| t.corpus.as_slice())
                    .unwrap_or_default()
            };

            let corpus_path = output.corpus_path();
            exporter::write_corpus(
                &corpus_path,
                corpus_of(Track::Html),
                corpus_of(Track::Pdf),
                output.corpus_format,
            )?;
            written.push(corpus_path);
        }

        written.push(output.report_path());
        Ok(written)
    }

    fn log_final_stats(&self, summary: &RunSummary) {
        info!("=== Harvest Summary ===");
        info!("Run: {}", summary.run_id);
        info!("Links: {}", summary.links_total);
        for track in &summary.tracks {
            info!(
                "{}: {} attempted, {} failed, {:.2}% success, {} IPs",
                track.track,
                track.documents_attempted,
                track.documents_failed,
                track.success_rate(),
                track.indicators.len()
            );
        }
        for e in &summary.track_errors {
            error!("{} track failed: {}", e.track, e.message);
        }
        info!("Unique IPs: {}", summary.indicators.len());
        info!("Other IOCs: {}", summary.iocs.len());
        info!("=======================");
    }
}

/// Scans a text file that is already on disk, such as a saved corpus.
pub fn scan_file(path: &Path, strategy: ScanStrategy, config: &ScanConfig) -> Result<ScanOutput> {
    Validator::validate_input_file(path)?;
    let text = fs::read_to_string(path).map_err(|e| PipelineError::file(path, e))?;

    let scanner = strategy.build(config);
    let output = scanner.scan_with_passthrough(&text);
    info!(
        "Scanned {} with the {} scanner: {} IPs, {} other IOCs",
        path.display(),
        scanner.name(),
        output.indicators.len(),
        output.passthrough.len()
    );
    Ok(output)
}
