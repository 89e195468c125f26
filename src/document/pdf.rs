// file: src/document/pdf.rs
// description: pdf download and page text extraction
// reference: blocking parser work moved off the async runtime

use crate::document::DocumentTextExtractor;
use crate::error::PipelineError;
use crate::models::{FailureReason, RawDocument, SourceRef, Track};
use crate::pipeline::ScratchDir;
use crate::sources::{Downloader, PdfTextReader};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct PdfTextExtractor<'a> {
    downloader: Arc<dyn Downloader>,
    reader: Arc<dyn PdfTextReader>,
    scratch: &'a ScratchDir,
}

impl<'a> PdfTextExtractor<'a> {
    pub fn new(
        downloader: Arc<dyn Downloader>,
        reader: Arc<dyn PdfTextReader>,
        scratch: &'a ScratchDir,
    ) -> Self {
        Self {
            downloader,
            reader,
            scratch,
        }
    }

    /// Pages are joined with newlines; a page without text contributes an empty string.
    pub async fn extract(&self, path: &Path, origin: &str) -> RawDocument {
        let source = SourceRef::File {
            path: path.to_path_buf(),
            origin: origin.to_string(),
        };

        let reader = Arc::clone(&self.reader);
        let owned_path = path.to_path_buf();
        let parsed = tokio::task::spawn_blocking(move || reader.read_pages(&owned_path)).await;

        match parsed {
            Ok(Ok(pages)) => {
                debug!("Extracted {} pages from {}", pages.len(), origin);
                RawDocument::fetched(source, pages.join("\n"))
            }
            Ok(Err(PipelineError::Extract { message, .. })) => {
                RawDocument::failed(source, FailureReason::extract(message))
            }
            Ok(Err(e)) => RawDocument::failed(source, FailureReason::extract(e.to_string())),
            Err(e) => RawDocument::failed(
                source,
                FailureReason::extract(format!("parser aborted: {}", e)),
            ),
        }
    }
}

#[async_trait]
impl DocumentTextExtractor for PdfTextExtractor<'_> {
    fn track(&self) -> Track {
        Track::Pdf
    }

    async fn fetch(&self, source: &SourceRef) -> RawDocument {
        match source {
            SourceRef::Url(url) => {
                let dest = self.scratch.allocate(url);
                match self.downloader.download(url, &dest).await {
                    Ok(bytes) => {
                        debug!("Downloaded {} bytes from {}", bytes, url);
                        self.extract(&dest, url).await
                    }
                    Err(e) => RawDocument::failed(source.clone(), FailureReason::from(&e)),
                }
            }
            SourceRef::File { path, origin } => self.extract(path, origin).await,
        }
    }
}
