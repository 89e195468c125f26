// file: src/sources/testing.rs
// description: in-memory collaborators for pipeline tests
// reference: test doubles behind the collaborator traits

use crate::error::{PipelineError, Result};
use crate::sources::{BrowserRenderer, Collaborators, Downloader, PdfTextReader, SearchClient};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub struct StaticSearch {
    pub links: Vec<String>,
}

#[async_trait]
impl SearchClient for StaticSearch {
    async fn search(&self, _query: &str) -> Result<Vec<String>> {
        Ok(self.links.clone())
    }
}

/// Serves canned bodies; URLs mapped to `Err` fail to render.
#[derive(Default)]
pub struct StaticRenderer {
    pages: HashMap<String, std::result::Result<String, String>>,
    pub fail_start: bool,
    pub started: AtomicBool,
    pub shut_down: AtomicBool,
    pub calls: Mutex<Vec<(String, Instant)>>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, reason: &str) -> Self {
        self.pages.insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }
}

#[async_trait]
impl BrowserRenderer for StaticRenderer {
    async fn start(&self) -> Result<()> {
        if self.fail_start {
            return Err(PipelineError::Resource("browser unavailable".to_string()));
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn render(&self, url: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));

        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => Err(PipelineError::fetch(url, reason)),
            None => Err(PipelineError::fetch(url, "navigation failed")),
        }
    }

    async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }
}

/// Writes canned bytes; unknown URLs fail like a 404.
#[derive(Default)]
pub struct StaticDownloader {
    files: HashMap<String, Vec<u8>>,
    pub downloads: AtomicUsize,
}

impl StaticDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, url: &str, contents: &str) -> Self {
        self.files.insert(url.to_string(), contents.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl Downloader for StaticDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let bytes = self
            .files
            .get(url)
            .ok_or_else(|| PipelineError::fetch(url, "HTTP 404 Not Found"))?;

        tokio::fs::write(dest, bytes)
            .await
            .map_err(|e| PipelineError::fetch(url, e))?;
        Ok(bytes.len() as u64)
    }
}

/// Treats files as UTF-8 with form feeds between pages.
/// Content starting with `CORRUPT` is a parse failure, `PANIC` panics the reader.
#[derive(Default)]
pub struct TextPdfReader;

impl PdfTextReader for TextPdfReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::file(path, e))?;

        if content.starts_with("CORRUPT") {
            return Err(PipelineError::extract(
                path.display().to_string(),
                "invalid cross-reference table",
            ));
        }
        if content.starts_with("PANIC") {
            panic!("reader blew up on {}", path.display());
        }

        Ok(content.split('\x0c').map(str::to_string).collect())
    }
}

pub fn collaborators(
    renderer: Arc<StaticRenderer>,
    downloader: Arc<StaticDownloader>,
) -> Collaborators {
    Collaborators {
        search: None,
        renderer,
        downloader,
        pdf_reader: Arc::new(TextPdfReader),
    }
}
