// file: src/sources/mod.rs
// description: external collaborator interfaces and their production implementations
// reference: trait seams for search, rendering, downloading and pdf parsing

pub mod browser;
pub mod download;
pub mod pdf_reader;
pub mod search;

#[cfg(test)]
pub mod testing;

pub use browser::ChromiumRenderer;
pub use download::HttpDownloader;
pub use pdf_reader::PdfExtractReader;
pub use search::GoogleSearchClient;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Produces the ordered list of candidate URLs for a query.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

/// Renders a page and returns its body text.
///
/// `start` and `shutdown` bracket one session; the pipeline always pairs them.
#[async_trait]
pub trait BrowserRenderer: Send + Sync {
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn render(&self, url: &str) -> Result<String>;

    async fn shutdown(&self) {}
}

/// Stores the body behind `url` at `dest`, returning the number of bytes written.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Blocking per-page text extraction. Called from the blocking pool.
pub trait PdfTextReader: Send + Sync {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// The set of collaborators one pipeline run is wired to.
/// `search` is only needed when links come from a query.
#[derive(Clone)]
pub struct Collaborators {
    pub search: Option<Arc<dyn SearchClient>>,
    pub renderer: Arc<dyn BrowserRenderer>,
    pub downloader: Arc<dyn Downloader>,
    pub pdf_reader: Arc<dyn PdfTextReader>,
}
