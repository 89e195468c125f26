// file: src/document/mod.rs
// description: document text extraction for the html and pdf tracks
// reference: internal module structure

pub mod html;
pub mod pdf;

pub use html::{HtmlTextExtractor, Pacer};
pub use pdf::PdfTextExtractor;

use crate::models::{RawDocument, SourceRef, Track};
use async_trait::async_trait;

/// Turns one source into a [`RawDocument`]. Failures are carried in the document status.
#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    fn track(&self) -> Track;

    async fn fetch(&self, source: &SourceRef) -> RawDocument;
}
