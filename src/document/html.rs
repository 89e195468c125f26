// file: src/document/html.rs
// description: rendered page text extraction with fetch pacing
// reference: per-site throttling ahead of browser navigation

use crate::document::DocumentTextExtractor;
use crate::models::{FailureReason, RawDocument, SourceRef, Track};
use crate::sources::BrowserRenderer;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum gap between the end of one fetch and the start of the next.
///
/// Holding a [`PacerSlot`] serializes callers, so sharing one pacer across concurrent
/// fetchers still keeps the gap.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last_finished: Mutex<Option<Instant>>,
}

pub struct PacerSlot<'a> {
    guard: MutexGuard<'a, Option<Instant>>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_finished: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn slot(&self) -> PacerSlot<'_> {
        let guard = self.last_finished.lock().await;

        if let Some(last) = *guard {
            let ready_at = last + self.delay;
            if ready_at > Instant::now() {
                debug!("Pacing next fetch by {:?}", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }

        PacerSlot { guard }
    }
}

impl Drop for PacerSlot<'_> {
    fn drop(&mut self) {
        *self.guard = Some(Instant::now());
    }
}

pub struct HtmlTextExtractor {
    renderer: Arc<dyn BrowserRenderer>,
    pacer: Pacer,
}

impl HtmlTextExtractor {
    pub fn new(renderer: Arc<dyn BrowserRenderer>, pacing_delay: Duration) -> Self {
        Self {
            renderer,
            pacer: Pacer::new(pacing_delay),
        }
    }

    pub fn pacing_delay(&self) -> Duration {
        self.pacer.delay()
    }
}

#[async_trait]
impl DocumentTextExtractor for HtmlTextExtractor {
    fn track(&self) -> Track {
        Track::Html
    }

    async fn fetch(&self, source: &SourceRef) -> RawDocument {
        let url = match source {
            SourceRef::Url(url) => url,
            SourceRef::File { .. } => {
                return RawDocument::failed(
                    source.clone(),
                    FailureReason::fetch("html track expects a URL source"),
                );
            }
        };

        let _slot = self.pacer.slot().await;

        match self.renderer.render(url).await {
            Ok(text) => {
                debug!("Rendered {} ({} chars)", url, text.len());
                RawDocument::fetched(source.clone(), text)
            }
            Err(e) => RawDocument::failed(source.clone(), FailureReason::from(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureStage;
    use crate::sources::testing::StaticRenderer;

    #[tokio::test]
    async fn test_fetch_success() {
        let renderer = Arc::new(StaticRenderer::new().page("https://a.example", "hello 1.2.3.4"));
        let extractor = HtmlTextExtractor::new(renderer, Duration::ZERO);

        let doc = extractor.fetch(&SourceRef::url("https://a.example")).await;
        assert!(doc.is_fetched());
        assert_eq!(doc.text, "hello 1.2.3.4");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_status_not_error() {
        let renderer = Arc::new(StaticRenderer::new().failing("https://a.example", "timeout"));
        let extractor = HtmlTextExtractor::new(renderer, Duration::ZERO);

        let doc = extractor.fetch(&SourceRef::url("https://a.example")).await;
        let reason = doc.failure().unwrap();
        assert_eq!(reason.stage, FailureStage::Fetch);
        assert_eq!(reason.message, "timeout");
    }

    #[tokio::test]
    async fn test_pacing_between_consecutive_fetches() {
        let delay = Duration::from_millis(60);
        let renderer = Arc::new(
            StaticRenderer::new()
                .page("https://a.example/1", "one")
                .page("https://a.example/2", "two")
                .page("https://a.example/3", "three"),
        );
        let extractor = HtmlTextExtractor::new(renderer.clone(), delay);

        let started = std::time::Instant::now();
        for n in 1..=3 {
            let url = format!("https://a.example/{}", n);
            extractor.fetch(&SourceRef::url(url)).await;
        }

        assert!(started.elapsed() >= delay * 2);

        let calls = renderer.call_times();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= delay);
        }
    }

    #[tokio::test]
    async fn test_first_fetch_is_not_delayed() {
        let renderer = Arc::new(StaticRenderer::new().page("https://a.example", "x"));
        let extractor = HtmlTextExtractor::new(renderer, Duration::from_secs(30));

        let started = std::time::Instant::now();
        extractor.fetch(&SourceRef::url("https://a.example")).await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
