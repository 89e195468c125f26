// file: src/sources/browser.rs
// description: headless chromium renderer returning page body text
// reference: https://docs.rs/chromiumoxide

use crate::error::{PipelineError, Result};
use crate::sources::BrowserRenderer;
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// One headless browser per session, launched by `start` and torn down by `shutdown`.
pub struct ChromiumRenderer {
    navigation_timeout: Duration,
    session: Mutex<Option<Session>>,
}

impl ChromiumRenderer {
    pub fn new(navigation_timeout: Duration) -> Self {
        Self {
            navigation_timeout,
            session: Mutex::new(None),
        }
    }

    async fn read_body(page: &Page, url: &str) -> Result<String> {
        page.wait_for_navigation()
            .await
            .map_err(|e| PipelineError::fetch(url, e))?;

        let body = page
            .find_element("body")
            .await
            .map_err(|e| PipelineError::extract(url, format!("no body element: {}", e)))?;

        let text = body
            .inner_text()
            .await
            .map_err(|e| PipelineError::extract(url, e))?;

        Ok(text.unwrap_or_default())
    }
}

#[async_trait]
impl BrowserRenderer for ChromiumRenderer {
    async fn start(&self) -> Result<()> {
        let mut guard = self.session.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.navigation_timeout)
            .build()
            .map_err(|e| PipelineError::Resource(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PipelineError::Resource(format!("failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        info!("Browser session started");
        *guard = Some(Session { browser, handler });
        Ok(())
    }

    async fn render(&self, url: &str) -> Result<String> {
        let guard = self.session.lock().await;
        let session = guard
            .as_ref()
            .ok_or_else(|| PipelineError::fetch(url, "browser session not started"))?;

        let page = timeout(self.navigation_timeout, session.browser.new_page(url))
            .await
            .map_err(|_| PipelineError::fetch(url, "navigation timed out"))?
            .map_err(|e| PipelineError::fetch(url, e))?;

        let text = timeout(self.navigation_timeout, Self::read_body(&page, url))
            .await
            .map_err(|_| PipelineError::fetch(url, "page load timed out"));

        if let Err(e) = page.close().await {
            debug!("Failed to close page for {}: {}", url, e);
        }

        text?
    }

    async fn shutdown(&self) {
        let Some(mut session) = self.session.lock().await.take() else {
            return;
        };

        if let Err(e) = session.browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        if let Err(e) = session.browser.wait().await {
            warn!("Failed waiting for browser exit: {}", e);
        }
        session.handler.abort();
        info!("Browser session closed");
    }
}
