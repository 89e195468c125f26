// file: src/sources/download.rs
// description: http downloader streaming response bodies into scratch storage
// reference: https://docs.rs/reqwest

use crate::config::FetchConfig;
use crate::error::{PipelineError, Result};
use crate::sources::Downloader;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub struct HttpDownloader {
    client: Client,
    max_bytes: u64,
}

impl HttpDownloader {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.download_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PipelineError::Resource(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_bytes: config.max_download_bytes(),
        })
    }

    fn check_size(&self, url: &str, size: u64) -> Result<()> {
        if self.max_bytes > 0 && size > self.max_bytes {
            return Err(PipelineError::fetch(
                url,
                format!("body of {} bytes exceeds limit of {}", size, self.max_bytes),
            ));
        }
        Ok(())
    }

    /// Streams the body chunk by chunk so the size cap holds without a `Content-Length`.
    async fn write_body(&self, url: &str, mut response: Response, dest: &Path) -> Result<u64> {
        let write_err =
            |e: std::io::Error| PipelineError::fetch(url, format!("cannot write {}: {}", dest.display(), e));

        let mut file = File::create(dest).await.map_err(write_err)?;
        let mut written: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PipelineError::fetch(url, e))?
        {
            written += chunk.len() as u64;
            self.check_size(url, written)?;
            file.write_all(&chunk).await.map_err(write_err)?;
        }

        file.flush().await.map_err(write_err)?;
        Ok(written)
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(url, e))?;

        if !response.status().is_success() {
            return Err(PipelineError::fetch(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        if let Some(length) = response.content_length() {
            self.check_size(url, length)?;
        }

        match self.write_body(url, response, dest).await {
            Ok(written) => {
                debug!("Downloaded {} bytes from {} to {}", written, url, dest.display());
                Ok(written)
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(dest).await {
                    if rm.kind() != ErrorKind::NotFound {
                        warn!("Could not remove partial download {}: {}", dest.display(), rm);
                    }
                }
                Err(e)
            }
        }
    }
}
