use crate::types::{FetchConfig, Result, SyncError};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub response_time_ms: u64,
}

/// Plain GET client for the job board. Errors surface to the caller as-is; a
/// pass never retries.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect)
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        let start_time = Instant::now();
        debug!("Fetching job board page: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("Job board responded {} for {}", status, url);
            return Err(http_status_error(status));
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_page_size_mb {
                return Err(SyncError::General(format!("Job board page too large: {}MB", size_mb)));
            }
        }

        let body = response.text().await?;
        let response_time_ms = start_time.elapsed().as_millis() as u64;
        info!("Fetched job board page: {} ({} bytes in {}ms)", url, body.len(), response_time_ms);

        Ok(FetchedPage {
            url: url.to_string(),
            status: status.as_u16(),
            body,
            response_time_ms,
        })
    }
}

fn http_status_error(status: StatusCode) -> SyncError {
    SyncError::General(format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    ))
}
