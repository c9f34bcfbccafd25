//! HTTP client for downloading trade archives.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Settings for fetching daily archives from the public trade host.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Number of days fetched at once.
    pub concurrency: usize,
    /// Upper bound on a single archive request, body included.
    pub timeout: Duration,
    /// Retries after the first attempt before giving up on a day.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds. Doubles per retry.
    pub base_delay_ms: u64,
    /// Ceiling for the doubled delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Daily archives are tens of megabytes; a few at a time is plenty.
            concurrency: 4,
            timeout: Duration::from_secs(300),
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            user_agent: format!("tamagoyaki/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Failure to fetch an archive.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport failure or a non-retryable error status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host kept answering 5xx or 429 until retries ran out.
    #[error("Server error: {status}")]
    ServerError {
        /// Last status seen.
        status: u16,
    },
}

/// Pooled archive downloader with bounded retries.
///
/// A missing day is not an error: the host answers 404 for days before a
/// symbol was listed, and [`download`](Self::download) reports that as `None`.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Builds the underlying connection pool from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if reqwest rejects the configuration.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        // Archives are served as application/gzip bodies and decompressed by
        // the caller, so transparent content decoding stays off.
        let client = Client::builder()
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Shorthand for `DownloadClient::new(ClientConfig::default())`.
    ///
    /// # Errors
    ///
    /// Returns an error if reqwest rejects the configuration.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Settings this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the gzip body at `url`.
    ///
    /// Yields `Ok(None)` when the host has no archive for that day.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ServerError`] once 5xx/429 answers exhaust the
    /// retries, or [`DownloadError::Http`] for other statuses and for
    /// transport failures that cannot be retried.
    pub async fn download(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        let mut retries = 0;

        loop {
            let err = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        tracing::debug!(url, "archive not found");
                        return Ok(None);
                    }
                    if !is_retryable_status(status) {
                        response.error_for_status_ref()?;
                        return Ok(Some(response.bytes().await?));
                    }
                    if retries >= self.config.max_retries {
                        return Err(DownloadError::ServerError {
                            status: status.as_u16(),
                        });
                    }
                    format!("status {}", status.as_u16())
                }
                Err(e) if is_retryable_error(&e) && retries < self.config.max_retries => {
                    e.to_string()
                }
                Err(e) => return Err(e.into()),
            };

            retries += 1;
            let delay = self.backoff(retries);
            tracing::warn!(
                url,
                error = %err,
                attempt = retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retrying download"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Delay before retry number `retry` (1-based).
    fn backoff(&self, retry: u32) -> Duration {
        backoff_delay(self.config.base_delay_ms, self.config.max_delay_ms, retry)
    }
}

/// Doubles `base_ms` per retry up to `max_ms`, then shifts it by a
/// deterministic offset within ±25%. Never shorter than 100ms.
fn backoff_delay(base_ms: u64, max_ms: u64, retry: u32) -> Duration {
    let capped = base_ms.saturating_mul(1u64 << retry.min(10)).min(max_ms);

    let spread = capped / 4;
    let offset = if spread > 0 {
        let step = (u64::from(retry) * 17) % (spread * 2);
        step as i64 - spread as i64
    } else {
        0
    };

    Duration::from_millis((capped as i64 + offset).max(100) as u64)
}

/// 5xx and 429 answers are transient on the archive host.
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    !error.is_builder() && (error.is_timeout() || error.is_connect() || error.is_request())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.base_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 30_000);
        assert!(config.user_agent.starts_with("tamagoyaki/"));
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = DownloadClient::with_defaults().unwrap();
        assert_eq!(client.config().concurrency, 4);
    }

    #[test]
    fn test_backoff_doubles_within_jitter() {
        let client = DownloadClient::with_defaults().unwrap();

        let first = client.backoff(1).as_millis();
        assert!((750..=1250).contains(&first));

        let second = client.backoff(2).as_millis();
        assert!((1500..=2500).contains(&second));

        // Capped at 30s, plus at most a quarter of that.
        assert!(client.backoff(20).as_millis() <= 37_500);
    }

    #[test]
    fn test_backoff_floor() {
        assert_eq!(backoff_delay(1, 10, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(0, 0, 3), Duration::from_millis(100));
    }

    #[test]
    fn test_retryable_status() {
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::OK));
        assert!(!is_retryable_status(StatusCode::FORBIDDEN));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
    }
}
