use std::time::Duration;

use hashbrown::HashMap;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use crate::cache::{CacheClass, ResponseCache};
use crate::circuit_breaker::CircuitBreaker;
use crate::config::{FetchConfig, RetryConfig};
use crate::error::FetchError;
use crate::rate_limiter::RateLimiter;
use crate::sources::Source;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

/// Computes the exponential backoff delay for a given (1-indexed) retry
/// attempt: `base * 2^(attempt - 1)`, capped at `max`. A free function so
/// the policy is unit-testable without touching the network.
pub fn backoff_delay(attempt: u32, retry: &RetryConfig) -> Duration {
    let exp = attempt.saturating_sub(1).min(20);
    let millis = retry.base_delay_ms.saturating_mul(1u64 << exp);
    Duration::from_millis(millis.min(retry.max_delay_ms))
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/html, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

/// The single gate in front of every outbound HTTP call. Wraps the raw
/// `reqwest::Client` with rate limiting, circuit breaking, default
/// headers, timeouts, and retry-with-backoff.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
    rate_limiter: RateLimiter,
    breakers: HashMap<Source, CircuitBreaker>,
    cache: ResponseCache,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .default_headers(default_headers())
            .timeout(Duration::from_secs(config.timeout.total_secs))
            .connect_timeout(Duration::from_secs(config.timeout.connect_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .expect("building the reqwest client cannot fail with this configuration");

        let mut rate_configs = HashMap::new();
        rate_configs.insert(Source::NbaStats, config.nba_stats_rate_limit.clone());
        rate_configs.insert(Source::Bref, config.bref_rate_limit.clone());
        rate_configs.insert(Source::Gamebooks, config.gamebooks_rate_limit.clone());
        rate_configs.insert(Source::Default, config.default_rate_limit.clone());

        let mut breakers = HashMap::new();
        breakers.insert(
            Source::NbaStats,
            CircuitBreaker::new("nba_stats", config.circuit_breaker.clone()),
        );
        breakers.insert(
            Source::Bref,
            CircuitBreaker::new("bref", config.circuit_breaker.clone()),
        );
        breakers.insert(
            Source::Gamebooks,
            CircuitBreaker::new("gamebooks", config.circuit_breaker.clone()),
        );

        let cache = ResponseCache::new(config.cache.clone());

        Self {
            client,
            rate_limiter: RateLimiter::new(rate_configs),
            breakers,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn breaker_for(&self, source: Source) -> Option<&CircuitBreaker> {
        self.breakers.get(&source)
    }

    /// GETs `url` with `params`, decoding the body as JSON. Performs the
    /// full retry/backoff policy in §4.2.
    pub async fn get_json(
        &self,
        source: Source,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, FetchError> {
        self.with_retry(source, url, || async {
            let response = self
                .client
                .get(url)
                .query(params)
                .send()
                .await
                .map_err(|source_err| FetchError::Network {
                    url: url.to_string(),
                    source: source_err,
                })?;

            let response = check_status(response, source.display_name(), url)?;

            let bytes = response
                .bytes()
                .await
                .map_err(|source_err| FetchError::Decode {
                    url: url.to_string(),
                    source: source_err,
                })?;

            serde_json::from_slice(&bytes).map_err(|source_err| FetchError::Json {
                url: url.to_string(),
                source: source_err,
            })
        })
        .await
    }

    /// GETs `url`, returning the raw body as text rather than attempting
    /// JSON decode. Used by vendors (Bref) whose pages are HTML, not a
    /// JSON API; the caller hands the text to an extractor.
    pub async fn get_text(&self, source: Source, url: &str) -> Result<String, FetchError> {
        self.with_retry(source, url, || async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|source_err| FetchError::Network {
                    url: url.to_string(),
                    source: source_err,
                })?;
            let response = check_status(response, source.display_name(), url)?;
            response.text().await.map_err(|source_err| FetchError::Decode {
                url: url.to_string(),
                source: source_err,
            })
        })
        .await
    }

    pub async fn post_json(
        &self,
        source: Source,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        self.with_retry(source, url, || async {
            let response = self
                .client
                .post(url)
                .json(body)
                .send()
                .await
                .map_err(|source_err| FetchError::Network {
                    url: url.to_string(),
                    source: source_err,
                })?;

            let response = check_status(response, source.display_name(), url)?;

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|source_err| FetchError::Decode {
                    url: url.to_string(),
                    source: source_err,
                })
        })
        .await
    }

    /// Streams a response body to `dest`, for large downloads (gamebook
    /// PDFs) that shouldn't be buffered fully in memory.
    pub async fn download(
        &self,
        source: Source,
        url: &str,
        dest: &std::path::Path,
    ) -> Result<(), FetchError> {
        self.with_retry(source, url, || async {
            use futures::StreamExt;
            use tokio::io::AsyncWriteExt;

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|source_err| FetchError::Network {
                    url: url.to_string(),
                    source: source_err,
                })?;
            let response = check_status(response, source.display_name(), url)?;

            let mut file = tokio::fs::File::create(dest).await.map_err(|source_err| {
                FetchError::PdfRead {
                    path: dest.display().to_string(),
                    source: source_err,
                }
            })?;

            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|source_err| FetchError::Network {
                    url: url.to_string(),
                    source: source_err,
                })?;
                file.write_all(&chunk).await.map_err(|source_err| FetchError::PdfRead {
                    path: dest.display().to_string(),
                    source: source_err,
                })?;
            }

            Ok(())
        })
        .await
    }

    async fn with_retry<T, F, Fut>(&self, source: Source, url: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, FetchError>>,
    {
        if let Some(breaker) = self.breaker_for(source) {
            if !breaker.allow_call() {
                return Err(FetchError::CircuitOpen(source));
            }
        }

        let mut last_err = None;
        for attempt in 1..=self.config.retry.max_attempts {
            self.rate_limiter.acquire(source, 1).await;

            match op().await {
                Ok(value) => {
                    if let Some(breaker) = self.breaker_for(source) {
                        breaker.record_success();
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if !err.is_retryable() {
                        if let Some(breaker) = self.breaker_for(source) {
                            breaker.record_failure();
                        }
                        return Err(err);
                    }
                    warn!("attempt {attempt} failed for {url}: {err}");
                    last_err = Some(err);
                    if attempt < self.config.retry.max_attempts {
                        let delay = backoff_delay(attempt, &self.config.retry);
                        debug!("retrying {url} in {delay:?}");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        if let Some(breaker) = self.breaker_for(source) {
            breaker.record_failure();
        }

        Err(last_err.unwrap_or(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.config.retry.max_attempts,
        }))
    }
}

fn check_status(
    response: reqwest::Response,
    source_name: &'static str,
    url: &str,
) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::Status {
            source_name,
            url: url.to_string(),
            status: status.as_u16(),
            source: response
                .error_for_status()
                .expect_err("status was checked to be an error above"),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_cap() {
        let retry = RetryConfig {
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
        };
        assert_eq!(backoff_delay(1, &retry), Duration::from_millis(1_000));
        assert_eq!(backoff_delay(2, &retry), Duration::from_millis(2_000));
        assert_eq!(backoff_delay(3, &retry), Duration::from_millis(4_000));
        assert_eq!(backoff_delay(10, &retry), Duration::from_millis(60_000));
    }
}
