use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

use crate::cache::CacheClass;
use crate::error::FetchError;
use crate::http::HttpFetcher;
use crate::sources::{Source, SourceClient};

const BASE_URL: &str = "https://www.basketball-reference.com";

/// Client for Basketball-Reference. The vendor exposes game summaries
/// via rendered HTML pages rather than a JSON API; the specific HTML
/// scraping heuristics are a replaceable strategy behind this facade
/// (see the extractor layer) — this client's job is only to fetch and
/// cache the raw page bodies. Bref has no play-by-play, lineup, or shot
/// chart surface comparable to the other vendors, so those operations
/// fall through to the trait's default `Unsupported` response.
pub struct BrefClient {
    fetcher: Arc<HttpFetcher>,
}

impl BrefClient {
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        Self { fetcher }
    }

    async fn fetch_page(&self, path: &str, class: CacheClass) -> Result<Value, FetchError> {
        let url = format!("{BASE_URL}{path}");
        let key = crate::cache::ResponseCache::key(BASE_URL, path, &[]);

        if let Some(cached) = self.fetcher.cache().get(&key, class) {
            debug!("cache hit for {path}");
            return Ok(cached);
        }

        // Bref doesn't speak JSON; the raw HTML body is wrapped so it
        // flows through the same cache envelope as every other vendor,
        // and is handed to an HTML extractor as opaque scrape input.
        let text = self.fetcher.get_text(Source::Bref, &url).await?;
        let value = Value::String(text);
        self.fetcher.cache().put(&key, &value);
        Ok(value)
    }
}

#[async_trait]
impl SourceClient for BrefClient {
    fn source(&self) -> Source {
        Source::Bref
    }

    async fn scoreboard(&self, date: &str) -> Result<Value, FetchError> {
        let path = format!("/boxscores/?month={}&day={}&year={}", &date[5..7], &date[8..10], &date[0..4]);
        self.fetch_page(&path, CacheClass::Live).await
    }

    async fn boxscore(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch_page(&format!("/boxscores/{game_id}.html"), CacheClass::GameData)
            .await
    }
}
