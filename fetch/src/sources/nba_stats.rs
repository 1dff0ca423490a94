use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

use crate::cache::CacheClass;
use crate::error::FetchError;
use crate::http::HttpFetcher;
use crate::sources::{Source, SourceClient};

const BASE_URL: &str = "https://stats.nba.com/stats";

/// Client for the NBA's own stats API. Implements the full uniform
/// facade: scoreboard, boxscore, play-by-play, lineups, and shot charts
/// are all exposed by this vendor.
pub struct NbaStatsClient {
    fetcher: Arc<HttpFetcher>,
}

impl NbaStatsClient {
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        Self { fetcher }
    }

    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        class: CacheClass,
    ) -> Result<Value, FetchError> {
        let url = format!("{BASE_URL}/{endpoint}");
        let key = crate::cache::ResponseCache::key(BASE_URL, endpoint, params);

        if let Some(cached) = self.fetcher.cache().get(&key, class) {
            debug!("cache hit for {endpoint} ({params:?})");
            return Ok(cached);
        }

        let value = self
            .fetcher
            .get_json(Source::NbaStats, &url, params)
            .await?;
        self.fetcher.cache().put(&key, &value);
        Ok(value)
    }
}

#[async_trait]
impl SourceClient for NbaStatsClient {
    fn source(&self) -> Source {
        Source::NbaStats
    }

    async fn scoreboard(&self, date: &str) -> Result<Value, FetchError> {
        self.fetch(
            "scoreboardv2",
            &[("GameDate", date), ("LeagueID", "00"), ("DayOffset", "0")],
            CacheClass::Live,
        )
        .await
    }

    async fn boxscore(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch(
            "boxscoretraditionalv2",
            &[("GameID", game_id), ("StartPeriod", "0"), ("EndPeriod", "10")],
            CacheClass::GameData,
        )
        .await
    }

    async fn pbp(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch(
            "playbyplayv2",
            &[("GameID", game_id), ("StartPeriod", "0"), ("EndPeriod", "10")],
            CacheClass::GameData,
        )
        .await
    }

    async fn lineups(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch("boxscoresummaryv2", &[("GameID", game_id)], CacheClass::GameData)
            .await
    }

    async fn shots(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch(
            "shotchartdetail",
            &[("GameID", game_id), ("ContextMeasure", "FGA")],
            CacheClass::GameData,
        )
        .await
    }

    async fn injury_report(&self, date: &str) -> Result<Value, FetchError> {
        self.fetch("injuryreport", &[("GameDate", date), ("LeagueID", "00")], CacheClass::Live)
            .await
    }

    async fn boxscore_advanced(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch(
            "boxscoreadvancedv2",
            &[("GameID", game_id), ("StartPeriod", "0"), ("EndPeriod", "10")],
            CacheClass::GameData,
        )
        .await
    }

    async fn boxscore_misc(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch(
            "boxscoremiscv2",
            &[("GameID", game_id), ("StartPeriod", "0"), ("EndPeriod", "10")],
            CacheClass::GameData,
        )
        .await
    }

    async fn boxscore_usage(&self, game_id: &str) -> Result<Value, FetchError> {
        self.fetch(
            "boxscoreusagev2",
            &[("GameID", game_id), ("StartPeriod", "0"), ("EndPeriod", "10")],
            CacheClass::GameData,
        )
        .await
    }
}
