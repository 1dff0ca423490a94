//! Pipeline orchestrators (§4.10): three entry points sharing a common
//! bounded-concurrency worker abstraction and a `PipelineContext` of
//! long-lived collaborators (connection pool, reference tables, source
//! clients), constructed once in `main` and passed down by reference.

pub mod daily_pipeline;
pub mod game_pipeline;
pub mod season_pipeline;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use fetch::{BrefClient, GamebooksClient, HttpFetcher, NbaStatsClient};
use nba_db::aliases::{TeamAliasTable, VenueTable};
use nba_db::ConnectionPool;

use crate::config::IngestConfig;

/// Long-lived collaborators shared by every orchestrator and worker.
/// Constructed once at startup; cheap to clone (everything inside is an
/// `Arc` or a pool handle).
#[derive(Clone)]
pub struct PipelineContext {
    pub pool: ConnectionPool,
    pub aliases: Arc<TeamAliasTable>,
    pub venues: Arc<VenueTable>,
    pub nba_stats: Arc<NbaStatsClient>,
    pub bref: Arc<BrefClient>,
    pub gamebooks: Arc<GamebooksClient>,
    pub config: IngestConfig,
}

impl PipelineContext {
    pub fn new(config: IngestConfig, pool: ConnectionPool, fetcher: Arc<HttpFetcher>) -> nba_db::DbResult<Self> {
        let aliases = TeamAliasTable::load(std::path::Path::new(&config.team_aliases_path))?;
        let venues = VenueTable::load(std::path::Path::new(&config.venues_path))?;

        Ok(Self {
            pool,
            aliases: Arc::new(aliases),
            venues: Arc::new(venues),
            nba_stats: Arc::new(NbaStatsClient::new(fetcher.clone())),
            bref: Arc::new(BrefClient::new(fetcher.clone())),
            gamebooks: Arc::new(GamebooksClient::new(fetcher)),
            config,
        })
    }
}

/// Structured result every orchestrator returns, success or failure, per
/// §4.10/§7's "always returns a `PipelineResult`" contract.
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    pub success: bool,
    pub games_attempted: usize,
    pub games_succeeded: usize,
    pub games_failed: Vec<(String, String)>,
    pub table_counts: std::collections::HashMap<&'static str, usize>,
    pub duration: Duration,
    pub error: Option<String>,
}

impl PipelineResult {
    pub fn merge_table_counts(&mut self, counts: std::collections::HashMap<&'static str, usize>) {
        for (table, count) in counts {
            *self.table_counts.entry(table).or_insert(0) += count;
        }
    }
}
