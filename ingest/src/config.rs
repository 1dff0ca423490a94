use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub worker_concurrency: usize,
    pub batch_size: usize,
    pub inter_batch_pause_secs: u64,
    pub force_refresh: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_concurrency: 5,
            batch_size: 50,
            inter_batch_pause_secs: 2,
            force_refresh: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IngestConfig {
    pub db_pool_size: u32,
    pub bulk_batch_size: usize,
    pub freshness_window_hours: i64,
    pub game_pipeline: PipelineConfig,
    pub season_pipeline: PipelineConfig,
    pub daily_pipeline: PipelineConfig,
    pub team_aliases_path: String,
    pub venues_path: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            db_pool_size: 10,
            bulk_batch_size: 1000,
            freshness_window_hours: 48,
            game_pipeline: PipelineConfig::default(),
            season_pipeline: PipelineConfig::default(),
            daily_pipeline: PipelineConfig::default(),
            team_aliases_path: "reference/team_aliases.yaml".to_string(),
            venues_path: "reference/venues.csv".to_string(),
        }
    }
}

impl IngestConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("NBACORE.toml"))
            .merge(Env::prefixed("NBACORE_INGEST_"))
    }

    pub fn load() -> figment::Result<Self> {
        Self::figment().extract()
    }
}
