mod bref;
mod gamebooks;
mod nba_stats;

pub use bref::BrefClient;
pub use gamebooks::{GamebooksClient, GamebooksParseResult, RefereeAssignment};
pub use nba_stats::NbaStatsClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

/// The logical source tag used to key rate-limiter buckets, circuit
/// breakers, and cache-class selection. A closed enum rather than a
/// free string so a typo in a source name is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    NbaStats,
    Bref,
    Gamebooks,
    Default,
}

impl Source {
    pub fn display_name(self) -> &'static str {
        match self {
            Source::NbaStats => "nba_stats",
            Source::Bref => "bref",
            Source::Gamebooks => "gamebooks",
            Source::Default => "default",
        }
    }
}

/// Uniform facade over a vendor's data surface. Implementations may lack
/// symmetry (a PDF-scraping client only has refs/alternates); those
/// operations return `FetchError::Unsupported` rather than being absent
/// from the trait, so callers can feature-detect with a single match arm
/// instead of downcasting.
#[async_trait]
pub trait SourceClient: Send + Sync {
    fn source(&self) -> Source;

    async fn scoreboard(&self, _date: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("scoreboard"))
    }

    async fn boxscore(&self, _game_id: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("boxscore"))
    }

    async fn pbp(&self, _game_id: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("pbp"))
    }

    async fn lineups(&self, _game_id: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("lineups"))
    }

    async fn shots(&self, _game_id: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("shots"))
    }

    async fn injury_report(&self, _date: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("injury_report"))
    }

    async fn boxscore_advanced(&self, _game_id: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("boxscore_advanced"))
    }

    async fn boxscore_misc(&self, _game_id: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("boxscore_misc"))
    }

    async fn boxscore_usage(&self, _game_id: &str) -> Result<Value, FetchError> {
        Err(self.unsupported("boxscore_usage"))
    }

    fn unsupported(&self, operation: &'static str) -> FetchError {
        FetchError::Unsupported {
            source_display: self.source().display_name(),
            operation,
        }
    }
}
