use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a single source's token bucket: requests per minute,
/// with burst capacity defaulting to `floor(rate)` per §4.1.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: f64,
    pub burst_capacity: Option<f64>,
}

impl RateLimitConfig {
    pub fn capacity(&self) -> f64 {
        self.burst_capacity
            .unwrap_or_else(|| (self.requests_per_minute / 60.0).floor().max(1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimeoutConfig {
    pub total_secs: u64,
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            total_secs: 30,
            connect_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CircuitBreakerConfig {
    pub failures_before_open: u32,
    pub recovery_timeout_secs: u64,
    pub half_open_probes: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failures_before_open: 5,
            recovery_timeout_secs: 120,
            half_open_probes: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheConfig {
    pub directory: PathBuf,
    pub live_ttl_secs: u64,
    pub game_data_ttl_secs: u64,
    pub other_ttl_secs: u64,
    pub gamebooks_directory: PathBuf,
    pub use_shared_store: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./cache"),
            live_ttl_secs: 300,
            game_data_ttl_secs: 3600,
            other_ttl_secs: 1800,
            gamebooks_directory: PathBuf::from("./cache/gamebooks"),
            use_shared_store: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FetchConfig {
    pub nba_stats_rate_limit: RateLimitConfig,
    pub bref_rate_limit: RateLimitConfig,
    pub gamebooks_rate_limit: RateLimitConfig,
    pub default_rate_limit: RateLimitConfig,
    pub retry: RetryConfig,
    pub timeout: TimeoutConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub cache: CacheConfig,
    pub pool_max_idle_per_host: usize,
    pub pool_max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            nba_stats_rate_limit: RateLimitConfig {
                requests_per_minute: 60.0,
                burst_capacity: None,
            },
            bref_rate_limit: RateLimitConfig {
                requests_per_minute: 20.0,
                burst_capacity: None,
            },
            gamebooks_rate_limit: RateLimitConfig {
                requests_per_minute: 20.0,
                burst_capacity: None,
            },
            default_rate_limit: RateLimitConfig {
                requests_per_minute: 30.0,
                burst_capacity: None,
            },
            retry: RetryConfig::default(),
            timeout: TimeoutConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            cache: CacheConfig::default(),
            pool_max_concurrent: 20,
            pool_max_idle_per_host: 10,
        }
    }
}

impl FetchConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("NBACORE.toml"))
            .merge(Env::prefixed("NBACORE_FETCH_"))
    }

    pub fn load() -> figment::Result<Self> {
        Self::figment().extract()
    }
}
