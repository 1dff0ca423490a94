pub mod cache;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod http;
pub mod rate_limiter;
pub mod sources;

pub use cache::{CacheClass, ResponseCache};
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use config::FetchConfig;
pub use error::FetchError;
pub use http::HttpFetcher;
pub use rate_limiter::RateLimiter;
pub use sources::{BrefClient, GamebooksClient, NbaStatsClient, Source, SourceClient};
