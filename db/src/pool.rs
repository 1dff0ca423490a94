use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

pub type ConnectionPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the blocking connection pool used by loaders and the
/// completeness/validation queries. `max_size` is the per-pipeline worker
/// width from `IngestConfig`, so the pool never has more idle connections
/// than the ingest crate can possibly use concurrently.
pub fn get_pool(max_size: u32) -> Result<ConnectionPool, PoolError> {
    let manager = ConnectionManager::new(crate::url::postgres_url_from_environment());
    Pool::builder().max_size(max_size).build(manager)
}
