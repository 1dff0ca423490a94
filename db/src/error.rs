use miette::Diagnostic;
use thiserror::Error;

/// Error taxonomy for the storage layer. Connection acquisition, query
/// execution, and reference-data loading are kept distinct so callers in
/// the ingest crate can decide what's retryable (pool exhaustion) versus
/// fatal (a malformed upsert).
#[derive(Debug, Error, Diagnostic)]
pub enum DbError {
    #[error("failed to acquire a database connection from the pool")]
    PoolTimeout(#[from] diesel::r2d2::PoolError),

    #[error("database query failed")]
    Query(#[from] diesel::result::Error),

    #[error("error loading reference data from {path}")]
    ReferenceLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing reference data from {path}")]
    ReferenceParse {
        path: String,
        #[source]
        source: ReferenceParseError,
    },

    #[error("unknown team alias {alias:?} for source {source_name}")]
    UnknownTeamAlias { alias: String, source_name: &'static str },

    #[error("game {game_id} failed completeness check: {reason}")]
    IncompleteGame { game_id: String, reason: String },

    #[error("checkpoint {pipeline_name}/{work_key} is already {status} and force_refresh is disabled")]
    CheckpointAlreadyDone {
        pipeline_name: String,
        work_key: String,
        status: String,
    },

    #[error("expected a {table} row for key {key:?} but none was found")]
    MissingRow { table: &'static str, key: String },
}

#[derive(Debug, Error)]
pub enum ReferenceParseError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type DbResult<T> = Result<T, DbError>;
