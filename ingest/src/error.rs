use miette::Diagnostic;
use thiserror::Error;

/// Fatal errors that abort a single game's ingestion. Transient and
/// data-quality problems never reach this type — they're swallowed at
/// the worker boundary and folded into a `PipelineResult`'s failure
/// count instead, per §7's propagation table.
#[derive(Debug, Error, Diagnostic)]
pub enum IngestFatalError {
    #[error(transparent)]
    Fetch(#[from] fetch::FetchError),

    #[error(transparent)]
    Db(#[from] nba_db::DbError),

    #[error("transform error: {0}")]
    Transform(String),

    #[error("missing required field {field} in {context}")]
    MissingField { field: &'static str, context: String },

    #[error("local date {local} and UTC-derived date {from_utc} differ by more than one day for {game_id}")]
    DateMismatch {
        game_id: String,
        local: String,
        from_utc: String,
    },
}

pub type IngestResult<T> = Result<T, IngestFatalError>;
