use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use std::path::PathBuf;

/// Builds a Postgres connection URL from `POSTGRES_*` environment
/// variables, the way the ingestion core keeps credentials out of
/// `NBACORE.toml` entirely.
pub fn postgres_url_from_environment() -> String {
    #[derive(Debug, PartialEq, Deserialize)]
    struct PostgresConfig {
        user: String,
        password: Option<String>,
        password_file: Option<PathBuf>,
        host: Option<String>,
        db: String,
    }

    let provider = figment::providers::Env::prefixed("POSTGRES_");
    let postgres_config: PostgresConfig = figment::Figment::from(provider)
        .extract()
        .expect("Postgres configuration environment variable(s) missing or invalid");

    let password = if let Some(password) = postgres_config.password {
        password
    } else if let Some(password_file) = postgres_config.password_file {
        std::fs::read_to_string(password_file).expect("failed to read postgres password file")
    } else {
        panic!("one of POSTGRES_PASSWORD or POSTGRES_PASSWORD_FILE must be provided");
    };

    // Postgres truncates a password at its first newline. A single
    // trailing newline (the common case for files written by `echo`) is
    // trimmed harmlessly; any other embedded newline is rejected so a
    // caller doesn't end up authenticating with a silently shortened
    // secret.
    let password = password.strip_suffix('\n').unwrap_or(&password);
    if password.contains('\n') {
        panic!("postgres password contains a non-terminal newline, refusing to truncate it silently");
    }

    let password = utf8_percent_encode(password, NON_ALPHANUMERIC);
    let host = postgres_config.host.as_deref().unwrap_or("db");

    format!(
        "postgres://{}:{}@{}/{}",
        postgres_config.user, password, host, postgres_config.db
    )
}
