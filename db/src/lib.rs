pub mod aliases;
pub mod checkpoint;
pub mod coerce;
pub mod completeness;
pub mod enums;
pub mod error;
pub mod loaders;
pub mod models;
pub mod pool;
pub mod schema;
pub mod url;
pub mod validation;

pub use error::{DbError, DbResult};
pub use pool::{ConnectionPool, get_pool};
pub use url::postgres_url_from_environment;

pub use diesel::{Connection, PgConnection};
