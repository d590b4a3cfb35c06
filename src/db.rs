//! Database connection pool and migration management.

use sqlx::{Pool, Postgres};

/// Type alias for the PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Type alias for an open database transaction.
///
/// All write paths in the engines accept one of these; attempting a write
/// outside a transaction is a programming error and the repository layer's
/// signatures make it unrepresentable.
pub type DbTx<'a> = sqlx::Transaction<'a, Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// The pool is bounded: `max_connections` caps concurrent connections and
/// `min_connections` keeps warm connections for reuse. Pool exhaustion
/// surfaces to callers as a transient error.
///
/// # Errors
///
/// Returns an error if the connection string is invalid, the server is
/// unreachable, or authentication fails.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// The macro embeds the migration files at compile time; applied versions
/// are tracked in `_sqlx_migrations`, so each migration runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
