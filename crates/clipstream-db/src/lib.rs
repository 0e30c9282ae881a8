//! Postgres implementations of the clipstream collaborator traits.
//!
//! Repositories hold a `PgPool` clone and use runtime-checked queries; rows
//! are mapped through `FromRow` structs and converted to domain models at the
//! boundary.

pub mod db;

pub use db::tag::PgTagIndex;
pub use db::video::PgVideoCatalog;

/// Apply the embedded migrations (idempotent).
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
