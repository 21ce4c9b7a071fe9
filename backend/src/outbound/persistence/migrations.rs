//! Embedded schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },

    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply every pending migration, returning the versions applied.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking thread pool.
pub async fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let database_url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply(&database_url))
        .await
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })??;
    info!(count = applied.len(), "migrations applied");
    Ok(applied)
}

fn apply(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connection {
            message: err.to_string(),
        })?;
    let versions = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(versions.iter().map(ToString::to_string).collect())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    const SCHEMA: &str =
        include_str!("../../../migrations/2024-05-01-000000_create_gym_schema/up.sql");

    #[rstest]
    #[case("name VARCHAR PRIMARY KEY CHECK (btrim(name) <> '')")]
    #[case("name VARCHAR NOT NULL CHECK (btrim(name) <> ''),")]
    fn schema_rejects_blank_names_the_domain_rejects(#[case] column: &str) {
        assert!(SCHEMA.contains(column), "missing column constraint: {column}");
    }
}
