/// Database migration runner
///
/// Migrations are embedded at compile time from the `migrations/` directory
/// of this crate and applied with sqlx's migration system.
///
/// # Example
///
/// ```no_run
/// use brandloom_shared::db::pool::{create_pool, DatabaseConfig};
/// use brandloom_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Migrations run in order; a failed migration is rolled back and the
/// error is returned.
///
/// # Errors
///
/// Returns an error if:
/// - A migration fails to execute
/// - Database connection is lost during migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
