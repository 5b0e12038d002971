/// Database utilities
///
/// This module provides the PostgreSQL connection pool and the embedded
/// migration runner.
///
/// # Modules
///
/// - [`pool`]: Connection pool creation with health check
/// - [`migrations`]: Embedded sqlx migrations

pub mod migrations;
pub mod pool;
