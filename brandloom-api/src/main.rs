//! # Brandloom API Server
//!
//! The HTTP backend for the Brandloom marketing dashboard: brand profiles,
//! channels, posts, campaigns, CRM contacts, vouchers, calendar, growth
//! experiments, and AI content assist, all as JSON CRUD over PostgreSQL.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p brandloom-api
//! ```

use brandloom_api::{
    ai::provider_from_config,
    app::{build_router, AppState},
    config::Config,
};
use brandloom_shared::db::{migrations::run_migrations, pool};
use brandloom_shared::mailer::{Mailer, MailerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandloom_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Brandloom API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    let ai = provider_from_config(config.ai.as_ref());

    let mailer = match &config.smtp {
        Some(smtp) => Some(Mailer::new(MailerConfig {
            host: smtp.host.clone(),
            port: smtp.port,
            username: smtp.username.clone(),
            password: smtp.password.clone(),
            from: smtp.from.clone(),
        })?),
        None => {
            tracing::info!("SMTP not configured; voucher email delivery is disabled");
            None
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, ai, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
