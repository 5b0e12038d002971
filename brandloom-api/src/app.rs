/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use brandloom_api::{app::AppState, config::Config};
/// use brandloom_api::ai::provider_from_config;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let provider = provider_from_config(config.ai.as_ref());
/// let state = AppState::new(pool, config, provider, None);
/// let app = brandloom_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{ai::CompletionProvider, config::Config, error::ApiError};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use brandloom_shared::auth::{jwt, middleware::AuthContext};
use brandloom_shared::mailer::Mailer;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every
/// member is a cheap clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Completion provider (HTTP or mock, selected at startup)
    pub ai: Arc<dyn CompletionProvider>,

    /// SMTP mailer; None when SMTP is not configured
    pub mailer: Option<Mailer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        db: PgPool,
        config: Config,
        ai: Arc<dyn CompletionProvider>,
        mailer: Option<Mailer>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            ai,
            mailer,
        }
    }

    /// Gets the session token secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                      # Health check (public)
/// └── /api/
///     ├── /auth/                   # register, login, refresh, oauth (public)
///     │   └── /select-tier         # (authenticated)
///     ├── /stripe/webhook          # signature-verified (public)
///     ├── /stripe/checkout         # (authenticated)
///     ├── /brand                   # GET, POST (upsert)
///     ├── /channels                # GET, POST, PUT, DELETE
///     ├── /posts                   # GET, POST, PUT, DELETE
///     ├── /campaigns               # GET, POST, PUT, DELETE
///     ├── /contacts                # GET, POST, PUT, DELETE
///     │   └── /activities          # GET, POST
///     ├── /vouchers                # GET, POST, PUT, DELETE (soft)
///     │   ├── /send                # POST (email)
///     │   └── /redeem              # POST
///     ├── /calendar                # GET (month merge), POST, PUT, DELETE
///     ├── /growth                  # GET, POST, PUT, DELETE
///     ├── /settings                # GET, POST (upsert)
///     ├── /admin/users             # GET, PUT (admin gate)
///     └── /ai, /ai/edit            # POST
/// ```
///
/// PUT and DELETE take the target `id` in the request body, matching the
/// dashboard client's convention.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session authentication (per-group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, except tier selection which needs a session)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/oauth", post(routes::auth::oauth))
        .route(
            "/select-tier",
            post(routes::auth::select_tier).layer(axum::middleware::from_fn_with_state(
                state.clone(),
                session_auth_layer,
            )),
        );

    // The payments webhook authenticates via its signature header
    let webhook_routes = Router::new().route(
        "/stripe/webhook",
        post(routes::billing::stripe_webhook),
    );

    // Everything below requires a valid session token
    let session_routes = Router::new()
        .route(
            "/brand",
            get(routes::brand::get_brand).post(routes::brand::upsert_brand),
        )
        .route(
            "/channels",
            get(routes::channels::list_channels)
                .post(routes::channels::create_channel)
                .put(routes::channels::update_channel)
                .delete(routes::channels::delete_channel),
        )
        .route(
            "/posts",
            get(routes::posts::list_posts)
                .post(routes::posts::create_post)
                .put(routes::posts::update_post)
                .delete(routes::posts::delete_post),
        )
        .route(
            "/campaigns",
            get(routes::campaigns::list_campaigns)
                .post(routes::campaigns::create_campaign)
                .put(routes::campaigns::update_campaign)
                .delete(routes::campaigns::delete_campaign),
        )
        .route(
            "/contacts",
            get(routes::contacts::list_contacts)
                .post(routes::contacts::create_contact)
                .put(routes::contacts::update_contact)
                .delete(routes::contacts::delete_contact),
        )
        .route(
            "/contacts/activities",
            get(routes::contacts::list_activities).post(routes::contacts::create_activity),
        )
        .route(
            "/vouchers",
            get(routes::vouchers::list_vouchers)
                .post(routes::vouchers::create_voucher)
                .put(routes::vouchers::update_voucher)
                .delete(routes::vouchers::delete_voucher),
        )
        .route("/vouchers/send", post(routes::vouchers::send_voucher))
        .route("/vouchers/redeem", post(routes::vouchers::redeem_voucher))
        .route(
            "/calendar",
            get(routes::calendar::list_events)
                .post(routes::calendar::create_event)
                .put(routes::calendar::update_event)
                .delete(routes::calendar::delete_event),
        )
        .route(
            "/growth",
            get(routes::growth::list_experiments)
                .post(routes::growth::create_experiment)
                .put(routes::growth::update_experiment)
                .delete(routes::growth::delete_experiment),
        )
        .route(
            "/settings",
            get(routes::settings::get_settings).post(routes::settings::upsert_settings),
        )
        .route(
            "/admin/users",
            get(routes::admin::list_users).put(routes::admin::update_user),
        )
        .route("/ai", post(routes::ai::generate))
        .route("/ai/edit", post(routes::ai::edit))
        .route("/stripe/checkout", post(routes::billing::create_checkout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Build the complete /api surface
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(webhook_routes)
        .merge(session_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Extracts and validates the Bearer token from the Authorization header,
/// then injects [`AuthContext`] into request extensions. Any failure —
/// missing header, malformed value, bad signature, expired token — is the
/// same 401 to the caller.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_claims(&claims);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
