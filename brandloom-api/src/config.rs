/// Configuration management for the API server
///
/// Configuration is loaded from environment variables (with `.env` support
/// for development). Required variables fail startup with a named error;
/// provider integrations (AI, payments, SMTP, OAuth) are optional blocks
/// that disable their endpoints' functionality when absent.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `JWT_SECRET`: Secret key for session token signing (required, >= 32 chars)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `AI_API_KEY` / `AI_BASE_URL`: LLM provider credentials (optional;
///   without a key the mock provider is used)
/// - `STRIPE_SECRET_KEY` / `STRIPE_WEBHOOK_SECRET` / `STRIPE_PRICE_GOLD` /
///   `STRIPE_PRICE_ENTERPRISE` / `CHECKOUT_SUCCESS_URL` /
///   `CHECKOUT_CANCEL_URL`: payments block (optional)
/// - `SMTP_HOST` / `SMTP_PORT` / `SMTP_USERNAME` / `SMTP_PASSWORD` /
///   `SMTP_FROM`: email block (optional)
/// - `OAUTH_CLIENT_ID` / `OAUTH_CLIENT_SECRET` / `OAUTH_TOKEN_URL` /
///   `OAUTH_USERINFO_URL` / `OAUTH_REDIRECT_URL`: OAuth block (optional)
///
/// # Example
///
/// ```no_run
/// use brandloom_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session token configuration
    pub jwt: JwtConfig,

    /// LLM provider block; None selects the mock provider
    pub ai: Option<AiConfig>,

    /// Payments block; None disables checkout and the webhook
    pub stripe: Option<StripeConfig>,

    /// Email block; None disables voucher send
    pub smtp: Option<SmtpConfig>,

    /// OAuth block; None disables the OAuth sign-in path
    pub oauth: Option<OauthConfig>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; "*" means permissive (development)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Must be kept secret and at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Bearer API key
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
}

/// Payments provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    /// Secret API key
    pub secret_key: String,

    /// Webhook signing secret
    pub webhook_secret: String,

    /// Price id for the gold plan
    pub price_gold: String,

    /// Price id for the enterprise plan
    pub price_enterprise: String,

    /// Where checkout redirects on success
    pub success_url: String,

    /// Where checkout redirects on cancel
    pub cancel_url: String,
}

/// Email provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,

    /// Sender mailbox, e.g. "Brandloom <no-reply@brandloom.app>"
    pub from: String,
}

/// OAuth provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthConfig {
    pub client_id: String,
    pub client_secret: String,

    /// Authorization-code exchange endpoint
    pub token_url: String,

    /// Userinfo endpoint returning `{ "email": …, "name": … }`
    pub userinfo_url: String,

    /// Redirect URL registered with the provider
    pub redirect_url: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let ai = env::var("AI_API_KEY").ok().map(|api_key| AiConfig {
            api_key,
            base_url: env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
        });

        let stripe = match (
            env::var("STRIPE_SECRET_KEY"),
            env::var("STRIPE_WEBHOOK_SECRET"),
        ) {
            (Ok(secret_key), Ok(webhook_secret)) => Some(StripeConfig {
                secret_key,
                webhook_secret,
                price_gold: env::var("STRIPE_PRICE_GOLD").unwrap_or_default(),
                price_enterprise: env::var("STRIPE_PRICE_ENTERPRISE").unwrap_or_default(),
                success_url: env::var("CHECKOUT_SUCCESS_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/billing/success".to_string()),
                cancel_url: env::var("CHECKOUT_CANCEL_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/billing/cancel".to_string()),
            }),
            _ => None,
        };

        let smtp = match (env::var("SMTP_HOST"), env::var("SMTP_FROM")) {
            (Ok(host), Ok(from)) => Some(SmtpConfig {
                host,
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()?,
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from,
            }),
            _ => None,
        };

        let oauth = match (env::var("OAUTH_CLIENT_ID"), env::var("OAUTH_CLIENT_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(OauthConfig {
                client_id,
                client_secret,
                token_url: env::var("OAUTH_TOKEN_URL")
                    .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
                userinfo_url: env::var("OAUTH_USERINFO_URL").unwrap_or_else(|_| {
                    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
                }),
                redirect_url: env::var("OAUTH_REDIRECT_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/auth/callback".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            ai,
            stripe,
            smtp,
            oauth,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            ai: None,
            stripe: None,
            smtp: None,
            oauth: None,
        }
    }

    #[test]
    fn test_bind_address() {
        let config = minimal_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_optional_blocks_default_to_none() {
        let config = minimal_config();
        assert!(config.ai.is_none());
        assert!(config.stripe.is_none());
        assert!(config.smtp.is_none());
        assert!(config.oauth.is_none());
    }
}
