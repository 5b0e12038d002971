/// AI content assist
///
/// This module contains the completion-provider seam used by the AI
/// routes:
///
/// - [`provider`]: The `CompletionProvider` trait and the HTTP
///   implementation (OpenAI-compatible chat completions)
/// - [`mock`]: The keyword-matched canned-response provider, selected when
///   no API key is configured and used as the fallback on provider failure
/// - [`prompt`]: Prompt templating from brand profile + recent posts
///
/// # Provider Selection
///
/// ```text
/// AI_API_KEY set     -> HttpCompletionProvider (mock on failure)
/// AI_API_KEY unset   -> MockCompletionProvider
/// ```

pub mod mock;
pub mod prompt;
pub mod provider;

pub use mock::MockCompletionProvider;
pub use provider::{CompletionProvider, CompletionRequest, HttpCompletionProvider, ProviderError};

use crate::config::AiConfig;
use std::sync::Arc;

/// Builds the completion provider from configuration
///
/// The mock provider is an explicit strategy, not a hidden degradation:
/// with no API key configured every AI route serves canned replies.
pub fn provider_from_config(ai: Option<&AiConfig>) -> Arc<dyn CompletionProvider> {
    match ai {
        Some(config) => {
            tracing::info!(base_url = %config.base_url, "Using HTTP completion provider");
            Arc::new(HttpCompletionProvider::new(
                config.api_key.clone(),
                config.base_url.clone(),
            ))
        }
        None => {
            tracing::info!("No AI API key configured; using mock completion provider");
            Arc::new(MockCompletionProvider::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selection() {
        let mock = provider_from_config(None);
        assert_eq!(mock.name(), "mock");

        let config = AiConfig {
            api_key: "sk-test".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        };
        let http = provider_from_config(Some(&config));
        assert_eq!(http.name(), "http");
    }
}
