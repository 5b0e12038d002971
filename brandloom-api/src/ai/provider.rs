/// The completion-provider contract and the HTTP implementation
///
/// All AI routes go through the [`CompletionProvider`] trait so the
/// handler logic is identical whether completions come from a real
/// provider or from the canned mock. Providers must:
///
/// 1. Accept a [`CompletionRequest`] (prompt + model + temperature)
/// 2. Return the completion text, or a [`ProviderError`]
/// 3. Never retry internally — failure handling is one catch-and-fallback
///    in the route

use async_trait::async_trait;
use serde_json::json;

/// Provider error types
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider call failed (network, auth, 5xx)
    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    /// The provider answered with something we cannot read
    #[error("Unexpected provider response: {0}")]
    MalformedResponse(String),
}

/// A completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system prompt (brand voice, context)
    pub system: Option<String>,

    /// The user-facing prompt
    pub prompt: String,

    /// Model identifier (from the caller's AI settings)
    pub model: String,

    /// Sampling temperature (from the caller's AI settings)
    pub temperature: f64,
}

/// The completion-provider contract
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider name, used for logging
    fn name(&self) -> &str;

    /// Produces a completion for the request
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` on any failure. Callers fall back to the
    /// mock reply; nothing is retried.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// Completion provider backed by an OpenAI-compatible HTTP API
///
/// One POST to `{base_url}/chat/completions` per request, awaited with the
/// client's default timeout and no retry.
pub struct HttpCompletionProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HttpCompletionProvider {
    /// Creates a provider for the given credentials
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": request.prompt }));

        let body = json!({
            "model": request.model,
            "temperature": request.temperature,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "provider returned {}",
                status
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider =
            HttpCompletionProvider::new("key".to_string(), "https://api.test/v1/".to_string());
        assert_eq!(provider.base_url, "https://api.test/v1");
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails() {
        // Nothing listens on this port; the call must surface RequestFailed
        let provider = HttpCompletionProvider::new(
            "key".to_string(),
            "http://127.0.0.1:1/v1".to_string(),
        );

        let request = CompletionRequest {
            system: None,
            prompt: "hello".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        };

        let result = provider.complete(&request).await;
        assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
    }
}
