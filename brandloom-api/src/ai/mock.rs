/// Mock completion provider
///
/// Serves deterministic canned replies keyed by substrings of the user's
/// message. This is mock data, not an intent classifier: the first entry
/// whose keyword appears in the lowercased message wins, and unknown
/// messages get the default reply.
///
/// Selected at startup when no AI API key is configured, and used by the
/// AI routes as the fallback when the HTTP provider fails.

use async_trait::async_trait;

use super::provider::{CompletionProvider, CompletionRequest, ProviderError};

/// Keyword-matched canned replies: (keywords, reply)
const CANNED_REPLIES: &[(&[&str], &str)] = &[
    (
        &["report", "analytics", "performance"],
        "Here's a quick performance summary: engagement is up 12% week over week, \
         with your top post driving most of the lift. Carousels are outperforming \
         single images 2:1 — consider doubling down on that format next week.",
    ),
    (
        &["campaign", "launch"],
        "Campaign idea: a 2-week teaser arc. Week one seeds curiosity with three \
         behind-the-scenes posts; week two converts with a launch-day offer and a \
         follow-up testimonial push. Keep the CTA identical across channels.",
    ),
    (
        &["schedule", "calendar", "when"],
        "Best posting windows for your audience: Tuesday and Thursday mornings, \
         plus Sunday early evening. Keep weekday posts practical and save the \
         storytelling pieces for the weekend slot.",
    ),
    (
        &["voucher", "discount", "promo", "offer"],
        "Promo copy draft: \"This week only — take 20% off with code THANKYOU20. \
         No fine print, no gimmicks. Because you've been with us from the start.\"",
    ),
    (
        &["contact", "crm", "lead"],
        "Lead nurturing tip: contacts tagged as prospects respond best to a \
         three-touch sequence — a value post share, a personal check-in, then a \
         soft offer. Space the touches about four days apart.",
    ),
];

/// The reply used when no keyword matches
const DEFAULT_REPLY: &str =
    "Here's a content idea to get you started: share one customer win from this \
     month as a short story — the problem, the moment it turned around, and a \
     single takeaway your audience can apply today.";

/// Mock provider serving the canned-reply table
pub struct MockCompletionProvider;

impl MockCompletionProvider {
    /// Creates the mock provider
    pub fn new() -> Self {
        Self
    }

    /// Picks the canned reply for a message
    ///
    /// Pure; table order decides ties.
    pub fn reply_for(message: &str) -> &'static str {
        let lowered = message.to_lowercase();

        for (keywords, reply) in CANNED_REPLIES {
            if keywords.iter().any(|k| lowered.contains(k)) {
                return reply;
            }
        }

        DEFAULT_REPLY
    }
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        Ok(Self::reply_for(&request.prompt).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keyword_yields_analytics_summary() {
        let reply = MockCompletionProvider::reply_for("Can you give me a weekly report?");
        assert!(reply.contains("performance summary"));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let reply = MockCompletionProvider::reply_for("CAMPAIGN ideas please");
        assert!(reply.contains("Campaign idea"));
    }

    #[test]
    fn test_unknown_message_gets_default_reply() {
        let reply = MockCompletionProvider::reply_for("Tell me something interesting");
        assert_eq!(reply, DEFAULT_REPLY);
    }

    #[test]
    fn test_first_matching_entry_wins() {
        // "report" (first entry) beats "campaign" (second) when both appear
        let reply = MockCompletionProvider::reply_for("report on the campaign");
        assert!(reply.contains("performance summary"));
    }

    #[tokio::test]
    async fn test_provider_trait_returns_canned_reply() {
        let provider = MockCompletionProvider::new();
        let request = CompletionRequest {
            system: None,
            prompt: "I need a discount offer".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        };

        let reply = provider.complete(&request).await.unwrap();
        assert!(reply.contains("20% off"));
    }
}
