/// Prompt templating for the AI routes
///
/// Prompts are plain string formatting over the caller's brand profile and
/// most recent posts. There is no templating engine and no model-specific
/// markup; the provider seam receives a system prompt and a user prompt.

use brandloom_shared::models::brand_profile::BrandProfile;
use brandloom_shared::models::post::Post;

/// How many recent posts feed the prompt context
pub const RECENT_POST_CONTEXT: i64 = 5;

/// Builds the system prompt from the brand profile
///
/// With no profile saved, the assistant falls back to a generic marketing
/// persona.
pub fn system_prompt(brand: Option<&BrandProfile>) -> String {
    match brand {
        Some(brand) => {
            let mut prompt = format!(
                "You are the marketing assistant for the brand \"{}\".",
                brand.name
            );

            if let Some(industry) = &brand.industry {
                prompt.push_str(&format!(" The brand operates in the {} industry.", industry));
            }

            if let Some(audience) = &brand.target_audience {
                prompt.push_str(&format!(" Its target audience: {}.", audience));
            }

            if let Some(tone) = brand.voice.get("tone").and_then(|v| v.as_str()) {
                prompt.push_str(&format!(" Write in a {} tone.", tone));
            }

            prompt.push_str(" Keep output ready to publish, without preamble.");
            prompt
        }
        None => "You are a marketing assistant. Keep output ready to publish, \
                 without preamble."
            .to_string(),
    }
}

/// Builds the generation prompt from the topic and recent post context
pub fn generation_prompt(topic: &str, recent_posts: &[Post]) -> String {
    let mut prompt = format!("Write a social media post about: {}", topic);

    if !recent_posts.is_empty() {
        prompt.push_str("\n\nRecent posts for style reference:\n");
        for post in recent_posts {
            let excerpt: String = post.content.chars().take(140).collect();
            prompt.push_str(&format!("- {}\n", excerpt));
        }
    }

    prompt
}

/// Builds the edit prompt from existing content and an instruction
pub fn edit_prompt(content: &str, instruction: &str) -> String {
    format!(
        "Rewrite the following content. Instruction: {}\n\nContent:\n{}",
        instruction, content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_brand() -> BrandProfile {
        BrandProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Glowbar".to_string(),
            industry: Some("skincare".to_string()),
            colors: serde_json::json!(["#ffaa00"]),
            personality: serde_json::json!({}),
            voice: serde_json::json!({"tone": "playful"}),
            target_audience: Some("busy professionals".to_string()),
            competitors: serde_json::json!([]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_post(content: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            channel_id: None,
            campaign_id: None,
            title: None,
            content: content.to_string(),
            status: "published".to_string(),
            scheduled_at: None,
            published_at: None,
            likes: 0,
            comments: 0,
            shares: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_system_prompt_uses_brand_fields() {
        let brand = sample_brand();
        let prompt = system_prompt(Some(&brand));

        assert!(prompt.contains("Glowbar"));
        assert!(prompt.contains("skincare"));
        assert!(prompt.contains("busy professionals"));
        assert!(prompt.contains("playful"));
    }

    #[test]
    fn test_system_prompt_without_brand() {
        let prompt = system_prompt(None);
        assert!(prompt.contains("marketing assistant"));
    }

    #[test]
    fn test_generation_prompt_includes_topic_and_context() {
        let posts = vec![sample_post("Morning routine in 3 steps")];
        let prompt = generation_prompt("summer sale", &posts);

        assert!(prompt.contains("summer sale"));
        assert!(prompt.contains("Morning routine in 3 steps"));
    }

    #[test]
    fn test_generation_prompt_without_context() {
        let prompt = generation_prompt("summer sale", &[]);
        assert!(!prompt.contains("style reference"));
    }

    #[test]
    fn test_context_excerpts_are_truncated() {
        let long = "x".repeat(500);
        let posts = vec![sample_post(&long)];
        let prompt = generation_prompt("topic", &posts);

        assert!(!prompt.contains(&long));
        assert!(prompt.contains(&"x".repeat(140)));
    }

    #[test]
    fn test_edit_prompt() {
        let prompt = edit_prompt("old copy", "make it shorter");
        assert!(prompt.contains("old copy"));
        assert!(prompt.contains("make it shorter"));
    }
}
