//! Landing-page markup from a chat completion.

use async_trait::async_trait;

use bob_core::credentials::Credentials;
use bob_core::generators::{GeneratorResult, SiteGenerator, SiteInput};

use crate::openai::{ChatClient, Message};

const SYSTEM_PROMPT: &str = r#"You are the creative director at an award-winning digital agency. Design and build a complete, single 'index.html' landing page that is visually striking and converts.

Principles:
1. Image-first design. The hero section must feature the hero image prominently, as a full-bleed background.
2. Persuasive, benefit-oriented copy based on the mission and vision Q&A.
3. Subtle motion: use the AOS (Animate On Scroll) library for fade-in effects.

Technical requirements:
- The entire output is one HTML document. Do not wrap it in markdown code fences.
- Use Tailwind CSS from the official CDN and the AOS CDN links, initialized.
- Put the logo image in the navigation bar.
- Use the colour palette deliberately, with the primary colour for calls to action.
- Import and apply the Google Fonts.
- Use the hero image URL for the hero background and the feature image URLs in the features section.

Respond with raw HTML only, starting with <!DOCTYPE html> and ending with </html>."#;

pub struct OpenAiSiteGenerator {
    chat: ChatClient,
    model: String,
}

impl OpenAiSiteGenerator {
    pub fn new(chat: ChatClient, model: String) -> Self {
        Self { chat, model }
    }
}

fn user_prompt(input: &SiteInput) -> String {
    let brand_kit = serde_json::to_string_pretty(&input.brand_kit).unwrap_or_default();
    let transcript = input
        .transcript
        .iter()
        .map(|qa| format!("Q: {}\nA: {}", qa.question, qa.answer))
        .collect::<Vec<_>>()
        .join("\n\n");
    let domain = input
        .domain_name
        .as_deref()
        .map(|d| format!("\nDomain name: {d}"))
        .unwrap_or_default();

    format!(
        "Project details:\nName: {}\nPitch: {}{domain}\n\nBrand kit:\n{brand_kit}\n\n\
         Mission and vision Q&A (use for all copy):\n{transcript}\n\n\
         Image assets (use exactly as specified):\n- Hero image URL: {}\n- Feature image URLs: [{}]\n\n\
         Generate the complete 'index.html' now.",
        input.brief.title,
        input.brief.pitch,
        input.hero_image.as_deref().unwrap_or("none available"),
        input.feature_images.join(", "),
    )
}

#[async_trait]
impl SiteGenerator for OpenAiSiteGenerator {
    async fn site_markup(&self, credentials: &Credentials, input: &SiteInput) -> GeneratorResult<String> {
        let messages = [Message::system(SYSTEM_PROMPT), Message::user(user_prompt(input))];
        self.chat
            .complete(credentials, &self.model, &messages, false)
            .await
    }
}
