//! Palette and font pairing derived from a chosen logo.

use async_trait::async_trait;

use bob_core::artifacts::{BrandData, LogoRef};
use bob_core::credentials::Credentials;
use bob_core::generators::{BrandSynthesizer, GeneratorResult};

use crate::openai::{ChatClient, Message};

const SYSTEM_PROMPT: &str = r##"You are a lead designer. The user has chosen a logo, given as a URL. Create a complementary brand kit that matches the logo's aesthetic.
- Colour palette: primary, secondary, accent, neutral_light and neutral_dark as #rrggbb hex codes.
- Fonts: two complementary Google Fonts, one for headings and one for body text.
Respond with a JSON object in exactly this structure:
{ "palette": { "primary": "#...", "secondary": "#...", "accent": "#...", "neutral_light": "#f8f9fa", "neutral_dark": "#212529" }, "fonts": { "heading": "Poppins", "body": "Inter" } }"##;

pub struct OpenAiBrandSynthesizer {
    chat: ChatClient,
    model: String,
}

impl OpenAiBrandSynthesizer {
    pub fn new(chat: ChatClient, model: String) -> Self {
        Self { chat, model }
    }
}

#[async_trait]
impl BrandSynthesizer for OpenAiBrandSynthesizer {
    async fn brand_data(&self, credentials: &Credentials, logo: &LogoRef) -> GeneratorResult<BrandData> {
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(format!(
                "The chosen logo is at this URL: {logo}. Generate the complementary brand kit."
            )),
        ];
        self.chat
            .complete_json(credentials, &self.model, &messages)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::parse_json_content;

    #[test]
    fn prompt_example_parses_as_brand_data() {
        let example = r##"{ "palette": { "primary": "#112233", "secondary": "#445566", "accent": "#778899", "neutral_light": "#f8f9fa", "neutral_dark": "#212529" }, "fonts": { "heading": "Poppins", "body": "Inter" } }"##;
        let data: BrandData = parse_json_content(example).unwrap();
        assert!(data.validate().is_ok());
        assert_eq!(data.fonts.heading, "Poppins");
    }
}
