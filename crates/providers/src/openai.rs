//! Minimal chat-completions client shared by the text generators.

use serde::{Deserialize, Serialize};

use bob_core::credentials::{Credentials, Service};
use bob_core::generators::{GeneratorError, GeneratorResult};

use crate::error::{parse_response, ProviderError};

const PROVIDER: &str = "openai";

/// A chat message in the completions request format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for the chat-completions endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Run a completion and return the assistant's text.
    pub async fn complete(
        &self,
        credentials: &Credentials,
        model: &str,
        messages: &[Message],
        json_mode: bool,
    ) -> GeneratorResult<String> {
        let key = credentials
            .require(Service::OpenAi)
            .map_err(GeneratorError::MissingCredential)?;

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });
        if json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(key.expose())
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let completion: CompletionResponse = parse_response(PROVIDER, response).await?;
        Ok(first_content(completion)?)
    }

    /// Run a JSON-mode completion and deserialize the assistant's object.
    pub async fn complete_json<T: serde::de::DeserializeOwned>(
        &self,
        credentials: &Credentials,
        model: &str,
        messages: &[Message],
    ) -> GeneratorResult<T> {
        let text = self.complete(credentials, model, messages, true).await?;
        parse_json_content(&text).map_err(GeneratorError::from)
    }
}

fn first_content(completion: CompletionResponse) -> Result<String, ProviderError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ProviderError::malformed(PROVIDER, "completion had no content"))
}

/// Deserialize a JSON object returned as message content.
pub(crate) fn parse_json_content<T: serde::de::DeserializeOwned>(
    text: &str,
) -> Result<T, ProviderError> {
    serde_json::from_str(text.trim())
        .map_err(|e| ProviderError::malformed(PROVIDER, format!("invalid JSON content: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_choice_content_is_used() {
        let completion: CompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": "hello" } }]
        }))
        .unwrap();
        assert_eq!(first_content(completion).unwrap(), "hello");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let completion: CompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(first_content(completion).is_err());

        let blank: CompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": null } }]
        }))
        .unwrap();
        assert!(first_content(blank).is_err());
    }

    #[test]
    fn json_content_parses() {
        #[derive(Deserialize)]
        struct Names {
            names: Vec<String>,
        }
        let names: Names = parse_json_content(r#" {"names": ["a", "b"]} "#).unwrap();
        assert_eq!(names.names, vec!["a", "b"]);
        assert!(parse_json_content::<Names>("not json").is_err());
    }
}
