//! Conversational coach backed by a chat completion.

use async_trait::async_trait;

use bob_core::coach::ChatRole;
use bob_core::credentials::Credentials;
use bob_core::generators::{Coach, CoachInput, GeneratorResult};

use crate::openai::{ChatClient, Message};

const SYSTEM_PROMPT: &str = "You are an expert business coach and startup strategist advising a founder \
on their project. Your tone is insightful, encouraging and structured.

You have the full context of their project and the recent chat history. Use it to give personalized, \
actionable advice.

Always answer in Markdown with this structure:

**1. Core Insight:** one sentence that gets to the heart of the question.

**2. Key Considerations:** a bulleted list of 2-4 concise points.

**3. Actionable Next Step:** one clear action the founder can take now.";

pub struct OpenAiCoach {
    chat: ChatClient,
    model: String,
}

impl OpenAiCoach {
    pub fn new(chat: ChatClient, model: String) -> Self {
        Self { chat, model }
    }
}

fn build_messages(input: &CoachInput) -> Vec<Message> {
    let context = serde_json::to_string_pretty(&input.project_context).unwrap_or_default();
    let mut messages = Vec::with_capacity(input.history.len() + 2);
    messages.push(Message::system(format!(
        "{SYSTEM_PROMPT}\n\n--- PROJECT CONTEXT ---\n{context}\n--- END CONTEXT ---"
    )));
    messages.extend(input.history.iter().map(|turn| match turn.role {
        ChatRole::User => Message::user(turn.content.clone()),
        ChatRole::Assistant => Message::assistant(turn.content.clone()),
    }));
    messages.push(Message::user(input.message.clone()));
    messages
}

#[async_trait]
impl Coach for OpenAiCoach {
    async fn reply(&self, credentials: &Credentials, input: &CoachInput) -> GeneratorResult<String> {
        self.chat
            .complete(credentials, &self.model, &build_messages(input), false)
            .await
    }
}
