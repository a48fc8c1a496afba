//! Logo options from the DashScope text-to-image task API.
//!
//! Generation is asynchronous on the provider side: a task is submitted and
//! then polled until it succeeds, fails, or the attempt budget runs out.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use bob_core::artifacts::{LogoRef, LOGO_OPTION_COUNT};
use bob_core::credentials::{Credentials, Service};
use bob_core::generators::{GeneratorError, GeneratorResult, IdeaBrief, LogoGenerator};

use crate::error::{parse_response, ProviderError};

const PROVIDER: &str = "dashscope";

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    output: TaskOutput,
}

#[derive(Debug, Deserialize)]
struct TaskOutput {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    task_status: Option<String>,
    #[serde(default)]
    results: Vec<TaskResult>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    #[serde(default)]
    url: Option<String>,
}

/// What one poll of the task endpoint tells us.
#[derive(Debug, PartialEq, Eq)]
enum TaskState {
    Pending,
    Succeeded(Vec<String>),
    Failed(String),
}

fn task_state(output: TaskOutput) -> TaskState {
    match output.task_status.as_deref() {
        Some("SUCCEEDED") => {
            TaskState::Succeeded(output.results.into_iter().filter_map(|r| r.url).collect())
        }
        Some("FAILED") | Some("CANCELED") | Some("UNKNOWN") => TaskState::Failed(
            output
                .message
                .unwrap_or_else(|| "no message from provider".to_string()),
        ),
        _ => TaskState::Pending,
    }
}

fn logo_prompt(brief: &IdeaBrief) -> String {
    format!(
        "A minimalist, symbolic, timeless logo for a modern tech company named \"{}\". \
         It should represent a core concept from the company's mission: \"{}\". \
         Abstract design using basic geometric shapes in a clever, professional combination. \
         Plain white background, clean, high resolution, vector style.",
        brief.title, brief.pitch
    )
}

pub struct DashScopeLogoGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl DashScopeLogoGenerator {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        model: String,
        poll_interval: Duration,
        poll_attempts: u32,
    ) -> Self {
        Self {
            client,
            base_url,
            model,
            poll_interval,
            poll_attempts,
        }
    }

    async fn submit(&self, key: &str, brief: &IdeaBrief) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": { "prompt": logo_prompt(brief) },
            "parameters": { "n": LOGO_OPTION_COUNT, "size": "1024*1024" },
        });
        let response = self
            .client
            .post(format!(
                "{}/services/aigc/text2image/image-synthesis",
                self.base_url
            ))
            .bearer_auth(key)
            .header("X-DashScope-Async", "enable")
            .json(&body)
            .send()
            .await?;

        let envelope: TaskEnvelope = parse_response(PROVIDER, response).await?;
        envelope
            .output
            .task_id
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "no task id returned"))
    }

    async fn poll(&self, key: &str, task_id: &str) -> Result<TaskState, ProviderError> {
        let response = self
            .client
            .get(format!("{}/tasks/{task_id}", self.base_url))
            .bearer_auth(key)
            .send()
            .await?;
        let envelope: TaskEnvelope = parse_response(PROVIDER, response).await?;
        Ok(task_state(envelope.output))
    }
}

#[async_trait]
impl LogoGenerator for DashScopeLogoGenerator {
    async fn logo_options(
        &self,
        credentials: &Credentials,
        brief: &IdeaBrief,
    ) -> GeneratorResult<Vec<LogoRef>> {
        let key = credentials
            .require(Service::DashScope)
            .map_err(GeneratorError::MissingCredential)?;

        let task_id = self.submit(key.expose(), brief).await?;
        tracing::info!(task_id = %task_id, "Logo generation task submitted");

        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;
            match self.poll(key.expose(), &task_id).await? {
                TaskState::Pending => {
                    tracing::debug!(task_id = %task_id, attempt, "Logo task still running");
                }
                TaskState::Succeeded(urls) => {
                    let logos = urls
                        .into_iter()
                        .filter_map(|url| LogoRef::new(url).ok())
                        .collect::<Vec<_>>();
                    if logos.is_empty() {
                        return Err(GeneratorError::Malformed(
                            "logo task succeeded without images".to_string(),
                        ));
                    }
                    return Ok(logos);
                }
                TaskState::Failed(message) => {
                    return Err(GeneratorError::Request(format!(
                        "logo task {task_id} failed: {message}"
                    )));
                }
            }
        }

        Err(GeneratorError::Request(format!(
            "logo task {task_id} did not finish after {} polls",
            self.poll_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(value: serde_json::Value) -> TaskOutput {
        serde_json::from_value::<TaskEnvelope>(serde_json::json!({ "output": value }))
            .unwrap()
            .output
    }

    #[test]
    fn succeeded_task_yields_urls() {
        let state = task_state(output(serde_json::json!({
            "task_status": "SUCCEEDED",
            "results": [{ "url": "https://img/1.png" }, { "code": "x" }, { "url": "https://img/2.png" }]
        })));
        assert_eq!(
            state,
            TaskState::Succeeded(vec!["https://img/1.png".into(), "https://img/2.png".into()])
        );
    }

    #[test]
    fn failed_task_carries_message() {
        let state = task_state(output(serde_json::json!({
            "task_status": "FAILED",
            "message": "quota exceeded"
        })));
        assert_eq!(state, TaskState::Failed("quota exceeded".into()));
    }

    #[test]
    fn running_task_is_pending() {
        for status in ["PENDING", "RUNNING"] {
            let state = task_state(output(serde_json::json!({ "task_status": status })));
            assert_eq!(state, TaskState::Pending);
        }
    }

    #[test]
    fn prompt_names_company() {
        let brief = IdeaBrief {
            title: "Acme".into(),
            pitch: "pet widgets".into(),
            problem: None,
            target_user: None,
        };
        let prompt = logo_prompt(&brief);
        assert!(prompt.contains("\"Acme\""));
        assert!(prompt.contains("pet widgets"));
    }
}
