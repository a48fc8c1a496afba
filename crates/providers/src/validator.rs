//! Idea validation through a chat completion.

use async_trait::async_trait;
use serde::Deserialize;

use bob_core::artifacts::{RiskItem, ScoreBreakdown, ValidationReportData, Verdict};
use bob_core::credentials::Credentials;
use bob_core::generators::{
    GeneratorError, GeneratorResult, IdeaBrief, IdeaValidator, ResearchContext,
};

use crate::openai::{ChatClient, Message};

const SYSTEM_PROMPT: &str = r#"You are a skeptical partner at a top-tier venture capital firm reviewing a seed-stage idea. Be direct and specific.

Think through problem urgency, market size, defensible moat and differentiation using the idea and the web research provided.

Respond with a single JSON object and nothing else:
{
  "score": <integer 0-100, investment-worthiness>,
  "breakdown": {
    "market_potential": "<market size and growth>",
    "uniqueness_and_moat": "<differentiation and defensibility>",
    "feasibility": "<technical and business feasibility>"
  },
  "risks": [ { "risk": "<red flag>", "mitigation": "<strategic response>" } ],
  "summary": "<one paragraph for the investment committee, starting with the verdict>",
  "verdict": "<'Build' or 'Bounce'>"
}"#;

/// Shape of the model's answer before normalization.
#[derive(Debug, Deserialize)]
struct RawReport {
    score: f64,
    verdict: String,
    breakdown: ScoreBreakdown,
    #[serde(default)]
    risks: Vec<RiskItem>,
    summary: String,
}

pub struct OpenAiValidator {
    chat: ChatClient,
    model: String,
}

impl OpenAiValidator {
    pub fn new(chat: ChatClient, model: String) -> Self {
        Self { chat, model }
    }
}

#[async_trait]
impl IdeaValidator for OpenAiValidator {
    async fn assess(
        &self,
        credentials: &Credentials,
        brief: &IdeaBrief,
        research: &ResearchContext,
    ) -> GeneratorResult<ValidationReportData> {
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(user_prompt(brief, research)),
        ];
        let raw: RawReport = self
            .chat
            .complete_json(credentials, &self.model, &messages)
            .await?;
        normalize(raw, research)
    }
}

fn user_prompt(brief: &IdeaBrief, research: &ResearchContext) -> String {
    let research_text = if research.is_empty() {
        "No web research is available. Rely on your own knowledge."
    } else {
        research.text.as_str()
    };
    format!(
        "Startup idea:\nTitle: {}\nPitch: {}\nProblem it solves: {}\nTarget user: {}\n\nWeb research results:\n{}",
        brief.title,
        brief.pitch,
        brief.problem.as_deref().unwrap_or("not specified"),
        brief.target_user.as_deref().unwrap_or("not specified"),
        research_text,
    )
}

fn normalize(raw: RawReport, research: &ResearchContext) -> GeneratorResult<ValidationReportData> {
    let verdict =
        Verdict::parse(&raw.verdict).map_err(|e| GeneratorError::Malformed(e.to_string()))?;
    Ok(ValidationReportData {
        score: raw.score.round() as i32,
        verdict,
        breakdown: raw.breakdown,
        risks: raw.risks,
        summary: raw.summary,
        sources: research.sources.clone(),
    })
}
