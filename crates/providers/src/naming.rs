//! Domain-name ideas from a chat completion, checked against RDAP.

use async_trait::async_trait;
use serde::Deserialize;

use bob_core::credentials::Credentials;
use bob_core::domain_names::{
    dedupe_suggestions, DomainCandidate, NamingMode, TldAvailability, NAME_SUGGESTION_COUNT,
};
use bob_core::generators::{DomainGenerator, GeneratorResult, IdeaBrief};

use crate::error::ProviderError;
use crate::openai::{ChatClient, Message};
use crate::rdap::RdapChecker;

#[derive(Debug, Deserialize)]
struct NameIdeas {
    #[serde(default)]
    names: Vec<String>,
}

pub struct OpenAiDomainGenerator {
    chat: ChatClient,
    model: String,
    rdap: RdapChecker,
}

impl OpenAiDomainGenerator {
    pub fn new(chat: ChatClient, model: String, rdap: RdapChecker) -> Self {
        Self { chat, model, rdap }
    }
}

fn system_prompt(mode: NamingMode) -> String {
    let style = match mode {
        NamingMode::Normal => {
            "The names should be short, memorable and brandable, one or two words."
        }
        NamingMode::Creative => {
            "The simple names are taken. Get more creative: add action words (get, go, try), \
             industry suffixes (-lab, -stack, -base) or descriptive prefixes."
        }
    };
    format!(
        "You are a senior naming strategist. Generate {NAME_SUGGESTION_COUNT} name suggestions \
         for the project. {style} Respond with a JSON object with the key \"names\", an array \
         of strings. Names must be lowercase and contain no spaces."
    )
}

#[async_trait]
impl DomainGenerator for OpenAiDomainGenerator {
    async fn candidates(
        &self,
        credentials: &Credentials,
        brief: &IdeaBrief,
        mode: NamingMode,
    ) -> GeneratorResult<Vec<DomainCandidate>> {
        let messages = [
            Message::system(system_prompt(mode)),
            Message::user(format!(
                "Project title: {}, pitch: {}",
                brief.title, brief.pitch
            )),
        ];
        let ideas: NameIdeas = self
            .chat
            .complete_json(credentials, &self.model, &messages)
            .await?;

        let names = dedupe_suggestions(&ideas.names);
        tracing::debug!(?mode, count = names.len(), "Checking name availability");

        let checks = names.into_iter().map(|name| async move {
            let availability = self.rdap.check(&name).await;
            (name, availability)
        });
        collect_candidates(futures::future::join_all(checks).await)
    }
}

/// Build the candidate list from per-name RDAP results. A name the
/// registries could not answer for is reported as unavailable, but a batch
/// with no answers at all is a failed lookup rather than "everything taken".
fn collect_candidates(
    checks: Vec<(String, Result<TldAvailability, ProviderError>)>,
) -> GeneratorResult<Vec<DomainCandidate>> {
    let total = checks.len();
    let mut failed = 0;
    let mut last_error = None;
    let mut candidates = Vec::with_capacity(total);
    for (name, check) in checks {
        let availability = check.unwrap_or_else(|e| {
            failed += 1;
            last_error = Some(e);
            TldAvailability::default()
        });
        candidates.push(DomainCandidate { name, availability });
    }
    match last_error {
        Some(e) if failed == total => Err(e.into()),
        _ => Ok(candidates),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bob_core::generators::GeneratorError;

    use super::*;

    #[test]
    fn creative_prompt_differs() {
        let normal = system_prompt(NamingMode::Normal);
        let creative = system_prompt(NamingMode::Creative);
        assert!(normal.contains("20 name suggestions"));
        assert!(creative.contains("-lab"));
        assert_ne!(normal, creative);
    }

    fn outage() -> ProviderError {
        ProviderError::Api {
            provider: "rdap",
            status: 503,
            body: String::new(),
        }
    }

    #[test]
    fn batch_without_any_rdap_answer_fails() {
        let checks = vec![("acme".to_string(), Err(outage())), ("getacme".to_string(), Err(outage()))];
        assert_matches!(collect_candidates(checks), Err(GeneratorError::Request(_)));
    }

    #[test]
    fn partially_answered_batch_keeps_every_name() {
        let open = TldAvailability {
            com: true,
            co: false,
            io: false,
        };
        let checks = vec![("acme".to_string(), Err(outage())), ("getacme".to_string(), Ok(open))];

        let candidates = collect_candidates(checks).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(!candidates[0].availability.any());
        assert_eq!(candidates[1].availability, open);
    }

    #[test]
    fn empty_batch_is_not_an_outage() {
        assert!(collect_candidates(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn missing_names_key_is_empty() {
        let ideas: NameIdeas = serde_json::from_str("{}").unwrap();
        assert!(ideas.names.is_empty());
    }
}
