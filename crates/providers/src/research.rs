//! Web research through the Tavily search API.

use async_trait::async_trait;
use serde::Deserialize;

use bob_core::credentials::{Credentials, Service};
use bob_core::generators::{GeneratorError, GeneratorResult, IdeaResearcher, ResearchContext};

use crate::error::{parse_response, ProviderError};

const PROVIDER: &str = "tavily";

/// Number of search results folded into the research context.
const MAX_RESULTS: u32 = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    url: String,
    #[serde(default)]
    content: String,
}

pub struct TavilyResearcher {
    client: reqwest::Client,
    url: String,
}

impl TavilyResearcher {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl IdeaResearcher for TavilyResearcher {
    async fn research(
        &self,
        credentials: &Credentials,
        query: &str,
    ) -> GeneratorResult<ResearchContext> {
        let key = credentials
            .require(Service::Tavily)
            .map_err(GeneratorError::MissingCredential)?;

        let body = serde_json::json!({
            "api_key": key.expose(),
            "query": query,
            "search_depth": "advanced",
            "max_results": MAX_RESULTS,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let search: SearchResponse = parse_response(PROVIDER, response).await?;
        Ok(to_context(search))
    }
}

fn to_context(search: SearchResponse) -> ResearchContext {
    let text = search
        .results
        .iter()
        .map(|r| format!("Source: {}\nContent: {}", r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    let sources = search.results.into_iter().map(|r| r.url).collect();
    ResearchContext { text, sources }
}
