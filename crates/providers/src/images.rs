//! Stock imagery for generated sites, via Pexels.
//!
//! A chat completion first condenses the idea into a short search query;
//! if that query finds nothing, a generic fallback query is used.

use async_trait::async_trait;
use serde::Deserialize;

use bob_core::credentials::{Credentials, Service};
use bob_core::generators::{GeneratorError, GeneratorResult, IdeaBrief, ImageSource};

use crate::error::{parse_response, ProviderError};
use crate::openai::{ChatClient, Message};

const PROVIDER: &str = "pexels";

const FALLBACK_QUERY: &str = "abstract technology";

const PER_PAGE: u32 = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    large2x: String,
}

fn photo_urls(search: SearchResponse) -> Vec<String> {
    search.photos.into_iter().map(|p| p.src.large2x).collect()
}

/// Normalize the model's query answer: first line, no quotes.
fn clean_query(raw: &str) -> Option<String> {
    let query = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?
        .trim_matches(|c| c == '"' || c == '\'' || c == '.')
        .trim();
    (!query.is_empty()).then(|| query.to_string())
}

pub struct PexelsImageSource {
    client: reqwest::Client,
    url: String,
    chat: ChatClient,
    model: String,
}

impl PexelsImageSource {
    pub fn new(client: reqwest::Client, url: String, chat: ChatClient, model: String) -> Self {
        Self {
            client,
            url,
            chat,
            model,
        }
    }

    async fn search_query(&self, credentials: &Credentials, brief: &IdeaBrief) -> String {
        let prompt = format!(
            "Based on the following startup idea, give a single concise search query (2-3 words) \
             to find beautiful, abstract, professional stock photos. Example: for a financial \
             analytics app, \"abstract data visualization\".\n\nProject title: {}\nProject pitch: {}\n\n\
             Respond with only the search query.",
            brief.title, brief.pitch
        );
        match self
            .chat
            .complete(credentials, &self.model, &[Message::user(prompt)], false)
            .await
        {
            Ok(raw) => clean_query(&raw).unwrap_or_else(|| FALLBACK_QUERY.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Image query generation failed, using fallback query");
                FALLBACK_QUERY.to_string()
            }
        }
    }

    async fn search(&self, key: &str, query: &str) -> Result<Vec<String>, ProviderError> {
        let per_page = PER_PAGE.to_string();
        let response = self
            .client
            .get(&self.url)
            .header("Authorization", key)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
            ])
            .send()
            .await?;
        let search: SearchResponse = parse_response(PROVIDER, response).await?;
        Ok(photo_urls(search))
    }
}

#[async_trait]
impl ImageSource for PexelsImageSource {
    async fn images(&self, credentials: &Credentials, brief: &IdeaBrief) -> GeneratorResult<Vec<String>> {
        let key = credentials
            .require(Service::Pexels)
            .map_err(GeneratorError::MissingCredential)?;

        let query = self.search_query(credentials, brief).await;
        tracing::debug!(query = %query, "Searching stock photos");

        let urls = self.search(key.expose(), &query).await?;
        if !urls.is_empty() || query == FALLBACK_QUERY {
            return Ok(urls);
        }

        tracing::warn!(query = %query, "No photos found, retrying with fallback query");
        Ok(self.search(key.expose(), FALLBACK_QUERY).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_urls_use_large2x() {
        let search: SearchResponse = serde_json::from_value(serde_json::json!({
            "photos": [
                { "id": 1, "src": { "large2x": "https://p/1.jpg", "small": "s" } },
                { "id": 2, "src": { "large2x": "https://p/2.jpg" } }
            ]
        }))
        .unwrap();
        assert_eq!(photo_urls(search), vec!["https://p/1.jpg", "https://p/2.jpg"]);
    }

    #[test]
    fn query_is_cleaned() {
        assert_eq!(
            clean_query("\n \"abstract data\".\nextra").as_deref(),
            Some("abstract data")
        );
        assert_eq!(clean_query("   \n  "), None);
    }
}
