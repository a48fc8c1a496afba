//! Adapter traits for external generators.
//!
//! The workflow never talks to a provider directly. Each collaborator is a
//! trait taking a narrow input struct and returning a typed payload or a
//! [`GeneratorError`], so providers can be swapped or faked in tests.

use async_trait::async_trait;
use serde::Serialize;

use crate::artifacts::{BrandData, BrandKitData, CrossQaData, FontPair, LogoRef, Palette, ValidationReportData};
use crate::coach::ChatTurn;
use crate::credentials::Credentials;
use crate::domain_names::{DomainCandidate, NamingMode};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of an external collaborator call.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// No API key is available for the service.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The call itself failed (network, non-2xx status, rate limit).
    #[error("request failed: {0}")]
    Request(String),

    /// The call succeeded but the output could not be used.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out after {0} seconds")]
    TimedOut(u64),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The intake fields most generators work from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaBrief {
    pub title: String,
    pub pitch: String,
    pub problem: Option<String>,
    pub target_user: Option<String>,
}

/// Output of the research step. Empty when research is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchContext {
    pub text: String,
    pub sources: Vec<String>,
}

impl ResearchContext {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Build the research query for an idea.
pub fn research_query(brief: &IdeaBrief) -> String {
    format!(
        "market analysis and competitors for a startup doing: {}",
        brief.pitch
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardInput {
    pub palette: Palette,
    pub fonts: FontPair,
    pub logo_ref: LogoRef,
    pub display_name: String,
    pub email: String,
    pub domain_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteInput {
    pub brief: IdeaBrief,
    pub domain_name: Option<String>,
    pub brand_kit: BrandKitData,
    pub transcript: Vec<CrossQaData>,
    pub hero_image: Option<String>,
    pub feature_images: Vec<String>,
}

/// Maximum number of feature images placed on the generated site.
pub const MAX_FEATURE_IMAGES: usize = 3;

impl SiteInput {
    /// Split sourced images into a hero image and feature images.
    pub fn assign_images(&mut self, images: Vec<String>) {
        let mut iter = images.into_iter();
        self.hero_image = iter.next();
        self.feature_images = iter.take(MAX_FEATURE_IMAGES).collect();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachInput {
    /// Serialized project snapshot used as context.
    pub project_context: serde_json::Value,
    /// Most recent prior messages, oldest first.
    pub history: Vec<ChatTurn>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Adapter traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait IdeaResearcher: Send + Sync {
    async fn research(&self, credentials: &Credentials, query: &str) -> GeneratorResult<ResearchContext>;
}

#[async_trait]
pub trait IdeaValidator: Send + Sync {
    async fn assess(
        &self,
        credentials: &Credentials,
        brief: &IdeaBrief,
        research: &ResearchContext,
    ) -> GeneratorResult<ValidationReportData>;
}

#[async_trait]
pub trait DomainGenerator: Send + Sync {
    /// Name candidates with per-TLD availability. Returns every checked
    /// name; callers filter for availability.
    async fn candidates(
        &self,
        credentials: &Credentials,
        brief: &IdeaBrief,
        mode: NamingMode,
    ) -> GeneratorResult<Vec<DomainCandidate>>;
}

#[async_trait]
pub trait LogoGenerator: Send + Sync {
    async fn logo_options(
        &self,
        credentials: &Credentials,
        brief: &IdeaBrief,
    ) -> GeneratorResult<Vec<LogoRef>>;
}

#[async_trait]
pub trait BrandSynthesizer: Send + Sync {
    async fn brand_data(&self, credentials: &Credentials, logo: &LogoRef) -> GeneratorResult<BrandData>;
}

#[async_trait]
pub trait CardRenderer: Send + Sync {
    /// Render a business card document, returning its bytes.
    async fn render_card(&self, input: &CardInput) -> GeneratorResult<Vec<u8>>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn images(&self, credentials: &Credentials, brief: &IdeaBrief) -> GeneratorResult<Vec<String>>;
}

#[async_trait]
pub trait SiteGenerator: Send + Sync {
    /// Full site markup for a single `index.html`.
    async fn site_markup(&self, credentials: &Credentials, input: &SiteInput) -> GeneratorResult<String>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store a file under the project's asset area, returning its reference.
    async fn store_file(&self, project_id: DbId, file_name: &str, bytes: Vec<u8>) -> GeneratorResult<String>;

    /// Delete a file by the reference `store_file` or `package_site`
    /// returned. A file that is already gone is not an error.
    async fn remove_file(&self, reference: &str) -> GeneratorResult<()>;
}

#[async_trait]
pub trait SitePackager: Send + Sync {
    /// Package site markup into a downloadable archive called `archive_name`,
    /// returning its reference.
    async fn package_site(&self, project_id: DbId, archive_name: &str, markup: &str) -> GeneratorResult<String>;
}

#[async_trait]
pub trait Coach: Send + Sync {
    async fn reply(&self, credentials: &Credentials, input: &CoachInput) -> GeneratorResult<String>;
}

// ---------------------------------------------------------------------------
// Output clean-up
// ---------------------------------------------------------------------------

/// Strip markdown code fences around generated markup and check that what is
/// left looks like an HTML document.
pub fn clean_site_markup(raw: &str) -> GeneratorResult<String> {
    let mut markup = raw.trim();
    if let Some(rest) = markup.strip_prefix("```") {
        markup = rest.strip_prefix("html").unwrap_or(rest).trim_start();
    }
    if let Some(rest) = markup.strip_suffix("```") {
        markup = rest.trim_end();
    }
    let lower = markup.to_ascii_lowercase();
    if !(lower.starts_with("<!doctype html") || lower.starts_with("<html")) {
        return Err(GeneratorError::Malformed(
            "site generator did not return an HTML document".to_string(),
        ));
    }
    Ok(markup.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> IdeaBrief {
        IdeaBrief {
            title: "Acme".into(),
            pitch: "widgets for pets".into(),
            problem: None,
            target_user: None,
        }
    }

    #[test]
    fn research_query_mentions_pitch() {
        assert_eq!(
            research_query(&brief()),
            "market analysis and competitors for a startup doing: widgets for pets"
        );
    }

    #[test]
    fn fences_are_stripped() {
        let raw = "```html\n<!DOCTYPE html><html></html>\n```";
        assert_eq!(
            clean_site_markup(raw).unwrap(),
            "<!DOCTYPE html><html></html>"
        );
    }

    #[test]
    fn plain_markup_passes_through() {
        assert_eq!(clean_site_markup("  <html></html> ").unwrap(), "<html></html>");
    }

    #[test]
    fn non_html_is_malformed() {
        assert!(matches!(
            clean_site_markup("Sure! Here is your site."),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn empty_research_context() {
        assert!(ResearchContext::default().is_empty());
    }
}
