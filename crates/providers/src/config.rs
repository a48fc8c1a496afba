//! Provider endpoints and tuning, loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Endpoints, models, and local paths used by the provider adapters.
///
/// All fields have defaults pointing at the public provider APIs, so only
/// the variables that differ need to be set.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub openai_base_url: String,
    /// Model for short structured completions (validation, naming, brand, coach).
    pub openai_model: String,
    /// Model for full site markup.
    pub openai_site_model: String,
    pub tavily_url: String,
    pub pexels_url: String,
    pub dashscope_base_url: String,
    pub logo_model: String,
    pub logo_poll_interval: Duration,
    pub logo_poll_attempts: u32,
    /// HTML-to-PDF render service. Business cards are skipped when unset.
    pub render_url: Option<String>,
    /// Directory that generated files are written under.
    pub uploads_dir: PathBuf,
    /// URL prefix the uploads directory is served at.
    pub uploads_url_prefix: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_site_model: "gpt-4o".to_string(),
            tavily_url: "https://api.tavily.com/search".to_string(),
            pexels_url: "https://api.pexels.com/v1/search".to_string(),
            dashscope_base_url: "https://dashscope-intl.aliyuncs.com/api/v1".to_string(),
            logo_model: "wan2.5-t2i-preview".to_string(),
            logo_poll_interval: Duration::from_secs(3),
            logo_poll_attempts: 40,
            render_url: None,
            uploads_dir: PathBuf::from("./uploads"),
            uploads_url_prefix: "/uploads".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Load from environment variables, falling back to [`Default`] values.
    ///
    /// | Env Var                  | Default                                   |
    /// |--------------------------|-------------------------------------------|
    /// | `OPENAI_BASE_URL`        | `https://api.openai.com/v1`               |
    /// | `OPENAI_MODEL`           | `gpt-4o-mini`                             |
    /// | `OPENAI_SITE_MODEL`      | `gpt-4o`                                  |
    /// | `TAVILY_URL`             | `https://api.tavily.com/search`           |
    /// | `PEXELS_URL`             | `https://api.pexels.com/v1/search`        |
    /// | `DASHSCOPE_BASE_URL`     | `https://dashscope-intl.aliyuncs.com/api/v1` |
    /// | `LOGO_MODEL`             | `wan2.5-t2i-preview`                      |
    /// | `LOGO_POLL_INTERVAL_SECS`| `3`                                       |
    /// | `LOGO_POLL_ATTEMPTS`     | `40`                                      |
    /// | `PDF_RENDER_URL`         | unset                                     |
    /// | `UPLOADS_DIR`            | `./uploads`                               |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, default: String| std::env::var(name).unwrap_or(default);

        let logo_poll_interval = std::env::var("LOGO_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.logo_poll_interval);

        let logo_poll_attempts = std::env::var("LOGO_POLL_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.logo_poll_attempts);

        Self {
            openai_base_url: var("OPENAI_BASE_URL", defaults.openai_base_url),
            openai_model: var("OPENAI_MODEL", defaults.openai_model),
            openai_site_model: var("OPENAI_SITE_MODEL", defaults.openai_site_model),
            tavily_url: var("TAVILY_URL", defaults.tavily_url),
            pexels_url: var("PEXELS_URL", defaults.pexels_url),
            dashscope_base_url: var("DASHSCOPE_BASE_URL", defaults.dashscope_base_url),
            logo_model: var("LOGO_MODEL", defaults.logo_model),
            logo_poll_interval,
            logo_poll_attempts,
            render_url: std::env::var("PDF_RENDER_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            uploads_url_prefix: defaults.uploads_url_prefix,
        }
    }
}
