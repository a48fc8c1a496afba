use std::path::PathBuf;
use std::time::Duration;

use bob_pipeline::WorkflowConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `600`). Must exceed the
    /// longest chain of generator calls a single action makes.
    pub request_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Secret the per-user API key cipher is derived from.
    pub encryption_secret: String,
    /// Directory generated files are written to and served from.
    pub uploads_dir: PathBuf,
    /// URL path the uploads directory is served at (default: `/uploads`).
    pub public_base_path: String,
    /// Upper bound on a single generator call in seconds (default: `180`).
    pub generator_timeout_secs: u64,
    /// Only accept domain names from the latest offered batch.
    pub require_offered_domain: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `600`                   |
    /// | `ENCRYPTION_SECRET`      | **required**            |
    /// | `UPLOADS_DIR`            | `./uploads`             |
    /// | `PUBLIC_BASE_PATH`       | `/uploads`              |
    /// | `GENERATOR_TIMEOUT_SECS` | `180`                   |
    /// | `REQUIRE_OFFERED_DOMAIN` | `false`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let encryption_secret = std::env::var("ENCRYPTION_SECRET")
            .expect("ENCRYPTION_SECRET must be set in the environment");
        assert!(
            !encryption_secret.is_empty(),
            "ENCRYPTION_SECRET must not be empty"
        );

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let public_base_path = std::env::var("PUBLIC_BASE_PATH")
            .map(|p| format!("/{}", p.trim_matches('/')))
            .unwrap_or_else(|_| "/uploads".into());

        let generator_timeout_secs: u64 = std::env::var("GENERATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("GENERATOR_TIMEOUT_SECS must be a valid u64");

        let require_offered_domain = std::env::var("REQUIRE_OFFERED_DOMAIN")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            encryption_secret,
            uploads_dir,
            public_base_path,
            generator_timeout_secs,
            require_offered_domain,
        }
    }

    /// Engine settings derived from this configuration.
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            generator_timeout: Duration::from_secs(self.generator_timeout_secs),
            require_offered_domain: self.require_offered_domain,
            ..WorkflowConfig::default()
        }
    }
}
