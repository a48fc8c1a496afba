//! Per-request API credentials for external services.
//!
//! Credentials are resolved once per request (user key first, then the
//! system-wide key) and handed to each generator call. Nothing here holds a
//! shared client or global key.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// External services that need an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    OpenAi,
    Pexels,
    Tavily,
    DashScope,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::OpenAi,
        Service::Pexels,
        Service::Tavily,
        Service::DashScope,
    ];

    /// Services a user may supply a personal key for.
    pub const USER_CONFIGURABLE: [Service; 2] = [Service::OpenAi, Service::Pexels];

    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "pexels" => Ok(Self::Pexels),
            "tavily" => Ok(Self::Tavily),
            "dashscope" => Ok(Self::DashScope),
            _ => Err(CoreError::Validation(format!("Unknown service '{s}'"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Pexels => "pexels",
            Self::Tavily => "tavily",
            Self::DashScope => "dashscope",
        }
    }

    /// Environment variable holding the system-wide key.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Pexels => "PEXELS_API_KEY",
            Self::Tavily => "TAVILY_API_KEY",
            Self::DashScope => "DASHSCOPE_API_KEY",
        }
    }
}

/// An API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    User,
    System,
}

/// The keys available to one request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    keys: HashMap<Service, (ApiKey, KeySource)>,
}

impl Credentials {
    pub fn insert(&mut self, service: Service, key: ApiKey, source: KeySource) {
        self.keys.insert(service, (key, source));
    }

    pub fn get(&self, service: Service) -> Option<&ApiKey> {
        self.keys.get(&service).map(|(key, _)| key)
    }

    pub fn source(&self, service: Service) -> Option<KeySource> {
        self.keys.get(&service).map(|(_, source)| *source)
    }

    /// Fetch a key or fail with a message naming the missing service.
    pub fn require(&self, service: Service) -> Result<&ApiKey, String> {
        self.get(service).ok_or_else(|| {
            format!(
                "No API key configured for {}. Add one in settings or set {}",
                service.as_str(),
                service.env_var()
            )
        })
    }
}

/// System-wide fallback keys, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct SystemCredentials {
    keys: HashMap<Service, ApiKey>,
}

impl SystemCredentials {
    /// Load fallback keys from `<SERVICE>_API_KEY` environment variables.
    /// Missing or empty variables are skipped.
    pub fn from_env() -> Self {
        let keys = Service::ALL
            .into_iter()
            .filter_map(|service| {
                std::env::var(service.env_var())
                    .ok()
                    .and_then(ApiKey::new)
                    .map(|key| (service, key))
            })
            .collect();
        Self { keys }
    }

    pub fn with_key(mut self, service: Service, key: &str) -> Self {
        if let Some(key) = ApiKey::new(key) {
            self.keys.insert(service, key);
        }
        self
    }

    pub fn get(&self, service: Service) -> Option<&ApiKey> {
        self.keys.get(&service)
    }
}

/// Merge user keys over system keys.
///
/// `user_keys` holds already-decrypted user keys; any service without one
/// falls back to the system key, and services with neither are left absent.
pub fn merge_credentials(
    user_keys: &HashMap<Service, ApiKey>,
    system: &SystemCredentials,
) -> Credentials {
    let mut credentials = Credentials::default();
    for service in Service::ALL {
        if let Some(key) = user_keys.get(&service) {
            credentials.insert(service, key.clone(), KeySource::User);
        } else if let Some(key) = system.get(service) {
            credentials.insert(service, key.clone(), KeySource::System);
        }
    }
    credentials
}
