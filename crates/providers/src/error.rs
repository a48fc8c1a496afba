//! Errors from the provider HTTP layer.

use bob_core::generators::GeneratorError;

/// Errors from a provider API call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The response arrived but did not have the expected shape.
    #[error("{provider} returned an unusable response: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },

    #[error("local storage failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    pub fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            provider,
            message: message.into(),
        }
    }
}

impl From<ProviderError> for GeneratorError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Malformed { .. } => GeneratorError::Malformed(err.to_string()),
            ProviderError::Request(_) | ProviderError::Api { .. } | ProviderError::Io(_) => {
                GeneratorError::Request(err.to_string())
            }
        }
    }
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`ProviderError::Api`] containing the status
/// and body text on failure.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(provider, response).await?;
    Ok(response.json::<T>().await?)
}
