//! Domain availability through public RDAP registries.
//!
//! A `404` from the registry means the name is unregistered and a `200`
//! means it is taken. Anything else (network errors, rate limits, registry
//! outages) is no answer at all and is reported as an error.

use bob_core::domain_names::{TldAvailability, CHECKED_TLDS};

use crate::error::ProviderError;

const PROVIDER: &str = "rdap";

/// RDAP lookup endpoint for each checked TLD.
fn rdap_base(tld: &str) -> Option<&'static str> {
    match tld {
        "com" => Some("https://rdap.verisign.com/com/v1/domain/"),
        "co" => Some("https://rdap.cocca.co/api/v1/domain/"),
        "io" => Some("https://rdap.identity.digital/rdap/domain/"),
        _ => None,
    }
}

/// Map an RDAP lookup status to availability.
fn availability_from_status(status: reqwest::StatusCode) -> Result<bool, ProviderError> {
    match status {
        reqwest::StatusCode::NOT_FOUND => Ok(true),
        reqwest::StatusCode::OK => Ok(false),
        other => Err(ProviderError::Api {
            provider: PROVIDER,
            status: other.as_u16(),
            body: "no availability answer".to_string(),
        }),
    }
}

/// Fold per-TLD answers into one availability record. A TLD without an
/// answer counts as unavailable; a label with no answers at all is an error.
fn merge_lookups(
    label: &str,
    lookups: Vec<(&'static str, Result<bool, ProviderError>)>,
) -> Result<TldAvailability, ProviderError> {
    let mut availability = TldAvailability::default();
    let mut last_error = None;
    let mut answered = 0;
    for (tld, lookup) in lookups {
        match lookup {
            Ok(available) => {
                answered += 1;
                availability.set(tld, available);
            }
            Err(e) => {
                tracing::debug!(label, tld, error = %e, "RDAP lookup failed");
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) if answered == 0 => Err(e),
        _ => Ok(availability),
    }
}

#[derive(Clone)]
pub struct RdapChecker {
    client: reqwest::Client,
}

impl RdapChecker {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Check one label against every TLD concurrently.
    pub async fn check(&self, label: &str) -> Result<TldAvailability, ProviderError> {
        let lookups = CHECKED_TLDS.map(|tld| async move { (tld, self.check_tld(label, tld).await) });
        merge_lookups(label, futures::future::join_all(lookups).await)
    }

    async fn check_tld(&self, label: &str, tld: &str) -> Result<bool, ProviderError> {
        let base = rdap_base(tld)
            .ok_or_else(|| ProviderError::malformed(PROVIDER, format!("no registry for .{tld}")))?;
        let response = self
            .client
            .get(format!("{base}{label}.{tld}"))
            .send()
            .await?;
        availability_from_status(response.status())
    }
}
