//! Per-request credential resolution and per-user key management.

use std::collections::HashMap;
use std::sync::Arc;

use bob_core::credentials::{merge_credentials, ApiKey, Credentials, Service, SystemCredentials};
use bob_core::crypto::SecretCipher;
use bob_core::error::CoreError;
use bob_core::types::DbId;

use crate::store::{StoreError, WorkflowStore};

/// Resolves the keys available to one user, user key first.
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn WorkflowStore>,
    cipher: SecretCipher,
    system: SystemCredentials,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn WorkflowStore>, cipher: SecretCipher, system: SystemCredentials) -> Self {
        Self {
            store,
            cipher,
            system,
        }
    }

    /// Build the credential set for a request.
    ///
    /// Stored keys that fail to decrypt (for example after the encryption
    /// secret was rotated) are skipped and the system key is used instead.
    pub async fn resolve(&self, user_id: DbId) -> Result<Credentials, CoreError> {
        let stored = self
            .store
            .list_credentials(user_id)
            .await
            .map_err(|e| persistence("resolve credentials", e))?;

        let mut user_keys = HashMap::new();
        for row in stored {
            let Ok(service) = Service::from_str_db(&row.service) else {
                continue;
            };
            match self.cipher.decrypt(&row.ciphertext) {
                Ok(plain) => {
                    if let Some(key) = ApiKey::new(plain) {
                        user_keys.insert(service, key);
                    }
                }
                Err(e) => {
                    tracing::warn!(user_id, service = service.as_str(), error = %e, "Ignoring undecryptable user key");
                }
            }
        }

        Ok(merge_credentials(&user_keys, &self.system))
    }

    /// Services for which the user has stored a personal key.
    pub async fn configured_services(&self, user_id: DbId) -> Result<Vec<Service>, CoreError> {
        let stored = self
            .store
            .list_credentials(user_id)
            .await
            .map_err(|e| persistence("load settings", e))?;
        Ok(stored
            .iter()
            .filter_map(|row| Service::from_str_db(&row.service).ok())
            .collect())
    }

    /// Store or clear personal keys. `None` leaves a service untouched; an
    /// empty string clears it.
    pub async fn update_keys(
        &self,
        user_id: DbId,
        updates: &[(Service, Option<String>)],
    ) -> Result<(), CoreError> {
        for (service, value) in updates {
            if !Service::USER_CONFIGURABLE.contains(service) {
                return Err(CoreError::Validation(format!(
                    "A personal key cannot be set for {}",
                    service.as_str()
                )));
            }
            let Some(value) = value else {
                continue;
            };
            match ApiKey::new(value.as_str()) {
                Some(key) => {
                    let ciphertext = self.cipher.encrypt(key.expose())?;
                    self.store
                        .upsert_credential(user_id, service.as_str(), &ciphertext)
                        .await
                        .map_err(|e| persistence("update settings", e))?;
                }
                None => {
                    self.store
                        .delete_credential(user_id, service.as_str())
                        .await
                        .map_err(|e| persistence("update settings", e))?;
                }
            }
            tracing::info!(user_id, service = service.as_str(), "User API key updated");
        }
        Ok(())
    }
}

fn persistence(action: &'static str, err: StoreError) -> CoreError {
    CoreError::Persistence {
        action,
        message: err.to_string(),
    }
}
