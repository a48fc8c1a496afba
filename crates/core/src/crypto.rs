//! AES-256-GCM encryption for per-user API keys at rest.
//!
//! The cipher key is the SHA-256 digest of the server's encryption secret.
//! Ciphertexts are stored as lowercase hex of `nonce (12 bytes) || ciphertext`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::Rng;

use crate::error::CoreError;
use crate::hashing::{hex_decode, hex_encode, sha256_bytes};

/// Length of the AES-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Encrypts and decrypts short secrets with a server-wide key.
#[derive(Clone)]
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretCipher")
    }
}

impl SecretCipher {
    /// Derive a cipher from the configured encryption secret.
    pub fn new(secret: &str) -> Result<Self, CoreError> {
        if secret.is_empty() {
            return Err(CoreError::Internal(
                "Encryption secret must not be empty".to_string(),
            ));
        }
        let digest = sha256_bytes(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Encrypt `plaintext` with a fresh random nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CoreError::Internal(format!("Secret encryption failed: {e}")))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(hex_encode(out))
    }

    /// Decrypt a value produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, encoded: &str) -> Result<String, CoreError> {
        let bytes = hex_decode(encoded)
            .ok_or_else(|| CoreError::Validation("Encrypted secret is not valid hex".into()))?;
        if bytes.len() <= NONCE_LEN {
            return Err(CoreError::Validation(
                "Encrypted secret is too short".to_string(),
            ));
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CoreError::Validation("Encrypted secret could not be decrypted".into()))?;
        String::from_utf8(plaintext)
            .map_err(|_| CoreError::Validation("Decrypted secret is not UTF-8".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt() {
        let cipher = SecretCipher::new("server-secret").unwrap();
        let encrypted = cipher.encrypt("sk-test-123").unwrap();
        assert_ne!(encrypted, "sk-test-123");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "sk-test-123");
    }

    #[test]
    fn nonces_differ_between_encryptions() {
        let cipher = SecretCipher::new("server-secret").unwrap();
        assert_ne!(
            cipher.encrypt("same").unwrap(),
            cipher.encrypt("same").unwrap()
        );
    }

    #[test]
    fn wrong_secret_fails() {
        let a = SecretCipher::new("secret-alpha").unwrap();
        let b = SecretCipher::new("secret-bravo").unwrap();
        let encrypted = a.encrypt("sk-test").unwrap();
        assert!(b.decrypt(&encrypted).is_err());
    }

    #[test]
    fn garbage_input_fails() {
        let cipher = SecretCipher::new("server-secret").unwrap();
        assert!(cipher.decrypt("not hex").is_err());
        assert!(cipher.decrypt("abcd").is_err());
    }

    #[test]
    fn empty_secret_rejected() {
        assert!(SecretCipher::new("").is_err());
    }
}
