//! Access tokens for the identity gate.
//!
//! Tokens are HS256 JWTs issued by `bob-api` whose `sub` claim is the user
//! id. There are no refresh tokens; clients log in again when one expires.

use bob_core::types::DbId;
use chrono::Utc;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The `iss` claim on every token this server issues.
pub const TOKEN_ISSUER: &str = "bob-api";

/// Default token lifetime in minutes (one day).
const DEFAULT_EXPIRY_MINS: i64 = 24 * 60;

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: DbId,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in minutes (default: 1440).
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `1440`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the expiry is not a
    /// positive integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|v| {
                v.parse::<i64>()
                    .ok()
                    .filter(|mins| *mins > 0)
                    .expect("JWT_ACCESS_EXPIRY_MINS must be a positive integer")
            })
            .unwrap_or(DEFAULT_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Sign a token for `user_id`.
    pub fn issue(&self, user_id: DbId) -> Result<IssuedToken, JwtError> {
        let expires_in = self.access_token_expiry_mins * 60;
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iss: TOKEN_ISSUER.to_string(),
            iat,
            exp: iat + expires_in,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(IssuedToken { token, expires_in })
    }

    /// Check signature, expiry and issuer, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[TOKEN_ISSUER]);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(config: &JwtConfig, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let config = config("unit-test-secret");
        let issued = config.issue(42).unwrap();

        assert_eq!(issued.expires_in, 15 * 60);
        let claims = config.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, issued.expires_in);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("unit-test-secret");
        // Well past the default 60-second leeway.
        let now = Utc::now().timestamp();
        let token = sign(
            &config,
            &Claims {
                sub: 1,
                iss: TOKEN_ISSUER.into(),
                iat: now - 600,
                exp: now - 300,
            },
        );

        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = config("unit-test-secret");
        let now = Utc::now().timestamp();
        let token = sign(
            &config,
            &Claims {
                sub: 1,
                iss: "someone-else".into(),
                iat: now,
                exp: now + 300,
            },
        );

        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = config("secret-alpha").issue(1).unwrap().token;
        assert!(config("secret-bravo").verify(&token).is_err());
    }
}
