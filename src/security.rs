//! Credential and token primitives.
//!
//! Password hashing is argon2id with a per-call random salt; the hash and the
//! verification both run in `spawn_blocking` because they are CPU-intensive
//! and would stall the async runtime. Tokens are HS256 JWTs carrying the
//! user's email claim with a configured expiry.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::config::SecurityConfig;

fn build_argon2(config: Option<&SecurityConfig>) -> Result<Argon2<'static>> {
    let Some(cfg) = config else {
        return Ok(Argon2::default());
    };

    let params = Params::new(
        cfg.argon2_memory_cost_kib,
        cfg.argon2_time_cost,
        cfg.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password_sync(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = build_argon2(config)?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

pub async fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let password = password.to_string();
    let config = config.cloned();
    task::spawn_blocking(move || hash_password_sync(&password, config.as_ref()))
        .await
        .context("Password hashing task panicked")?
}

/// Compares a plaintext password against a stored hash.
pub async fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&stored_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        let argon2 = Argon2::default();
        Ok::<bool, anyhow::Error>(
            argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub exp: i64,
}

/// Issues and verifies signed, time-limited access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl_seconds: i64,
}

impl TokenIssuer {
    #[must_use]
    pub const fn new(secret: String, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl_seconds,
        }
    }

    pub fn issue(&self, email: &str) -> Result<String> {
        let claims = TokenClaims {
            email: email.to_string(),
            exp: chrono::Utc::now().timestamp() + self.ttl_seconds,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign access token")
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid access token")?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let hash = hash_password("sekret", None).await.unwrap();
        assert!(verify_password("sekret", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let a = hash_password("sekret", None).await.unwrap();
        let b = hash_password("sekret", None).await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn token_round_trip() {
        let issuer = TokenIssuer::new("test-secret".to_string(), 3600);
        let token = issuer.issue("toby@dundermifflin.com").unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.email, "toby@dundermifflin.com");
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn tampered_token_fails() {
        let issuer = TokenIssuer::new("test-secret".to_string(), 3600);
        let other = TokenIssuer::new("other-secret".to_string(), 3600);
        let token = issuer.issue("toby@dundermifflin.com").unwrap();
        assert!(other.verify(&token).is_err());
    }
}
