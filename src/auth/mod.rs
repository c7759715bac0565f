use std::collections::HashSet;
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// Header carrying an unverified caller id when trusted-header auth is enabled
pub const TRUSTED_USER_HEADER: &str = "x-user-id";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// `None` when `now + ttl` falls outside the representable time range
    pub fn new(sub: impl Into<String>, ttl: Duration) -> Option<Self> {
        let now = Utc::now();
        let exp = now.checked_add_signed(ttl)?;
        Some(Self {
            sub: sub.into(),
            exp: Some(exp.timestamp()),
            iat: Some(now.timestamp()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("No credentials provided")]
    NoCredentials,

    #[error("Auth configuration error: {0}")]
    Configuration(String),
}

/// Decides who the caller is from request credentials.
///
/// A bearer token always wins: if one is sent it must verify, and a bad token
/// never falls back to the trusted header.
pub struct IdentityResolver {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    allow_trusted_header: bool,
}

impl IdentityResolver {
    pub fn new(secret: &str, algorithm: &str, allow_trusted_header: bool) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Configuration("JWT secret not configured".to_string()));
        }

        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| AuthError::Configuration(format!("unknown algorithm '{}'", algorithm)))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::Configuration(format!(
                "algorithm {:?} needs a key pair, only HMAC algorithms are supported",
                algorithm
            )));
        }

        // Only `sub` is mandatory; exp/nbf are still checked when present.
        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims = HashSet::from(["sub".to_string()]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            allow_trusted_header,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, &security.jwt_algorithm, security.allow_trusted_header)
    }

    pub fn allows_trusted_header(&self) -> bool {
        self.allow_trusted_header
    }

    /// Resolve the caller's user id from the raw `Authorization` and `X-User-Id` values.
    pub fn resolve(&self, authorization: Option<&str>, trusted_user: Option<&str>) -> Result<String, AuthError> {
        // An empty header is the same as no header
        if let Some(authorization) = authorization.filter(|v| !v.trim().is_empty()) {
            let token = bearer_token(authorization)?;
            return self.verify(token);
        }

        match trusted_user {
            Some(user_id) if self.allow_trusted_header && !user_id.is_empty() => Ok(user_id.to_string()),
            _ => Err(AuthError::NoCredentials),
        }
    }

    /// Verify a raw JWT and return its subject
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("Missing 'sub' in token".to_string()));
        }
        Ok(data.claims.sub)
    }

    /// Mint a signed token for `sub`, valid for `ttl`
    pub fn issue_token(&self, sub: &str, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims::new(sub, ttl)
            .ok_or_else(|| AuthError::Configuration(format!("token lifetime {} is out of range", ttl)))?;
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Configuration(format!("JWT generation error: {}", e)))
    }
}

fn bearer_token(authorization: &str) -> Result<&str, AuthError> {
    // Exactly one space between scheme and token
    let Some((scheme, token)) = authorization.split_once(' ').filter(|(_, token)| !token.contains(' ')) else {
        return Err(AuthError::InvalidToken(
            "Authorization header must be '<scheme> <token>'".to_string(),
        ));
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken("Invalid auth scheme".to_string()));
    }
    Ok(token)
}
