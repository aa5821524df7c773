//! Session tokens signed as JWTs.
//!
//! A token only proves which session it belongs to: the `jti` claim is the
//! session id and `sub` the identity id. Whether the session is still open
//! (and which role it carries) is decided by the server-side session slot.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Session id
    pub jti: String,
}

impl Claims {
    /// Parses the identity id from `sub`.
    pub fn identity_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }

    /// Parses the session id from `jti`.
    pub fn session_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.jti).map_err(|_| JwtError::InvalidToken)
    }
}

/// Signing and validation settings for session tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    pub access_token_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Creates an RS256 config from a PEM key pair.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: Algorithm::RS256,
            access_token_expiry_secs,
            leeway_secs,
        })
    }

    /// HS256 config with a shared secret. Test use only.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            access_token_expiry_secs: 900,
            leeway_secs: 0,
        }
    }

    /// Issues a token for `identity_id` bound to `session_id`.
    pub fn issue_session_token(
        &self,
        identity_id: Uuid,
        session_id: Uuid,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity_id.to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: session_id.to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates signature and expiry, returning the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new_for_testing("union_portal_test_secret_0123456789")
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let config = config();
        let identity_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let token = config.issue_session_token(identity_id, session_id).unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(claims.identity_id().unwrap(), identity_id);
        assert_eq!(claims.session_id().unwrap(), session_id);
    }

    #[test]
    fn test_expiry_matches_configuration() {
        let config = config();
        let token = config
            .issue_session_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, config.access_token_expiry_secs);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = config();
        config.access_token_expiry_secs = -120;

        let token = config
            .issue_session_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        assert!(matches!(
            config.validate_token(&token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = JwtConfig::new_for_testing("another_secret_entirely_0123456789")
            .issue_session_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        assert!(matches!(
            config().validate_token(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert!(config().validate_token("not_a_jwt").is_err());
    }

    #[test]
    fn test_non_uuid_subject_is_invalid() {
        let claims = Claims {
            sub: "admin".to_string(),
            exp: 0,
            iat: 0,
            jti: Uuid::new_v4().to_string(),
        };
        assert!(matches!(claims.identity_id(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_invalid_rsa_key_is_reported() {
        let result = JwtConfig::new("not a key", "not a key", 3600, DEFAULT_LEEWAY_SECS);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
    }
}
