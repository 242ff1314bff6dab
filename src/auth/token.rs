use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The class of a token. Access and refresh tokens share one claims shape and
/// differ only in this tag and their lifetime; verification always asserts the
/// expected class explicitly so neither kind can stand in for the other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// Token class, serialized as `"type"` on the wire.
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Per-token unique id. Keeps two tokens minted within the same clock
    /// second from being byte-identical.
    pub jti: Uuid,
}

/// Why a token failed verification. Kept for internal diagnostics; callers of
/// the HTTP API see a uniform 401 whatever the cause (see `From<TokenError>
/// for AppError`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The signature does not match the process secret.
    InvalidSignature,
    /// The token's expiry has passed.
    Expired,
    /// The embedded class tag is not the one the call site expected.
    WrongClass,
    /// The token is not a decodable JWT at all.
    Malformed,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::InvalidSignature => write!(f, "invalid signature"),
            TokenError::Expired => write!(f, "token expired"),
            TokenError::WrongClass => write!(f, "wrong token class"),
            TokenError::Malformed => write!(f, "malformed token"),
        }
    }
}

/// The access/refresh pair returned by login and refresh exchanges.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Issues and verifies signed tokens.
///
/// Built once at startup from the configured secret and lifetimes; the keys
/// are read-only afterwards and safe to share across concurrent requests.
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenManager {
    pub fn new(secret: &str, access_minutes: i64, refresh_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_minutes),
            refresh_ttl: Duration::days(refresh_days),
        }
    }

    /// Mints a short-lived access token for `user_id`.
    pub fn issue_access(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue(user_id, TokenKind::Access, self.access_ttl)
    }

    /// Mints a longer-lived refresh token for `user_id`.
    pub fn issue_refresh(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Mints a fresh access/refresh pair. Used by login and by every refresh
    /// exchange: refresh tokens rotate, they are never reissued verbatim.
    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        Ok(TokenPair::new(
            self.issue_access(user_id)?,
            self.issue_refresh(user_id)?,
        ))
    }

    fn issue(&self, user_id: Uuid, kind: TokenKind, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to sign token: {}", e)))
    }

    /// Verifies signature and expiry, then asserts the token class matches
    /// `expected`. The class is never inferred from context: an access token
    /// presented where a refresh token is expected fails with `WrongClass`,
    /// and vice versa.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            },
        )?;

        if data.claims.kind != expected {
            return Err(TokenError::WrongClass);
        }

        Ok(data.claims)
    }
}
