//! JWT bearer-token encoding and verification.
//!
//! Tokens are HS256-signed JWTs carrying a [`TokenPayload`]: a random session
//! id, a snapshot of the subject user, and issue/expiry instants. Access and
//! refresh tokens share the same shape and differ only in lifetime; the
//! refresh token's payload id doubles as the key of its server-side session.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskdeck_core::types::{DbId, Timestamp};
use uuid::Uuid;

/// Failure conditions of token verification and signing.
///
/// `Expired` and `Invalid` are deliberately distinct: an expired token means
/// "log in again", a tampered or malformed one may mean forgery.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Valid signature, but the expiry instant has passed.
    #[error("token has expired")]
    Expired,

    /// Malformed token, signature mismatch, or unparseable claims.
    #[error("token is invalid")]
    Invalid,

    /// The signing key rejected the encode operation.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Snapshot of the subject user embedded in every token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: DbId,
    pub email: String,
    pub username: String,
}

impl From<&taskdeck_db::models::user::User> for TokenUser {
    fn from(user: &taskdeck_db::models::user::User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

/// Decoded token contents.
///
/// `id` is a per-token random UUID; for refresh tokens it is also the session
/// key in the session store. Timestamps carry second precision (the JWT claim
/// granularity), so a payload read back from a token equals the one returned
/// at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    pub id: Uuid,
    pub user: TokenUser,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Stateless signing/verification of bearer tokens.
///
/// Implementations must fail closed: any signature mismatch, malformed
/// structure, or past expiry is an error, never a partial result.
pub trait TokenCodec: Send + Sync {
    /// Mint a token for `user` expiring `ttl` from now. Returns the encoded
    /// string together with the payload it carries.
    fn create_token(
        &self,
        user: &TokenUser,
        ttl: chrono::Duration,
    ) -> Result<(String, TokenPayload), TokenError>;

    /// Decode and verify a token, returning its payload.
    fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError>;
}

// ---------------------------------------------------------------------------
// JwtConfig
// ---------------------------------------------------------------------------

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret for signing and verification.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read signing configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is missing or empty, or when an expiry
    /// variable is set but not numeric.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET is required");
        assert!(!secret.is_empty(), "JWT_SECRET is set but empty");

        let access_token_expiry_mins: i64 = crate::config::env_or("JWT_ACCESS_EXPIRY_MINS", "15")
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be an integer");

        let refresh_token_expiry_days: i64 = crate::config::env_or("JWT_REFRESH_EXPIRY_DAYS", "7")
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be an integer");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }

    /// Access token lifetime as a duration.
    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expiry_mins)
    }

    /// Refresh token lifetime as a duration.
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_expiry_days)
    }
}

// ---------------------------------------------------------------------------
// JwtCodec
// ---------------------------------------------------------------------------

/// Claims layout of the signed token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Token id; doubles as the session key for refresh tokens.
    jti: String,
    /// Subject, the user's database id.
    sub: DbId,
    email: String,
    username: String,
    /// Issued-at, Unix seconds.
    iat: i64,
    /// Expiry, Unix seconds.
    exp: i64,
}

/// HS256 implementation of [`TokenCodec`].
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    fn payload_from_claims(claims: &Claims) -> Result<TokenPayload, TokenError> {
        let id = Uuid::parse_str(&claims.jti).map_err(|_| TokenError::Invalid)?;
        let issued_at =
            chrono::DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Invalid)?;
        let expires_at =
            chrono::DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;
        Ok(TokenPayload {
            id,
            user: TokenUser {
                id: claims.sub,
                email: claims.email.clone(),
                username: claims.username.clone(),
            },
            issued_at,
            expires_at,
        })
    }
}

impl TokenCodec for JwtCodec {
    fn create_token(
        &self,
        user: &TokenUser,
        ttl: chrono::Duration,
    ) -> Result<(String, TokenPayload), TokenError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            jti: Uuid::new_v4().to_string(),
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        let payload = Self::payload_from_claims(&claims)?;
        Ok((token, payload))
    }

    fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let mut validation = Validation::default(); // HS256
        // The default 60s leeway would accept a token for a minute past its
        // expiry instant; expiry must be exact.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        Self::payload_from_claims(&data.claims)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
