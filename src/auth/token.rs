use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::user::{UserId, UserRole};
use crate::error::{Result, RustyTodoError};

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// User ID
    pub id: UserId,
    /// Role name
    pub role: String,
    /// Expiration time (as UTC timestamp)
    pub exp: u64,
    /// Issued at (as UTC timestamp)
    pub iat: u64,
}

impl Claims {
    /// Creates claims for a user that expire `ttl` from now
    pub fn new(
        username: &str,
        user_id: UserId,
        role: UserRole,
        ttl: chrono::Duration,
    ) -> Result<Self> {
        if ttl <= chrono::Duration::zero() {
            return Err(RustyTodoError::ValidationError(
                "Token lifetime must be positive".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        Ok(Self {
            sub: username.to_string(),
            id: user_id,
            role: role.as_str().to_string(),
            exp: (now + ttl).timestamp() as u64,
            iat: now.timestamp() as u64,
        })
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.exp <= now_timestamp()
    }
}

/// Claims as read off the wire, before presence checks
#[derive(Deserialize)]
struct RawClaims {
    sub: Option<String>,
    id: Option<UserId>,
    role: Option<String>,
    exp: Option<u64>,
}

/// Why a token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    Signature,
    Expired,
    MissingClaims,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::Signature => write!(f, "signature mismatch"),
            Self::Expired => write!(f, "token expired"),
            Self::MissingClaims => write!(f, "missing claims"),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::Signature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::MissingRequiredClaim(_) => TokenError::MissingClaims,
            _ => TokenError::Malformed,
        }
    }
}

/// Who is calling, as proven by a validated token
///
/// Only `TokenManager::validate` builds one, and it lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    username: String,
    user_id: UserId,
    role: UserRole,
}

impl IdentityContext {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> UserRole {
        self.role
    }
}

/// Manages JWT token operations
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenManager {
    /// Creates a new token manager with a secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signs the given claims
    pub fn generate_token(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| RustyTodoError::SystemError(format!("Failed to generate token: {}", e)))
    }

    /// Mints a token for a user that is valid for `ttl`
    pub fn issue(
        &self,
        username: &str,
        user_id: UserId,
        role: UserRole,
        ttl: chrono::Duration,
    ) -> Result<String> {
        let claims = Claims::new(username, user_id, role, ttl)?;
        self.generate_token(&claims)
    }

    /// Verifies signature and expiry and extracts the caller's identity
    pub fn validate(&self, token: &str) -> std::result::Result<IdentityContext, TokenError> {
        let data = decode::<RawClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        // jsonwebtoken accepts exp == now; a token is only valid strictly before exp
        let exp = claims.exp.ok_or(TokenError::MissingClaims)?;
        if exp <= now_timestamp() {
            return Err(TokenError::Expired);
        }

        let username = claims.sub.filter(|s| !s.is_empty()).ok_or(TokenError::MissingClaims)?;
        let user_id = claims.id.ok_or(TokenError::MissingClaims)?;
        let role = claims
            .role
            .as_deref()
            .and_then(UserRole::parse)
            .ok_or(TokenError::MissingClaims)?;

        Ok(IdentityContext {
            username,
            user_id,
            role,
        })
    }
}

fn now_timestamp() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
