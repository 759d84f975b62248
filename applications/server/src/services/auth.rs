/// Authentication service - JWT and password handling
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vibe_core::UserId;

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
});

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    token_expiration: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Why a bearer token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Authorization token is missing")]
    Missing,

    #[error("Authorization token is malformed")]
    Malformed,

    #[error("Authorization token has expired")]
    Expired,

    #[error("Authorization token signature is invalid")]
    InvalidSignature,

    #[error("User for this token no longer exists")]
    UnknownUser,
}

impl AuthService {
    pub fn new(secret: String, token_expiration_days: u64, bcrypt_cost: u32) -> Self {
        Self {
            secret,
            token_expiration: Duration::days(token_expiration_days as i64),
            bcrypt_cost,
        }
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Issue a signed token for `user_id`
    pub fn issue_token(&self, user_id: UserId) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.token_expiration;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify a token and return the user it was issued for
    ///
    /// Does not check that the user still exists; the middleware does.
    pub fn verify_token(&self, token: &str) -> std::result::Result<UserId, TokenError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        token_data
            .claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Malformed)
    }
}

/// Check an email address and return its normalized (trimmed, lowercased) form
pub fn validate_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ServerError::BadRequest("Email is required".to_string()));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(ServerError::BadRequest("Invalid email format".to_string()));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServerError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
