/// Session tokens and password hashes
///
/// Tokens are HS256 JWTs whose subject is the numeric catalog user id.
/// Access tokens authorize API calls; refresh tokens only mint new access tokens.
use crate::error::{Result, ServerError};
use cadence_core::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longer configured lifetimes are clamped to this
const MAX_LIFETIME_DAYS: u64 = 3650;

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish_non_exhaustive()
    }
}

/// Registered claims carried by every token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Catalog user id, as a decimal string
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl Claims {
    fn issue(user_id: UserId, token_type: TokenType, now: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            token_type,
        }
    }

    /// The user this token speaks for
    ///
    /// Row ids start at 1, so zero, negative and non-numeric subjects are
    /// never issued by this service.
    pub fn user_id(&self) -> Result<UserId> {
        match self.sub.parse::<UserId>() {
            Ok(id) if id.get() > 0 => Ok(id),
            _ => Err(ServerError::Auth("Invalid token subject".to_string())),
        }
    }
}

impl AuthService {
    pub fn new(secret: String, access_expiration_hours: u64, refresh_expiration_days: u64) -> Self {
        let hours = access_expiration_hours.min(MAX_LIFETIME_DAYS * 24) as i64;
        let days = refresh_expiration_days.min(MAX_LIFETIME_DAYS) as i64;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_lifetime: Duration::hours(hours),
            refresh_lifetime: Duration::days(days),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    pub fn create_access_token(&self, user_id: UserId) -> Result<String> {
        self.sign(Claims::issue(user_id, TokenType::Access, Utc::now(), self.access_lifetime))
    }

    pub fn create_refresh_token(&self, user_id: UserId) -> Result<String> {
        self.sign(Claims::issue(user_id, TokenType::Refresh, Utc::now(), self.refresh_lifetime))
    }

    /// Check signature and expiry, then decode
    ///
    /// Does not look at the token type or the subject.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;
        if claims.iat > claims.exp {
            return Err(ServerError::Auth("Token issued after it expires".to_string()));
        }
        Ok(claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<UserId> {
        self.verify_as(token, TokenType::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId> {
        self.verify_as(token, TokenType::Refresh)
    }

    fn verify_as(&self, token: &str, expected: TokenType) -> Result<UserId> {
        let claims = self.verify_token(token)?;
        if claims.token_type != expected {
            return Err(ServerError::Auth(format!(
                "Expected {expected:?} token, got {:?}",
                claims.token_type
            )));
        }
        claims.user_id()
    }

    fn sign(&self, claims: Claims) -> Result<String> {
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}
