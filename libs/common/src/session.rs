//! Session tokens shared by the auth and blog services
//!
//! A session is a self-contained HS256 JWT carrying the user id and email.
//! The auth service issues tokens, every service verifies them, and nothing
//! is stored server-side: a token stays valid until it expires.

use anyhow::{Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cookie holding the signed session token
pub const TOKEN_COOKIE: &str = "token";
/// Cookie holding the display identity shown by the UI
pub const USER_COOKIE: &str = "user";

/// Default session lifetime: 30 days
pub const DEFAULT_TOKEN_EXPIRY: u64 = 30 * 24 * 60 * 60;

/// Longest accepted session lifetime: 365 days
pub const MAX_TOKEN_EXPIRY: u64 = 365 * 24 * 60 * 60;

const MIN_SECRET_LEN: usize = 32;

/// Session token configuration
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub token_expiry: u64,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret, at least 32 bytes (required)
    /// - `JWT_TOKEN_EXPIRY`: Token lifetime in seconds (default: 2592000, at most 31536000)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = match std::env::var("JWT_TOKEN_EXPIRY") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("Invalid JWT_TOKEN_EXPIRY {:?}: {}", value, e))?,
            Err(_) => DEFAULT_TOKEN_EXPIRY,
        };

        Self::new(secret, token_expiry)
    }

    /// Build a configuration, rejecting weak secrets and empty lifetimes
    pub fn new(secret: impl Into<String>, token_expiry: u64) -> Result<Self> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(anyhow!(
                "JWT_SECRET must be at least {} bytes long",
                MIN_SECRET_LEN
            ));
        }
        if token_expiry == 0 || token_expiry > MAX_TOKEN_EXPIRY {
            return Err(anyhow!(
                "JWT_TOKEN_EXPIRY must be between 1 and {} seconds",
                MAX_TOKEN_EXPIRY
            ));
        }

        Ok(Self {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email, doubling as the display identity
    pub email: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: &SessionConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Issue a token for the given user
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<IssuedToken> {
        let now = now_secs()?;
        let exp = now
            .checked_add(self.token_expiry)
            .ok_or_else(|| anyhow!("Token expiry overflows"))?;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            expires_at: timestamp(exp)?,
        })
    }

    /// Verify a token and return the session it carries
    pub fn verify(&self, token: &str) -> Result<Session> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        Ok(Session {
            user_id: claims.sub,
            email: claims.email,
            expires_at: timestamp(claims.exp)?,
        })
    }

    /// Token lifetime in seconds
    pub fn token_expiry(&self) -> u64 {
        self.token_expiry
    }
}

fn now_secs() -> Result<u64> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|e| anyhow!("Failed to get current time: {}", e))?
        .as_secs();
    Ok(now)
}

fn timestamp(secs: u64) -> Result<DateTime<Utc>> {
    let secs = i64::try_from(secs).map_err(|_| anyhow!("Timestamp out of range: {}", secs))?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| anyhow!("Timestamp out of range: {}", secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes";

    fn service() -> TokenService {
        TokenService::new(&SessionConfig::new(SECRET, DEFAULT_TOKEN_EXPIRY).unwrap())
    }

    #[test]
    fn test_issued_token_verifies_to_same_identity() {
        let service = service();
        let user_id = Uuid::new_v4();

        let issued = service.issue(user_id, "a@x.com").unwrap();
        let session = service.verify(&issued.token).unwrap();

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.email, "a@x.com");
        assert_eq!(session.expires_at, issued.expires_at);
    }

    #[test]
    fn test_token_lifetime_is_thirty_days() {
        let issued = service().issue(Uuid::new_v4(), "a@x.com").unwrap();
        let remaining = issued.expires_at - Utc::now();

        assert!(remaining <= chrono::Duration::days(30));
        assert!(remaining > chrono::Duration::days(29));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = TokenService::new(
            &SessionConfig::new("another-secret-that-is-long-enough!!", 60).unwrap(),
        );
        let issued = other.issue(Uuid::new_v4(), "a@x.com").unwrap();

        assert!(service().verify(&issued.token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(service().verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        assert!(SessionConfig::new("too-short", DEFAULT_TOKEN_EXPIRY).is_err());
    }

    #[test]
    fn test_expiry_is_bounded() {
        assert!(SessionConfig::new(SECRET, 0).is_err());
        assert!(SessionConfig::new(SECRET, MAX_TOKEN_EXPIRY).is_ok());
        assert!(SessionConfig::new(SECRET, MAX_TOKEN_EXPIRY + 1).is_err());
        assert!(SessionConfig::new(SECRET, u64::MAX).is_err());
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = SessionConfig::new(SECRET, 60).unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }

    #[test]
    #[serial]
    fn test_missing_secret_fails_closed() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }

        assert!(SessionConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_session_config_from_env() {
        unsafe {
            std::env::set_var("JWT_SECRET", SECRET);
            std::env::set_var("JWT_TOKEN_EXPIRY", "3600");
        }

        let config = SessionConfig::from_env().unwrap();
        assert_eq!(config.token_expiry, 3600);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_TOKEN_EXPIRY");
        }
    }

    #[test]
    #[serial]
    fn test_unparsable_expiry_is_rejected() {
        unsafe {
            std::env::set_var("JWT_SECRET", SECRET);
        }

        for value in ["thirty-days", "-1", "99999999999999999999999"] {
            unsafe {
                std::env::set_var("JWT_TOKEN_EXPIRY", value);
            }
            assert!(SessionConfig::from_env().is_err(), "accepted {}", value);
        }

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_TOKEN_EXPIRY");
        }
    }
}
