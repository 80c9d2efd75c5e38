//! Signup, login and session lookup
//!
//! Sessions live entirely in signed tokens held by the client. The manager
//! only creates users, checks credentials and issues or verifies tokens;
//! it never records a session server-side.

use std::sync::Arc;

use common::session::{IssuedToken, Session, TokenService};
use tracing::{debug, info, warn};

use crate::{
    error::AuthError,
    models::{LoginRequest, NewUser, SignupRequest},
    password,
    rate_limiter::RateLimiter,
    repositories::UserStore,
};

/// Outcome of a successful signup or login
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Display identity (the user's email)
    pub user: String,
    /// Signed session token
    pub token: IssuedToken,
}

/// Session manager backing the auth endpoints
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    rate_limiter: RateLimiter,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, rate_limiter: RateLimiter) -> Self {
        Self {
            users,
            tokens,
            rate_limiter,
        }
    }

    /// Register a user and open a session for them
    pub async fn signup(&self, request: SignupRequest) -> Result<Authenticated, AuthError> {
        let request = request.validated().map_err(AuthError::Validation)?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            info!("Signup rejected, email already registered: {}", request.email);
            return Err(AuthError::Conflict);
        }

        let password_hash = password::hash_password(request.password).await?;

        // The unique index still catches a concurrent signup for the same email
        let user = self
            .users
            .create(&NewUser {
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        info!("User signed up: {} ({})", user.username, user.id);

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(Authenticated {
            user: user.email,
            token,
        })
    }

    /// Check credentials and open a session
    pub async fn login(&self, request: LoginRequest) -> Result<Authenticated, AuthError> {
        let request = request.validated().map_err(AuthError::Validation)?;

        if !self.rate_limiter.is_allowed(&request.email).await {
            return Err(AuthError::TooManyAttempts);
        }

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                info!("Login attempt for unknown email: {}", request.email);
                AuthError::NotFound
            })?;

        if !password::verify_password(request.password, user.password_hash.clone()).await? {
            warn!("Invalid password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        self.rate_limiter.reset(&request.email).await;
        info!("User logged in: {}", user.id);

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(Authenticated {
            user: user.email,
            token,
        })
    }

    /// Resolve the session carried by a token, if it is valid and unexpired
    pub fn current_user(&self, token: Option<&str>) -> Option<Session> {
        let token = token?;
        match self.tokens.verify(token) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Ignoring invalid session token: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rate_limiter::RateLimiterConfig, repositories::user::memory::MemoryUserStore};
    use common::session::{DEFAULT_TOKEN_EXPIRY, SessionConfig};

    fn manager() -> (SessionManager, Arc<MemoryUserStore>, TokenService) {
        let store = Arc::new(MemoryUserStore::default());
        let tokens = TokenService::new(
            &SessionConfig::new("session-manager-test-secret-32-bytes!", DEFAULT_TOKEN_EXPIRY)
                .unwrap(),
        );
        let manager = SessionManager::new(
            store.clone(),
            tokens.clone(),
            RateLimiter::new(RateLimiterConfig::default()),
        );
        (manager, store, tokens)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            username: "alice".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login_returns_token_for_same_user() {
        let (manager, store, tokens) = manager();

        let signed_up = manager.signup(signup_request("a@x.com")).await.unwrap();
        assert_eq!(signed_up.user, "a@x.com");
        assert_eq!(store.count().await, 1);

        let logged_in = manager
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        let first = tokens.verify(&signed_up.token.token).unwrap();
        let second = tokens.verify(&logged_in.token.token).unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_a_conflict() {
        let (manager, store, _) = manager();

        manager.signup(signup_request("a@x.com")).await.unwrap();
        let result = manager.signup(signup_request("A@X.com")).await;

        assert!(matches!(result, Err(AuthError::Conflict)));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_signup_creates_nothing() {
        let (manager, store, _) = manager();

        let result = manager.signup(signup_request("not-an-email")).await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_current_user_rejects_missing_and_forged_tokens() {
        let (manager, _, _) = manager();

        assert!(manager.current_user(None).is_none());
        assert!(manager.current_user(Some("forged.token.value")).is_none());

        let signed_up = manager.signup(signup_request("a@x.com")).await.unwrap();
        let session = manager
            .current_user(Some(&signed_up.token.token))
            .unwrap();
        assert_eq!(session.email, "a@x.com");
    }
}
