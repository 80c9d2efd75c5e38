//! User model and the auth request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{normalize_email, validate_email, validate_password, validate_username};

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Request for user signup
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Validate every field and normalize the email
    pub fn validated(mut self) -> Result<Self, String> {
        self.username = self.username.trim().to_string();
        self.email = normalize_email(&self.email);

        validate_username(&self.username)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;

        Ok(self)
    }
}

/// Request for user login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Check that both credentials are present and normalize the email
    pub fn validated(mut self) -> Result<Self, String> {
        self.email = normalize_email(&self.email);

        if self.email.is_empty() {
            return Err("Email is required".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }

        Ok(self)
    }
}

/// Response for a successful signup or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: String,
    pub token: String,
}

/// Response describing the caller's current session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_normalizes_email() {
        let request = SignupRequest {
            username: " alice ".to_string(),
            email: "  A@X.com ".to_string(),
            password: "secret".to_string(),
        }
        .validated()
        .unwrap();

        assert_eq!(request.username, "alice");
        assert_eq!(request.email, "a@x.com");
    }

    #[test]
    fn test_login_request_requires_password() {
        let result = LoginRequest {
            email: "a@x.com".to_string(),
            password: String::new(),
        }
        .validated();

        assert_eq!(result.unwrap_err(), "Password is required");
    }
}
