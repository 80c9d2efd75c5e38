//! Application state shared across handlers

use crate::session::SessionManager;

/// Attributes applied to the session cookies
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Mark cookies `Secure` (HTTPS only)
    pub secure: bool,
    /// Cookie lifetime in seconds, matching the token lifetime
    pub max_age: u64,
}

impl CookieSettings {
    /// Create cookie settings from environment variables
    ///
    /// # Environment Variables
    /// - `COOKIE_SECURE`: Set the `Secure` attribute (default: true)
    pub fn from_env(max_age: u64) -> Self {
        let secure = std::env::var("COOKIE_SECURE")
            .map(|value| !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        Self { secure, max_age }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub cookies: CookieSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cookies_are_secure_by_default() {
        unsafe {
            std::env::remove_var("COOKIE_SECURE");
        }

        let settings = CookieSettings::from_env(60);
        assert!(settings.secure);
        assert_eq!(settings.max_age, 60);
    }

    #[test]
    #[serial]
    fn test_secure_cookies_can_be_disabled() {
        unsafe {
            std::env::set_var("COOKIE_SECURE", "false");
        }

        assert!(!CookieSettings::from_env(60).secure);

        unsafe {
            std::env::remove_var("COOKIE_SECURE");
        }
    }
}
