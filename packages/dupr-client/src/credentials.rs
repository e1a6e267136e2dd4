//! Login credentials with secure memory.
//!
//! The password is wrapped in `secrecy` so it never reaches logs, debug
//! output or error messages.

pub use secrecy::SecretString;

use secrecy::ExposeSecret;
use serde::Serialize;

/// Account credentials, supplied once at startup and never persisted.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Body for the login endpoint.
    pub(crate) fn login_body(&self) -> LoginRequest<'_> {
        LoginRequest {
            email: &self.email,
            password: self.password.expose_secret(),
        }
    }
}

/// Wire shape of the login call.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_not_in_debug() {
        let creds = Credentials::new("player@example.com", "hunter2-secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("player@example.com"));
    }

    #[test]
    fn test_login_body_exposes_password() {
        let creds = Credentials::new("player@example.com", "hunter2-secret");
        let body = serde_json::to_value(creds.login_body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"email": "player@example.com", "password": "hunter2-secret"})
        );
    }

    #[test]
    fn test_empty_password_is_kept() {
        let creds = Credentials::new("player@example.com", String::new());
        assert!(creds.password.expose_secret().is_empty());
        assert!(format!("{:?}", creds.password).contains("[REDACTED]"));
    }
}
