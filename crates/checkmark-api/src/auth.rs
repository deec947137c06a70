//! Mock bearer-token authentication
//!
//! A deployment serves exactly one implicit user. Credentials are checked by a
//! [`CredentialPolicy`] so the static pair can be swapped for a real verifier
//! without touching the router.

use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::ApiError;

/// Verifies logins and bearer tokens
pub trait CredentialPolicy: Send + Sync + fmt::Debug {
    /// Exchange a username/password pair for a token
    fn authenticate(&self, username: &str, password: &str) -> Option<String>;

    /// Check a bearer token
    fn verify(&self, token: &str) -> bool;
}

/// One hardcoded username, password and token for the process lifetime
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
    token: String,
}

impl StaticCredentials {
    pub fn new(username: &str, password: &str, token: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            token: token.to_string(),
        }
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl CredentialPolicy for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<String> {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(user_ok & pass_ok).then(|| self.token.clone())
    }

    fn verify(&self, token: &str) -> bool {
        token.as_bytes().ct_eq(self.token.as_bytes()).into()
    }
}

/// Status class used when the guard rejects a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
}

/// Status and message returned for one kind of credential failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthFailure {
    pub rejection: Rejection,
    pub message: &'static str,
}

impl AuthFailure {
    pub const fn unauthorized(message: &'static str) -> Self {
        Self {
            rejection: Rejection::Unauthorized,
            message,
        }
    }

    pub const fn forbidden(message: &'static str) -> Self {
        Self {
            rejection: Rejection::Forbidden,
            message,
        }
    }

    pub fn to_error(self) -> ApiError {
        match self.rejection {
            Rejection::Unauthorized => ApiError::Unauthorized(self.message.to_string()),
            Rejection::Forbidden => ApiError::Forbidden(self.message.to_string()),
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The token is the second space-separated segment; an absent or empty segment
/// counts as no token.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.split(' ').nth(1).filter(|token| !token.is_empty())
}

/// Gate placed in front of every protected route
#[derive(Clone, Debug)]
pub struct AuthGuard {
    policy: Arc<dyn CredentialPolicy>,
    missing: AuthFailure,
    invalid: AuthFailure,
}

impl AuthGuard {
    pub fn new(policy: Arc<dyn CredentialPolicy>, missing: AuthFailure, invalid: AuthFailure) -> Self {
        Self {
            policy,
            missing,
            invalid,
        }
    }

    /// Check the raw `Authorization` header, if any
    pub fn check(&self, header: Option<&str>) -> Result<(), ApiError> {
        let Some(token) = header.and_then(bearer_token) else {
            tracing::debug!("Rejected request without bearer token");
            return Err(self.missing.to_error());
        };

        if !self.policy.verify(token) {
            tracing::debug!("Rejected request with invalid bearer token");
            return Err(self.invalid.to_error());
        }
        Ok(())
    }
}
