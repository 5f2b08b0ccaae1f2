//! Identity provider connectivity.
//!
//! The board only needs four things from a provider: who is signed in, and
//! signing in, up and out with email and password. Provider rejections carry
//! the provider's own reason code so they can be shown to the user.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

/// Errors that can occur while authenticating.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The provider rejected the sign-in or sign-up
    #[error("Authentication failed: {reason}")]
    AuthFailure { reason: String },
    /// Registration password and its confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl Error {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::AuthFailure {
            reason: reason.into(),
        }
    }
}

/// The authenticated user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    pub uid: String,
    pub email: Option<String>,
}

/// A sign-up request as typed into the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl Registration {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirmation: confirmation.into(),
        }
    }

    /// Checks the confirmation before anything reaches the provider.
    pub fn validate(&self) -> Result<(), Error> {
        if self.password != self.confirmation {
            return Err(Error::PasswordMismatch);
        }
        Ok(())
    }
}

/// Trait for abstracting the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<UserIdentity>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, Error>;

    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, Error>;

    async fn sign_out(&self);
}
