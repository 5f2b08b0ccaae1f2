use crate::connectors::auth::{AuthProvider, Error, UserIdentity};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    uid: String,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    current: Option<UserIdentity>,
}

/// Email/password provider keeping accounts in memory.
///
/// Rejections use the hosted provider's reason codes, e.g. `auth/wrong-password`.
#[derive(Default)]
pub struct MemoryAuth {
    state: Mutex<State>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    fn current_user(&self) -> Option<UserIdentity> {
        self.lock().current.clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, Error> {
        let mut state = self.lock();
        let account = state
            .accounts
            .get(email)
            .ok_or_else(|| Error::failure("auth/user-not-found"))?;
        if account.password != password {
            return Err(Error::failure("auth/wrong-password"));
        }
        let user = UserIdentity {
            uid: account.uid.clone(),
            email: Some(email.to_string()),
        };
        state.current = Some(user.clone());
        info!("Signed in {}", user.uid);
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, Error> {
        if !is_valid_email(email) {
            return Err(Error::failure("auth/invalid-email"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::failure("auth/weak-password"));
        }
        let mut state = self.lock();
        if state.accounts.contains_key(email) {
            return Err(Error::failure("auth/email-already-in-use"));
        }
        let uid = uuid::Uuid::new_v4().simple().to_string();
        state.accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        let user = UserIdentity {
            uid,
            email: Some(email.to_string()),
        };
        state.current = Some(user.clone());
        info!("Registered {}", user.uid);
        Ok(user)
    }

    async fn sign_out(&self) {
        if let Some(user) = self.lock().current.take() {
            info!("Signed out {}", user.uid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_up_signs_the_new_user_in() {
        let auth = MemoryAuth::new();

        let user = auth.sign_up("ana@example.com", "secreto").await.unwrap();

        assert_eq!(auth.current_user(), Some(user));
    }

    #[tokio::test]
    async fn sign_in_returns_the_registered_identity() {
        // Arrange
        let auth = MemoryAuth::new();
        let registered = auth.sign_up("ana@example.com", "secreto").await.unwrap();
        auth.sign_out().await;

        // Act
        let user = auth.sign_in("ana@example.com", "secreto").await.unwrap();

        // Assert
        assert_eq!(user.uid, registered.uid);
        assert_eq!(auth.current_user(), Some(user));
    }

    #[tokio::test]
    async fn sign_out_clears_current_user() {
        let auth = MemoryAuth::new();
        auth.sign_up("ana@example.com", "secreto").await.unwrap();

        auth.sign_out().await;

        assert_eq!(auth.current_user(), None);
    }

    #[tokio::test]
    async fn rejections_carry_provider_reasons() {
        let auth = MemoryAuth::new();
        auth.sign_up("ana@example.com", "secreto").await.unwrap();

        let cases = [
            (auth.sign_in("nadie@example.com", "secreto").await, "auth/user-not-found"),
            (auth.sign_in("ana@example.com", "otra-clave").await, "auth/wrong-password"),
            (auth.sign_up("ana@example.com", "secreto").await, "auth/email-already-in-use"),
            (auth.sign_up("no-es-correo", "secreto").await, "auth/invalid-email"),
            (auth.sign_up("luis@example.com", "corta").await, "auth/weak-password"),
        ];

        for (result, reason) in cases {
            assert_eq!(result, Err(Error::failure(reason)));
        }
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_previous_session() {
        let auth = MemoryAuth::new();
        let user = auth.sign_up("ana@example.com", "secreto").await.unwrap();

        let _ = auth.sign_in("ana@example.com", "mal").await;

        assert_eq!(auth.current_user(), Some(user));
    }
}
