//! Case-tracking kanban board synced live from a document store.
//!
//! `Expedientes` is the entry point: it signs users in and out through an
//! `AuthProvider` and keeps a `SyncController` subscribed to the signed-in
//! user's records in a `RecordStore`.

pub mod board;
pub mod config;
pub mod connectors;
pub mod dates;
pub mod form;
pub mod record;
pub mod sync;

use config::BoardConfig;
use connectors::auth::{self, AuthProvider, Registration, UserIdentity};
use connectors::store::RecordStore;
use sync::{Session, SyncController};
use thiserror::Error;
use tracing::info;

pub use record::{Record, RecordFields, Status};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] auth::Error),
    #[error(transparent)]
    Sync(#[from] sync::Error),
}

/// A signed-in board: one identity provider, one live record subscription.
pub struct Expedientes<'a, AUTH: AuthProvider, STORE: RecordStore> {
    auth: &'a AUTH,
    controller: SyncController<'a, STORE>,
}

impl<'a, AUTH: AuthProvider, STORE: RecordStore> Expedientes<'a, AUTH, STORE> {
    pub fn new(auth: &'a AUTH, store: &'a STORE, config: &BoardConfig) -> Self {
        Self::with_controller(auth, SyncController::new(store, config))
    }

    pub fn with_controller(auth: &'a AUTH, controller: SyncController<'a, STORE>) -> Self {
        Self { auth, controller }
    }

    /// Resumes syncing for whoever is already signed in.
    ///
    /// Returns `AuthenticationRequired` when nobody is, so the caller can send
    /// the user to the login form.
    pub fn open(&mut self) -> Result<(), Error> {
        self.controller.start(&Session::current(self.auth))?;
        Ok(())
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<UserIdentity, Error>
    where
        AUTH: Sync,
    {
        let user = self.auth.sign_in(email, password).await?;
        self.controller.start(&Session::authenticated(user.clone()))?;
        Ok(user)
    }

    pub async fn sign_up(&mut self, registration: &Registration) -> Result<UserIdentity, Error>
    where
        AUTH: Sync,
    {
        registration.validate()?;
        let user = self
            .auth
            .sign_up(&registration.email, &registration.password)
            .await?;
        self.controller.start(&Session::authenticated(user.clone()))?;
        Ok(user)
    }

    /// Stops syncing before the provider session is dropped.
    pub async fn sign_out(&mut self)
    where
        AUTH: Sync,
    {
        self.controller.stop();
        self.auth.sign_out().await;
        info!("Board closed");
    }

    pub fn controller(&self) -> &SyncController<'a, STORE> {
        &self.controller
    }
}
