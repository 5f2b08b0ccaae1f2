//! Live synchronization of the signed-in user's records.
//!
//! The controller subscribes to the whole record collection and rebuilds its
//! working set from every snapshot:
//! 1. raw documents become `Record`s, malformed ones are dropped
//! 2. records owned by anyone else are dropped
//! 3. both dates are rewritten in sortable form
//! 4. the result replaces the previous working set wholesale
//!
//! Commands go straight to the store and never touch the working set. Their
//! effect shows up with the next snapshot.

use crate::board::{self, Column};
use crate::config::BoardConfig;
use crate::connectors::auth::{AuthProvider, UserIdentity};
use crate::connectors::store::{self, RawDocument, RecordStore, SnapshotListener, SubscriptionHandle};
use crate::dates::{self, Clock, SystemClock};
use crate::form::{FormError, FormMode, RecordForm};
use crate::record::{self, Record, RecordFields, Status};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the sync controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Nobody is signed in, or the controller is not started
    #[error("Authentication required")]
    AuthenticationRequired,
    /// The store rejected a create, update or delete
    #[error("Store command failed: {0}")]
    StoreCommandFailure(#[from] store::Error),
    #[error("Invalid form: {0}")]
    InvalidForm(#[from] FormError),
}

/// Session context handed to `SyncController::start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserIdentity>,
}

impl Session {
    pub fn authenticated(user: UserIdentity) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Captures whoever is signed in to `auth` right now.
    pub fn current<AUTH: AuthProvider>(auth: &AUTH) -> Self {
        Self {
            user: auth.current_user(),
        }
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Stopped,
    Active,
}

#[derive(Default)]
struct WorkingSet {
    /// Bumped on every stop; listeners holding an older value are stale
    generation: u64,
    records: Vec<Record>,
}

impl WorkingSet {
    fn replace(&mut self, owner_id: &str, documents: Vec<RawDocument>) {
        self.records = documents
            .into_iter()
            .filter_map(|document| match Record::try_from(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping document: {}", e);
                    None
                }
            })
            .filter(|record| record.owner_id == owner_id)
            .map(Record::normalized)
            .collect();
    }
}

struct ActiveSubscription {
    handle: SubscriptionHandle,
    owner: UserIdentity,
}

pub struct SyncController<'a, STORE: RecordStore> {
    store: &'a STORE,
    collection: String,
    due_in_days: u32,
    clock: Arc<dyn Clock>,
    working_set: Arc<Mutex<WorkingSet>>,
    subscription: Option<ActiveSubscription>,
}

impl<'a, STORE: RecordStore> SyncController<'a, STORE> {
    pub fn new(store: &'a STORE, config: &BoardConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(store: &'a STORE, config: &BoardConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            collection: config.collection.clone(),
            due_in_days: config.default_due_in_days,
            clock,
            working_set: Arc::new(Mutex::new(WorkingSet::default())),
            subscription: None,
        }
    }

    /// Starts syncing the session user's records.
    ///
    /// Any previous subscription is stopped first. Without a signed-in user
    /// nothing is subscribed and `AuthenticationRequired` is returned.
    #[tracing::instrument(skip(self, session))]
    pub fn start(&mut self, session: &Session) -> Result<(), Error> {
        self.stop();
        let owner = session.user().cloned().ok_or(Error::AuthenticationRequired)?;

        let generation = {
            let mut working_set = lock(&self.working_set);
            working_set.records.clear();
            working_set.generation
        };

        let working_set = Arc::clone(&self.working_set);
        let owner_id = owner.uid.clone();
        let listener: SnapshotListener = Arc::new(move |documents: Vec<RawDocument>| {
            let mut working_set = lock(&working_set);
            if working_set.generation != generation {
                debug!("Ignoring snapshot delivered after stop");
                return;
            }
            working_set.replace(&owner_id, documents);
            debug!("Applied snapshot with {} records", working_set.records.len());
        });

        let handle = self.store.subscribe(&self.collection, listener);
        info!("Syncing {} for {}", self.collection, owner.uid);
        self.subscription = Some(ActiveSubscription { handle, owner });
        Ok(())
    }

    /// Releases the subscription. Safe to call any number of times.
    ///
    /// Snapshots arriving after this returns are ignored.
    #[tracing::instrument(skip(self))]
    pub fn stop(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        lock(&self.working_set).generation += 1;
        self.store.unsubscribe(subscription.handle);
        info!("Stopped syncing for {}", subscription.owner.uid);
    }

    pub fn state(&self) -> SubscriptionState {
        match self.subscription {
            Some(_) => SubscriptionState::Active,
            None => SubscriptionState::Stopped,
        }
    }

    /// The user whose records are being synced.
    pub fn owner(&self) -> Option<&UserIdentity> {
        self.subscription.as_ref().map(|subscription| &subscription.owner)
    }

    /// Copy of the working set, in snapshot order.
    pub fn records(&self) -> Vec<Record> {
        lock(&self.working_set).records.clone()
    }

    /// Splits the working set by status, keeping snapshot order within each
    /// status. All four statuses are present.
    pub fn grouped_by_status(&self) -> BTreeMap<Status, Vec<Record>> {
        let mut groups: BTreeMap<Status, Vec<Record>> =
            Status::ALL.into_iter().map(|status| (status, Vec::new())).collect();
        for record in lock(&self.working_set).records.iter() {
            groups.entry(record.status).or_default().push(record.clone());
        }
        groups
    }

    /// Columns and cards for the working set, as of today.
    pub fn board(&self) -> Vec<Column> {
        board::columns(self.grouped_by_status(), &self.today())
    }

    pub fn is_overdue(&self, due_on: &str) -> bool {
        dates::is_overdue(due_on, &self.today())
    }

    pub fn is_due_today(&self, due_on: &str) -> bool {
        dates::is_due_today(due_on, &self.today())
    }

    /// A blank create form with today's defaults.
    pub fn new_form(&self) -> RecordForm {
        RecordForm::new(self.clock.today(), self.due_in_days)
    }

    fn active_owner(&self) -> Result<&UserIdentity, Error> {
        self.owner().ok_or(Error::AuthenticationRequired)
    }

    fn today(&self) -> String {
        dates::sortable(self.clock.today())
    }
}

impl<STORE: RecordStore + Sync> SyncController<'_, STORE> {
    #[tracing::instrument(skip(self))]
    pub async fn create_record(&self, fields: &RecordFields) -> Result<String, Error> {
        let owner = self.active_owner()?;
        let id = self
            .store
            .create(&self.collection, fields.to_document(&owner.uid))
            .await?;
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_record(&self, id: &str, fields: &RecordFields) -> Result<(), Error> {
        let owner = self.active_owner()?;
        self.store
            .update(&self.collection, id, fields.to_document(&owner.uid))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn change_status(&self, id: &str, status: Status) -> Result<(), Error> {
        self.active_owner()?;
        self.store
            .update(&self.collection, id, record::status_document(status))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_record(&self, id: &str) -> Result<(), Error> {
        self.active_owner()?;
        self.store.delete(&self.collection, id).await?;
        Ok(())
    }

    /// Validates `form` and issues a create or an update depending on its mode.
    ///
    /// Returns the id of the saved record.
    pub async fn submit(&self, form: &RecordForm) -> Result<String, Error> {
        let fields = form.validate()?;
        match form.mode() {
            FormMode::Create => self.create_record(&fields).await,
            FormMode::Edit(id) => {
                self.update_record(id, &fields).await?;
                Ok(id.clone())
            }
        }
    }
}

impl<STORE: RecordStore> Drop for SyncController<'_, STORE> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(working_set: &Mutex<WorkingSet>) -> MutexGuard<'_, WorkingSet> {
    working_set.lock().unwrap_or_else(PoisonError::into_inner)
}
