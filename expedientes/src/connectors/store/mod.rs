//! Record store connectivity.
//!
//! This module defines the seam between the board and a remote document
//! collection:
//! - `RecordStore`, the capabilities the sync controller relies on
//! - `RawDocument`, an opaque `{ id, fields }` pair as the store hands it out
//! - `Error`, the failures a store command can report
//!
//! An in-memory implementation lives in the `memory` submodule.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;

/// Field map of a stored document.
pub type DocumentFields = serde_json::Map<String, serde_json::Value>;

/// Callback receiving every snapshot of a subscribed collection.
pub type SnapshotListener = Arc<dyn Fn(Vec<RawDocument>) + Send + Sync>;

/// Errors reported by store commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The targeted document does not exist
    #[error("Document {0} not found")]
    DocumentNotFound(String),
    /// The store refused the command
    #[error("Store rejected the command: {0}")]
    Rejected(String),
}

/// A document as delivered in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub fields: DocumentFields,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: DocumentFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Identifies one live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Trait for abstracting the remote document collection.
///
/// Implementations must deliver snapshots to a listener one at a time and in
/// order. Each snapshot lists the whole collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore {
    /// Registers `on_snapshot` for every change to `collection`.
    fn subscribe(&self, collection: &str, on_snapshot: SnapshotListener) -> SubscriptionHandle;

    /// Stops deliveries for `handle`. Unknown handles are ignored.
    fn unsubscribe(&self, handle: SubscriptionHandle);

    /// Adds a document and returns its store-assigned id.
    async fn create(&self, collection: &str, fields: DocumentFields) -> Result<String, Error>;

    /// Merges `fields` into the document `id`.
    async fn update(&self, collection: &str, id: &str, fields: DocumentFields)
    -> Result<(), Error>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), Error>;
}
