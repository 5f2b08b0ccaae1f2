use crate::connectors::store::{
    DocumentFields, Error, RawDocument, RecordStore, SnapshotListener, SubscriptionHandle,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

struct Subscriber {
    collection: String,
    listener: SnapshotListener,
}

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<RawDocument>>,
    subscribers: BTreeMap<SubscriptionHandle, Subscriber>,
    next_handle: u64,
    rejection: Option<String>,
}

impl State {
    fn snapshot(&self, collection: &str) -> Vec<RawDocument> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    /// Pushes the current contents of `collection` to each of its subscribers, in
    /// subscription order.
    fn publish(&self, collection: &str) {
        let snapshot = self.snapshot(collection);
        for subscriber in self
            .subscribers
            .values()
            .filter(|subscriber| subscriber.collection == collection)
        {
            (subscriber.listener)(snapshot.clone());
        }
    }

    fn check_accepting(&self) -> Result<(), Error> {
        match &self.rejection {
            Some(reason) => Err(Error::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Record store keeping every collection in memory.
///
/// Documents keep their insertion order. Snapshots are delivered synchronously
/// while the store is locked, so listeners must not call back into the store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following command fail with `reason` until `accept_commands`.
    pub fn reject_commands(&self, reason: impl Into<String>) {
        self.lock().rejection = Some(reason.into());
    }

    pub fn accept_commands(&self) {
        self.lock().rejection = None;
    }

    /// Appends a document as-is, bypassing any validation, and publishes it.
    pub fn insert_raw(&self, collection: &str, document: RawDocument) {
        let mut state = self.lock();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        state.publish(collection);
    }

    /// Current contents of `collection`.
    pub fn documents(&self, collection: &str) -> Vec<RawDocument> {
        self.lock().snapshot(collection)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn subscribe(&self, collection: &str, on_snapshot: SnapshotListener) -> SubscriptionHandle {
        let mut state = self.lock();
        state.next_handle += 1;
        let handle = SubscriptionHandle::new(state.next_handle);
        on_snapshot(state.snapshot(collection));
        state.subscribers.insert(
            handle,
            Subscriber {
                collection: collection.to_string(),
                listener: on_snapshot,
            },
        );
        debug!("Subscription {} opened on {}", handle.id(), collection);
        handle
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        if self.lock().subscribers.remove(&handle).is_some() {
            debug!("Subscription {} closed", handle.id());
        }
    }

    async fn create(&self, collection: &str, fields: DocumentFields) -> Result<String, Error> {
        let mut state = self.lock();
        state.check_accepting()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(RawDocument::new(id.clone(), fields));
        state.publish(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: DocumentFields,
    ) -> Result<(), Error> {
        let mut state = self.lock();
        state.check_accepting()?;
        let document = state
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        document.fields.extend(fields);
        state.publish(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), Error> {
        let mut state = self.lock();
        state.check_accepting()?;
        if let Some(documents) = state.collections.get_mut(collection) {
            documents.retain(|document| document.id != id);
        }
        state.publish(collection);
        Ok(())
    }
}
