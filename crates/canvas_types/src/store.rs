//! Authoritative attribute store for a single component.
//!
//! Every control, sync rule and host panel reads from the same `AttributeStore`.
//! Writes are applied under one lock so readers never observe a partial update,
//! and change listeners run after the lock is released so they may read or write
//! the store again.
//!
//! Controls write through an [`AttrWriter`], which is a claim on one key: the store
//! refuses a second claim on the same key while the first writer is alive.

use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{AttrMap, AttrValue};

/// Errors raised by the attribute store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Attribute '{0}' already has a live writer")]
    WriterTaken(String),
}

/// Identifier returned by [`AttributeStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A single attribute change, delivered to subscribers after it has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub key: String,
    pub previous: Option<AttrValue>,
    pub current: AttrValue,
}

type ChangeCallback = Arc<dyn Fn(&AttributeChange) + Send + Sync>;

struct Listener {
    id: SubscriptionId,
    /// `None` listens to every attribute
    key: Option<String>,
    callback: ChangeCallback,
}

struct StoreInner {
    values: RwLock<AttrMap>,
    writers: Mutex<HashSet<String>>,
    listeners: RwLock<Vec<Listener>>,
    next_listener: AtomicU64,
}

/// Clone-able handle to a component's attributes. All clones share the same data.
#[derive(Clone)]
pub struct AttributeStore {
    inner: Arc<StoreInner>,
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::with_values(AttrMap::new())
    }
}

impl fmt::Debug for AttributeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeStore")
            .field("values", &*self.inner.values.read())
            .finish()
    }
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with initial values. Seeding emits no change events.
    pub fn with_values(values: AttrMap) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                values: RwLock::new(values),
                writers: Mutex::new(HashSet::new()),
                listeners: RwLock::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    /// Current value of an attribute
    pub fn get(&self, key: &str) -> Option<AttrValue> {
        self.inner.values.read().get(key).cloned()
    }

    /// Consistent copy of every attribute
    pub fn snapshot(&self) -> AttrMap {
        self.inner.values.read().clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.values.read().contains_key(key)
    }

    /// Host-side write (programmatic `setValue`, host-triggered changes).
    ///
    /// Returns `true` if the stored value changed. Writing an identical value is a
    /// no-op and emits nothing.
    pub fn set(&self, key: &str, value: AttrValue) -> bool {
        let previous = {
            let mut values = self.inner.values.write();
            if values.get(key) == Some(&value) {
                return false;
            }
            values.insert(key.to_string(), value.clone())
        };

        tracing::trace!("attribute '{}' changed", key);
        self.emit(&AttributeChange {
            key: key.to_string(),
            previous,
            current: value,
        });
        true
    }

    /// Claim the single writer slot for `key`.
    pub fn claim_writer(&self, key: &str) -> Result<AttrWriter, StoreError> {
        let mut writers = self.inner.writers.lock();
        if !writers.insert(key.to_string()) {
            return Err(StoreError::WriterTaken(key.to_string()));
        }
        Ok(AttrWriter {
            store: self.clone(),
            key: key.to_string(),
        })
    }

    /// Whether a writer currently holds `key`
    pub fn has_writer(&self, key: &str) -> bool {
        self.inner.writers.lock().contains(key)
    }

    /// Subscribe to changes of one attribute (`Some(key)`) or of any attribute (`None`).
    pub fn subscribe<F>(&self, key: Option<&str>, callback: F) -> SubscriptionId
    where
        F: Fn(&AttributeChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_listener.fetch_add(1, Ordering::SeqCst));
        self.inner.listeners.write().push(Listener {
            id,
            key: key.map(str::to_string),
            callback: Arc::new(callback),
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.write();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        listeners.len() != before
    }

    fn emit(&self, change: &AttributeChange) {
        // Collect first so callbacks can re-enter the store.
        let callbacks: Vec<ChangeCallback> = self
            .inner
            .listeners
            .read()
            .iter()
            .filter(|listener| listener.key.as_deref().map_or(true, |k| k == change.key))
            .map(|listener| listener.callback.clone())
            .collect();

        for callback in callbacks {
            callback(change);
        }
    }

    fn release_writer(&self, key: &str) {
        self.inner.writers.lock().remove(key);
    }
}

/// Exclusive write handle for one attribute. Dropping it releases the claim.
pub struct AttrWriter {
    store: AttributeStore,
    key: String,
}

impl AttrWriter {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    /// Commit a value. This is exactly one store write.
    pub fn commit(&self, value: AttrValue) -> bool {
        self.store.set(&self.key, value)
    }

    pub fn current(&self) -> Option<AttrValue> {
        self.store.get(&self.key)
    }
}

impl fmt::Debug for AttrWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrWriter").field("key", &self.key).finish()
    }
}

impl Drop for AttrWriter {
    fn drop(&mut self) {
        self.store.release_writer(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let store = AttributeStore::new();
        assert!(store.get("label").is_none());
        assert!(store.set("label", json!("Name")));
        assert_eq!(store.get("label"), Some(json!("Name")));
    }

    #[test]
    fn test_identical_write_is_silent() {
        let store = AttributeStore::new();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = hits.clone();
        store.subscribe(None, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.set("type", json!("text")));
        assert!(!store.set("type", json!("text")));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_keyed_and_wildcard_listeners() {
        let store = AttributeStore::new();
        let label_hits = Arc::new(AtomicU64::new(0));
        let any_hits = Arc::new(AtomicU64::new(0));

        let l = label_hits.clone();
        store.subscribe(Some("label"), move |change| {
            assert_eq!(change.key, "label");
            l.fetch_add(1, Ordering::SeqCst);
        });
        let a = any_hits.clone();
        store.subscribe(None, move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });

        store.set("label", json!("A"));
        store.set("placeholder", json!("B"));

        assert_eq!(label_hits.load(Ordering::SeqCst), 1);
        assert_eq!(any_hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_change_carries_previous_value() {
        let store = AttributeStore::with_values(
            json!({"required": false}).as_object().cloned().unwrap_or_default(),
        );
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        store.subscribe(Some("required"), move |change| {
            *sink.lock() = Some(change.clone());
        });

        store.set("required", json!(true));
        let change = seen.lock().clone().unwrap();
        assert_eq!(change.previous, Some(json!(false)));
        assert_eq!(change.current, json!(true));
    }

    #[test]
    fn test_listener_can_reenter_store() {
        let store = AttributeStore::new();
        let mirror = store.clone();
        store.subscribe(Some("source"), move |change| {
            mirror.set("mirror", change.current.clone());
        });

        store.set("source", json!("x"));
        assert_eq!(store.get("mirror"), Some(json!("x")));
    }

    #[test]
    fn test_single_writer_per_key() {
        let store = AttributeStore::new();
        let writer = store.claim_writer("value").unwrap();
        assert_eq!(
            store.claim_writer("value").unwrap_err(),
            StoreError::WriterTaken("value".to_string())
        );
        // Other keys are independent
        assert!(store.claim_writer("label").is_ok());

        assert!(writer.commit(json!("hello")));
        assert_eq!(store.get("value"), Some(json!("hello")));

        drop(writer);
        assert!(!store.has_writer("value"));
        assert!(store.claim_writer("value").is_ok());
    }

    #[test]
    fn test_unsubscribe() {
        let store = AttributeStore::new();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = hits.clone();
        let id = store.subscribe(None, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set("a", json!(1));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
