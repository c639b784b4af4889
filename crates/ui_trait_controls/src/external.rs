//! Externally-sourced trait values (`data` controls).
//!
//! The control keeps a local shadow of the trait value so the user can type a
//! query. The shadow follows the store whenever the value changes upstream,
//! including host-triggered changes. A trigger performs one lookup with the
//! shadow text as the query. Success updates shadow and store together;
//! failure leaves both untouched and goes to the host error channel.

use canvas_types::{to_dom_string, AttrValue, AttrWriter, EditorHost, SubscriptionId};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::JoinHandle;

use crate::lookup::{DataLookup, LookupError};

/// How a trigger ended
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Lookup succeeded and the value was written
    Resolved(String),
    /// Lookup failed; nothing was written
    Failed(LookupError),
    /// Another lookup was already in flight, no call was made
    Busy,
    /// The control was unmounted before the lookup returned
    Discarded,
}

struct ExternalInner {
    shadow: Mutex<String>,
    pending: AtomicBool,
    writer: AttrWriter,
    lookup: Arc<dyn DataLookup>,
    host: Arc<dyn EditorHost>,
}

/// Lookup side of a mounted `data` control
pub struct ExternalValueResolver {
    inner: Arc<ExternalInner>,
    subscription: SubscriptionId,
}

impl ExternalValueResolver {
    pub fn new(writer: AttrWriter, lookup: Arc<dyn DataLookup>, host: Arc<dyn EditorHost>) -> Self {
        let shadow = writer.current().map(|v| shadow_text(&v)).unwrap_or_default();
        let key = writer.key().to_string();
        let store = writer.store().clone();

        let inner = Arc::new(ExternalInner {
            shadow: Mutex::new(shadow),
            pending: AtomicBool::new(false),
            writer,
            lookup,
            host,
        });

        let weak = Arc::downgrade(&inner);
        let subscription = store.subscribe(Some(&key), move |change| {
            if let Some(inner) = weak.upgrade() {
                *inner.shadow.lock() = shadow_text(&change.current);
            }
        });

        Self {
            inner,
            subscription,
        }
    }

    /// Text currently shown in the field
    pub fn shadow(&self) -> String {
        self.inner.shadow.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// User typed into the field. Returns whether the store changed.
    pub fn edit(&self, text: String) -> bool {
        *self.inner.shadow.lock() = text.clone();
        self.inner.writer.commit(AttrValue::String(text))
    }

    /// Start a lookup for the current field text.
    ///
    /// The in-flight claim is taken here, synchronously, so a second call made
    /// before the first future completes yields [`LookupOutcome::Busy`]. The
    /// returned future only holds a weak reference to the control; if the
    /// control is gone by the time the lookup returns, the result is dropped.
    pub fn trigger(&self) -> impl Future<Output = LookupOutcome> + Send + 'static {
        let claimed = self
            .inner
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        let query = self.shadow();
        let lookup = self.inner.lookup.clone();
        let weak = Arc::downgrade(&self.inner);
        let guard = claimed.then(|| PendingGuard(weak.clone()));

        async move {
            let Some(_pending) = guard else {
                tracing::debug!("Lookup already in flight, ignoring trigger");
                return LookupOutcome::Busy;
            };

            let result = lookup.lookup(&query).await;

            let Some(inner) = weak.upgrade() else {
                tracing::debug!("Control unmounted during lookup for '{}', discarding", query);
                return LookupOutcome::Discarded;
            };

            match result {
                Ok(value) => {
                    *inner.shadow.lock() = value.clone();
                    inner.writer.commit(AttrValue::String(value.clone()));
                    tracing::debug!("Resolved '{}' = {}", inner.writer.key(), value);
                    LookupOutcome::Resolved(value)
                }
                Err(err) => {
                    tracing::warn!("Lookup for '{}' failed: {}", inner.writer.key(), err);
                    inner.host.report_error(&err);
                    LookupOutcome::Failed(err)
                }
            }
        }
    }

    /// Run [`trigger`](Self::trigger) on a runtime without blocking the caller.
    ///
    /// `handle` must belong to a current-thread runtime driven by the thread
    /// that owns the editor state. Store listeners fire after the store lock is
    /// released, so a lookup committing from a worker thread could race
    /// [`edit`](Self::edit) and leave the shadow disagreeing with the store.
    /// Other runtime flavors are refused and `None` is returned without a
    /// lookup.
    pub fn spawn_trigger(&self, handle: &Handle) -> Option<JoinHandle<LookupOutcome>> {
        if handle.runtime_flavor() != RuntimeFlavor::CurrentThread {
            tracing::warn!(
                "Refusing lookup for '{}' on a {:?} runtime, a current-thread runtime is required",
                self.inner.writer.key(),
                handle.runtime_flavor()
            );
            return None;
        }
        Some(handle.spawn(self.trigger()))
    }
}

impl Drop for ExternalValueResolver {
    fn drop(&mut self) {
        self.inner.writer.store().unsubscribe(self.subscription);
    }
}

/// Clears the in-flight flag however the lookup future ends
struct PendingGuard(Weak<ExternalInner>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.0.upgrade() {
            inner.pending.store(false, Ordering::SeqCst);
        }
    }
}

fn shadow_text(value: &AttrValue) -> String {
    if value.is_null() {
        String::new()
    } else {
        to_dom_string(value)
    }
}
