//! Host selector registry model.
//!
//! Selectors are style rule targets (`.gjs-row`, `#header`). The host announces
//! each new selector through an add event, and style-editing surfaces hide any
//! selector whose `private` flag is set.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Class,
    Id,
}

impl SelectorKind {
    fn prefix(self) -> char {
        match self {
            SelectorKind::Class => '.',
            SelectorKind::Id => '#',
        }
    }
}

/// A registered selector
#[derive(Debug)]
pub struct Selector {
    kind: SelectorKind,
    name: String,
    private: AtomicBool,
}

impl Selector {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    /// Fully-qualified name, e.g. `.gjs-row`
    pub fn full_name(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.name)
    }

    pub fn is_private(&self) -> bool {
        self.private.load(Ordering::SeqCst)
    }
}

/// Events emitted by the selector registry
#[derive(Debug, Clone)]
pub enum SelectorEvent {
    Added(Arc<Selector>),
    PrivacyChanged(Arc<Selector>),
}

type SelectorListener = Arc<dyn Fn(&SelectorEvent) + Send + Sync>;

/// The host's selector registry
pub struct SelectorManager {
    id: u64,
    selectors: RwLock<HashMap<String, Arc<Selector>>>,
    listeners: RwLock<Vec<SelectorListener>>,
}

impl Default for SelectorManager {
    fn default() -> Self {
        Self {
            id: NEXT_MANAGER_ID.fetch_add(1, Ordering::SeqCst),
            selectors: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl SelectorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-unique identity of this registry
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Add a selector, or return the existing one with the same full name.
    /// Only a newly created selector emits [`SelectorEvent::Added`].
    pub fn add(&self, kind: SelectorKind, name: &str) -> Arc<Selector> {
        let selector = Arc::new(Selector {
            kind,
            name: name.to_string(),
            private: AtomicBool::new(false),
        });
        let full_name = selector.full_name();

        {
            let mut selectors = self.selectors.write();
            if let Some(existing) = selectors.get(&full_name) {
                return existing.clone();
            }
            selectors.insert(full_name, selector.clone());
        }

        self.emit(&SelectorEvent::Added(selector.clone()));
        selector
    }

    pub fn get(&self, full_name: &str) -> Option<Arc<Selector>> {
        self.selectors.read().get(full_name).cloned()
    }

    pub fn all(&self) -> Vec<Arc<Selector>> {
        self.selectors.read().values().cloned().collect()
    }

    /// Selectors a user-facing style editor may show
    pub fn public_selectors(&self) -> Vec<Arc<Selector>> {
        let mut public: Vec<_> = self
            .selectors
            .read()
            .values()
            .filter(|s| !s.is_private())
            .cloned()
            .collect();
        public.sort_by_key(|s| s.full_name());
        public
    }

    /// Set the `private` flag. Emits [`SelectorEvent::PrivacyChanged`] only when
    /// the flag actually flips; returns whether it did.
    pub fn set_private(&self, selector: &Arc<Selector>, private: bool) -> bool {
        let previous = selector.private.swap(private, Ordering::SeqCst);
        if previous == private {
            return false;
        }
        self.emit(&SelectorEvent::PrivacyChanged(selector.clone()));
        true
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&SelectorEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    fn emit(&self, event: &SelectorEvent) {
        let listeners: Vec<SelectorListener> = self.listeners.read().clone();
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_add_returns_existing() {
        let manager = SelectorManager::new();
        let added = Arc::new(AtomicUsize::new(0));
        let counter = added.clone();
        manager.subscribe(move |event| {
            if matches!(event, SelectorEvent::Added(_)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let a = manager.add(SelectorKind::Class, "gjs-row");
        let b = manager.add(SelectorKind::Class, "gjs-row");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.full_name(), ".gjs-row");
        assert_eq!(added.load(Ordering::SeqCst), 1);

        // Same name, different kind is a different selector
        let id = manager.add(SelectorKind::Id, "gjs-row");
        assert_eq!(id.full_name(), "#gjs-row");
        assert_eq!(manager.all().len(), 2);
    }

    #[test]
    fn test_set_private_emits_once() {
        let manager = SelectorManager::new();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = changes.clone();
        manager.subscribe(move |event| {
            if matches!(event, SelectorEvent::PrivacyChanged(_)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let cell = manager.add(SelectorKind::Class, "gjs-cell");
        assert!(manager.set_private(&cell, true));
        assert!(!manager.set_private(&cell, true));
        assert!(cell.is_private());
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_public_selectors_hide_private() {
        let manager = SelectorManager::new();
        let row = manager.add(SelectorKind::Class, "gjs-row");
        manager.add(SelectorKind::Class, "title");
        manager.set_private(&row, true);

        let names: Vec<String> = manager.public_selectors().iter().map(|s| s.full_name()).collect();
        assert_eq!(names, vec![".title".to_string()]);
    }

    #[test]
    fn test_manager_ids_are_unique() {
        assert_ne!(SelectorManager::new().id(), SelectorManager::new().id());
    }
}
