//! Private selector tracking.
//!
//! Structural wrapper classes (rows, cells) are internal to their blocks and
//! must not show up in user-facing style editors. The set of such selectors is
//! process-wide and only grows; flagging is idempotent per full selector name.

use canvas_types::{SelectorEvent, SelectorManager};
use dashmap::DashSet;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock, Weak};

static GLOBAL_PRIVATE_SET: OnceLock<Arc<PrivateSelectorSet>> = OnceLock::new();

/// Full selector names (`.gjs-row`) that must be private
#[derive(Debug, Default)]
pub struct PrivateSelectorSet {
    names: DashSet<String>,
}

impl PrivateSelectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide set
    pub fn global() -> Arc<PrivateSelectorSet> {
        GLOBAL_PRIVATE_SET
            .get_or_init(|| Arc::new(PrivateSelectorSet::new()))
            .clone()
    }

    /// Insert a selector name. Returns `false` if it was already present.
    pub fn mark_private(&self, full_name: &str) -> bool {
        self.names.insert(full_name.to_string())
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.names.contains(full_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Sorted snapshot
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().map(|name| name.key().clone()).collect();
        names.sort();
        names
    }
}

/// Applies a [`PrivateSelectorSet`] to host selector registries.
///
/// Once attached, every selector the host adds whose full name is in the set is
/// flagged private as it appears. Names marked after attachment are also applied
/// to selectors that already exist.
pub struct SelectorPrivacyFilter {
    set: Arc<PrivateSelectorSet>,
    managers: Mutex<Vec<Weak<SelectorManager>>>,
}

impl SelectorPrivacyFilter {
    pub fn new(set: Arc<PrivateSelectorSet>) -> Self {
        Self {
            set,
            managers: Mutex::new(Vec::new()),
        }
    }

    /// Filter over the process-wide set
    pub fn global() -> Self {
        Self::new(PrivateSelectorSet::global())
    }

    pub fn set(&self) -> &Arc<PrivateSelectorSet> {
        &self.set
    }

    /// Start filtering a selector registry. Attaching the same registry twice
    /// is a no-op; returns whether this call attached it.
    pub fn attach(&self, manager: &Arc<SelectorManager>) -> bool {
        {
            let mut managers = self.managers.lock();
            managers.retain(|weak| weak.strong_count() > 0);
            if managers
                .iter()
                .filter_map(Weak::upgrade)
                .any(|m| m.id() == manager.id())
            {
                return false;
            }
            managers.push(Arc::downgrade(manager));
        }

        let set = self.set.clone();
        let weak = Arc::downgrade(manager);
        manager.subscribe(move |event| {
            if let SelectorEvent::Added(selector) = event {
                if set.contains(&selector.full_name()) {
                    if let Some(manager) = weak.upgrade() {
                        manager.set_private(selector, true);
                    }
                }
            }
        });

        // Selectors that predate attachment
        for selector in manager.all() {
            if self.set.contains(&selector.full_name()) {
                manager.set_private(&selector, true);
            }
        }

        tracing::debug!("Selector privacy filter attached to registry #{}", manager.id());
        true
    }

    /// Mark a selector private in the set and in every attached registry.
    ///
    /// Returns `true` only when the name was new to the set.
    pub fn mark_private(&self, full_name: &str) -> bool {
        let added = self.set.mark_private(full_name);
        if added {
            tracing::debug!("Marked selector '{}' private", full_name);
        }

        let managers: Vec<Arc<SelectorManager>> = self
            .managers
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for manager in managers {
            if let Some(selector) = manager.get(full_name) {
                manager.set_private(&selector, true);
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_types::SelectorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn count_privacy_events(manager: &SelectorManager) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        manager.subscribe(move |event| {
            if matches!(event, SelectorEvent::PrivacyChanged(_)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        count
    }

    #[test]
    fn test_added_selectors_are_flagged() {
        let filter = SelectorPrivacyFilter::new(Arc::new(PrivateSelectorSet::new()));
        let manager = Arc::new(SelectorManager::new());
        filter.mark_private(".gjs-row");
        assert!(filter.attach(&manager));

        let row = manager.add(SelectorKind::Class, "gjs-row");
        let title = manager.add(SelectorKind::Class, "title");
        assert!(row.is_private());
        assert!(!title.is_private());
        // Same name as an id selector is a different selector
        assert!(!manager.add(SelectorKind::Id, "gjs-row").is_private());
    }

    #[test]
    fn test_existing_selectors_flagged_on_attach_and_mark() {
        let filter = SelectorPrivacyFilter::new(Arc::new(PrivateSelectorSet::new()));
        let manager = Arc::new(SelectorManager::new());
        let cell = manager.add(SelectorKind::Class, "gjs-cell");
        let row = manager.add(SelectorKind::Class, "gjs-row");

        filter.mark_private(".gjs-cell");
        filter.attach(&manager);
        assert!(cell.is_private());
        assert!(!row.is_private());

        filter.mark_private(".gjs-row");
        assert!(row.is_private());
    }

    #[test]
    fn test_flagging_is_idempotent() {
        let filter = SelectorPrivacyFilter::new(Arc::new(PrivateSelectorSet::new()));
        let manager = Arc::new(SelectorManager::new());
        let events = count_privacy_events(&manager);

        assert!(filter.attach(&manager));
        assert!(!filter.attach(&manager));

        assert!(filter.mark_private(".gjs-row"));
        assert!(!filter.mark_private(".gjs-row"));
        manager.add(SelectorKind::Class, "gjs-row");
        manager.add(SelectorKind::Class, "gjs-row");
        assert!(!filter.mark_private(".gjs-row"));

        assert_eq!(events.load(Ordering::SeqCst), 1);
        assert_eq!(filter.set().names(), vec![".gjs-row".to_string()]);
    }

    #[test]
    fn test_multiple_registries() {
        let filter = SelectorPrivacyFilter::new(Arc::new(PrivateSelectorSet::new()));
        let first = Arc::new(SelectorManager::new());
        let second = Arc::new(SelectorManager::new());
        filter.attach(&first);
        filter.attach(&second);

        filter.mark_private(".gjs-cell");
        assert!(first.add(SelectorKind::Class, "gjs-cell").is_private());
        assert!(second.add(SelectorKind::Class, "gjs-cell").is_private());
    }

    #[test]
    fn test_global_set_is_shared() {
        assert!(Arc::ptr_eq(&PrivateSelectorSet::global(), &PrivateSelectorSet::global()));
    }
}
