//! Live component instances.

use canvas_types::{to_dom_string, AttrValue, AttributeStore, Element, SubscriptionId};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use ui_trait_controls::{TraitModel, TraitSeed};

use crate::binding::{ComponentTypeSpec, SyncRule};
use crate::BindingError;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// A component recognized as (or created from) a registered type.
///
/// The attribute store is authoritative. The rendered element is derived from it:
/// root attributes mirror the store and sync rules project changes onto the
/// slot descendants, both immediately at construction and on every change.
pub struct Component {
    id: u64,
    type_name: String,
    element: Arc<RwLock<Element>>,
    attributes: AttributeStore,
    traits: RwLock<Vec<Arc<TraitModel>>>,
    subscriptions: Vec<SubscriptionId>,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl Component {
    pub(crate) fn build(type_name: &str, spec: &ComponentTypeSpec, element: Element) -> Self {
        let id = NEXT_COMPONENT_ID.fetch_add(1, Ordering::SeqCst);

        // Defaults first, attributes already present on the element win
        let mut initial = spec.default_attributes.clone();
        for (key, value) in &element.attributes {
            initial.insert(key.clone(), AttrValue::String(value.clone()));
        }
        let attributes = AttributeStore::with_values(initial);
        let element = Arc::new(RwLock::new(element));

        let mut subscriptions = Vec::with_capacity(spec.sync_rules.len() + 1);

        let root = element.clone();
        subscriptions.push(attributes.subscribe(None, move |change| {
            mirror_root(&mut root.write(), &change.key, &change.current);
        }));

        for rule in &spec.sync_rules {
            let target = element.clone();
            let owned = rule.clone();
            let component = type_name.to_string();
            subscriptions.push(attributes.subscribe(rule.watched_key(), move |change| {
                apply_rule(&component, &owned, &mut target.write(), &change.key, &change.current);
            }));
        }

        // Initial projection, so descendants reflect the defaults without an event
        {
            let snapshot = attributes.snapshot();
            let mut rendered = element.write();
            for (key, value) in &snapshot {
                mirror_root(&mut rendered, key, value);
                for rule in &spec.sync_rules {
                    apply_rule(type_name, rule, &mut rendered, key, value);
                }
            }
        }

        let mut seen = HashSet::new();
        let mut traits = Vec::with_capacity(spec.default_traits.len());
        for seed in &spec.default_traits {
            if !seen.insert(seed.name().to_string()) {
                tracing::warn!(
                    "Component type '{}' declares trait '{}' twice, keeping the first",
                    type_name,
                    seed.name()
                );
                continue;
            }
            traits.push(Arc::new(TraitModel::new(
                seed.clone().into_descriptor(),
                attributes.clone(),
            )));
        }

        tracing::debug!("Created {} component #{} with {} traits", type_name, id, traits.len());

        Self {
            id,
            type_name: type_name.to_string(),
            element,
            attributes,
            traits: RwLock::new(traits),
            subscriptions,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The component's authoritative attribute store
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<AttrValue> {
        self.attributes.get(key)
    }

    /// Host-side attribute write
    pub fn set_attribute(&self, key: &str, value: AttrValue) -> bool {
        self.attributes.set(key, value)
    }

    /// Snapshot of the rendered element
    pub fn element(&self) -> Element {
        self.element.read().clone()
    }

    pub fn traits(&self) -> Vec<Arc<TraitModel>> {
        self.traits.read().clone()
    }

    pub fn trait_named(&self, name: &str) -> Option<Arc<TraitModel>> {
        self.traits.read().iter().find(|t| t.name() == name).cloned()
    }

    /// Attach an extra trait. Trait names are unique per component.
    pub fn attach_trait(&self, seed: impl Into<TraitSeed>) -> Result<Arc<TraitModel>, BindingError> {
        let descriptor = seed.into().into_descriptor();
        let mut traits = self.traits.write();
        if traits.iter().any(|t| t.name() == descriptor.name) {
            return Err(BindingError::DuplicateTrait {
                component: self.type_name.clone(),
                name: descriptor.name,
            });
        }
        let model = Arc::new(TraitModel::new(descriptor, self.attributes.clone()));
        traits.push(model.clone());
        Ok(model)
    }
}

impl Drop for Component {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.attributes.unsubscribe(id);
        }
    }
}

fn mirror_root(root: &mut Element, key: &str, value: &AttrValue) {
    if value.is_null() {
        root.attributes.remove(key);
    } else {
        root.set_attribute(key, to_dom_string(value));
    }
}

fn apply_rule(component: &str, rule: &SyncRule, root: &mut Element, key: &str, value: &AttrValue) {
    if rule.applies_to(key) && !rule.apply(root, key, value) {
        tracing::warn!(
            "Slot '{}' of {} component does not resolve, skipped sync of '{}'",
            rule.slot().name,
            component,
            key
        );
    }
}
