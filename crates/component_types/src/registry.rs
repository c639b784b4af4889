//! Component type registry.

use canvas_types::Element;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::binding::{ComponentTypeSpec, Matcher};
use crate::component::Component;
use crate::BindingError;

/// A registered component type
pub struct ComponentType {
    id: String,
    matcher: Matcher,
    spec: ComponentTypeSpec,
}

impl ComponentType {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spec(&self) -> &ComponentTypeSpec {
        &self.spec
    }

    pub fn matches(&self, element: &Element) -> bool {
        (self.matcher)(element)
    }
}

/// Registry of component types, filled at plugin-load time.
///
/// Recognition checks the most recently bound type first, so later plugins can
/// specialize the matchers of earlier ones.
#[derive(Default)]
pub struct ComponentTypeRegistry {
    types: RwLock<Vec<Arc<ComponentType>>>,
}

impl ComponentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a matcher and spec under `id`.
    ///
    /// Binding an id twice is a no-op that keeps the first binding; returns
    /// whether the type was added.
    pub fn bind(&self, id: impl Into<String>, matcher: Matcher, spec: ComponentTypeSpec) -> bool {
        let id = id.into();
        let mut types = self.types.write();
        if types.iter().any(|t| t.id == id) {
            tracing::warn!("Component type '{}' is already bound, ignoring", id);
            return false;
        }
        tracing::debug!(
            "Bound component type '{}' ({} traits, {} sync rules)",
            id,
            spec.default_traits.len(),
            spec.sync_rules.len()
        );
        types.push(Arc::new(ComponentType { id, matcher, spec }));
        true
    }

    pub fn get(&self, id: &str) -> Option<Arc<ComponentType>> {
        self.types.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Type ids in binding order
    pub fn ids(&self) -> Vec<String> {
        self.types.read().iter().map(|t| t.id.clone()).collect()
    }

    /// The type an element is an instance of, if any
    pub fn recognize(&self, element: &Element) -> Option<Arc<ComponentType>> {
        self.types.read().iter().rev().find(|t| t.matches(element)).cloned()
    }

    /// Build a component around an existing element.
    pub fn instantiate(&self, element: Element) -> Result<Component, BindingError> {
        let component_type = self
            .recognize(&element)
            .ok_or_else(|| BindingError::NoMatchingType(element.tag.clone()))?;
        Ok(Component::build(&component_type.id, &component_type.spec, element))
    }

    /// Build a fresh component of a type from its template.
    pub fn create(&self, id: &str) -> Result<Component, BindingError> {
        let component_type = self
            .get(id)
            .ok_or_else(|| BindingError::UnknownType(id.to_string()))?;
        let element = component_type
            .spec
            .template
            .clone()
            .ok_or_else(|| BindingError::NoTemplate(id.to_string()))?;
        Ok(Component::build(&component_type.id, &component_type.spec, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{tag_matcher, Slot, SyncRule};
    use serde_json::json;
    use ui_trait_controls::{TraitDescriptor, TraitSeed};

    fn labeled_input_spec() -> ComponentTypeSpec {
        ComponentTypeSpec::new()
            .with_traits([
                TraitSeed::from("label"),
                TraitSeed::from("placeholder"),
                TraitDescriptor::new("required").with_kind("checkbox").into(),
            ])
            .with_attribute("label", json!("My label"))
            .with_attribute("type", json!("text"))
            .with_attribute("required", json!(false))
            .with_rule(SyncRule::attributes(
                Slot::new("input", 1).expecting("input"),
                ["placeholder", "type", "required", "value"],
            ))
            .with_rule(SyncRule::text_content(
                "label",
                Slot::new("label", 0).expecting("label"),
            ))
            .with_template(
                Element::new("div")
                    .with_child(Element::new("label"))
                    .with_child(Element::new("input")),
            )
    }

    fn registry() -> ComponentTypeRegistry {
        let registry = ComponentTypeRegistry::new();
        registry.bind("input", tag_matcher("div"), labeled_input_spec());
        registry
    }

    #[test]
    fn test_defaults_reflected_at_construction() {
        let component = registry().create("input").unwrap();
        let element = component.element();

        assert_eq!(element.children[0].text.as_deref(), Some("My label"));
        assert_eq!(element.children[1].attribute("type"), Some("text"));
        assert_eq!(element.children[1].attribute("required"), Some("false"));
        // Label is text only, never an input attribute
        assert_eq!(element.children[1].attribute("label"), None);
        assert_eq!(element.attribute("label"), Some("My label"));
    }

    #[test]
    fn test_changes_refire_rules() {
        let component = registry().create("input").unwrap();

        component.set_attribute("label", json!("Email"));
        component.set_attribute("placeholder", json!("you@example.com"));
        component.set_attribute("class", json!("wide"));

        let element = component.element();
        assert_eq!(element.children[0].text.as_deref(), Some("Email"));
        assert_eq!(element.children[1].attribute("placeholder"), Some("you@example.com"));
        assert_eq!(element.children[1].attribute("class"), None);
        assert_eq!(element.attribute("class"), Some("wide"));
    }

    #[test]
    fn test_trait_writes_flow_to_descendants() {
        let component = registry().create("input").unwrap();
        let required = component.trait_named("required").unwrap();

        required.set_value(json!(true));
        assert_eq!(component.element().children[1].attribute("required"), Some("true"));
    }

    #[test]
    fn test_element_attributes_override_defaults() {
        let registry = registry();
        let element = Element::new("DIV")
            .with_attribute("type", "password")
            .with_child(Element::new("label"))
            .with_child(Element::new("input"));

        let component = registry.instantiate(element).unwrap();
        assert_eq!(component.type_name(), "input");
        assert_eq!(component.attribute("type"), Some(json!("password")));
        assert_eq!(component.element().children[1].attribute("type"), Some("password"));
    }

    #[test]
    fn test_missing_slots_are_skipped() {
        let registry = registry();
        let component = registry.instantiate(Element::new("div")).unwrap();
        component.set_attribute("label", json!("Still fine"));
        assert!(component.element().children.is_empty());
    }

    #[test]
    fn test_recognition_and_errors() {
        let registry = registry();
        assert!(matches!(
            registry.instantiate(Element::new("span")),
            Err(BindingError::NoMatchingType(ref tag)) if tag == "span"
        ));
        assert!(matches!(registry.create("video"), Err(BindingError::UnknownType(_))));

        // Newest binding wins recognition, duplicate ids are ignored
        assert!(registry.bind("box", tag_matcher("div"), ComponentTypeSpec::new()));
        assert!(!registry.bind("box", tag_matcher("span"), ComponentTypeSpec::new()));
        assert_eq!(registry.recognize(&Element::new("div")).unwrap().id(), "box");
        assert_eq!(registry.ids(), vec!["input".to_string(), "box".to_string()]);
        assert!(matches!(registry.create("box"), Err(BindingError::NoTemplate(_))));
    }

    #[test]
    fn test_one_trait_per_name() {
        let registry = ComponentTypeRegistry::new();
        registry.bind(
            "dup",
            tag_matcher("div"),
            ComponentTypeSpec::new().with_traits(["title", "title"]),
        );
        let component = registry.instantiate(Element::new("div")).unwrap();
        assert_eq!(component.traits().len(), 1);

        assert!(component.attach_trait("subtitle").is_ok());
        assert!(matches!(
            component.attach_trait("title"),
            Err(BindingError::DuplicateTrait { .. })
        ));
    }

    #[test]
    fn test_traits_share_component_store() {
        let component = registry().create("input").unwrap();
        let names: Vec<String> = component.traits().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["label", "placeholder", "required"]);

        let label = component.trait_named("label").unwrap();
        assert_eq!(label.value(), Some(json!("My label")));
    }
}
