//! Trait data model.
//!
//! A trait is one editable property of a component. Its descriptor is plain data
//! (deserializable from plugin definitions); its value lives in the owning
//! component's [`AttributeStore`] under the trait name.

use canvas_types::{AttrValue, AttributeStore, EditorHost};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::kind::ControlKind;

/// Direct command callable, invoked with the editor and the trait that triggered it
pub type CommandCallback = Arc<dyn Fn(&dyn EditorHost, &TraitModel) + Send + Sync>;

/// What a `button` trait runs on activation
#[derive(Clone)]
pub enum TraitCommand {
    /// Identifier resolved against the host command registry
    Id(String),
    /// Callable invoked directly, bypassing the registry
    Callback(CommandCallback),
}

impl TraitCommand {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&dyn EditorHost, &TraitModel) + Send + Sync + 'static,
    {
        TraitCommand::Callback(Arc::new(f))
    }

    /// An empty identifier is treated as no command at all
    pub fn is_empty(&self) -> bool {
        matches!(self, TraitCommand::Id(id) if id.trim().is_empty())
    }
}

impl fmt::Debug for TraitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitCommand::Id(id) => f.debug_tuple("Id").field(id).finish(),
            TraitCommand::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for TraitCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TraitCommand::Id)
    }
}

impl Serialize for TraitCommand {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TraitCommand::Id(id) => serializer.serialize_str(id),
            TraitCommand::Callback(_) => serializer.serialize_none(),
        }
    }
}

/// One entry of a `select` trait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitOption {
    pub id: String,
    #[serde(alias = "name")]
    pub label: String,
}

impl TraitOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Static description of a trait
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraitDescriptor {
    pub name: String,
    /// Declared type identifier (`text`, `select`, ...). Absent means `text`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<TraitOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<TraitCommand>,
}

impl TraitDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, value: AttrValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options(mut self, options: Vec<TraitOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_command(mut self, command: TraitCommand) -> Self {
        self.command = Some(command);
        self
    }
}

/// How traits are declared on a component type: either a bare name (a text
/// trait) or a full descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitSeed {
    Name(String),
    Descriptor(TraitDescriptor),
}

impl TraitSeed {
    pub fn name(&self) -> &str {
        match self {
            TraitSeed::Name(name) => name,
            TraitSeed::Descriptor(descriptor) => &descriptor.name,
        }
    }

    pub fn into_descriptor(self) -> TraitDescriptor {
        match self {
            TraitSeed::Name(name) => TraitDescriptor::new(name),
            TraitSeed::Descriptor(descriptor) => descriptor,
        }
    }
}

impl From<&str> for TraitSeed {
    fn from(name: &str) -> Self {
        TraitSeed::Name(name.to_string())
    }
}

impl From<TraitDescriptor> for TraitSeed {
    fn from(descriptor: TraitDescriptor) -> Self {
        TraitSeed::Descriptor(descriptor)
    }
}

/// A trait attached to a live component.
///
/// The model never caches the value: reads go to the component's store, so every
/// control and panel observes the same state.
pub struct TraitModel {
    descriptor: TraitDescriptor,
    store: AttributeStore,
}

impl fmt::Debug for TraitModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraitModel")
            .field("descriptor", &self.descriptor)
            .field("value", &self.value())
            .finish()
    }
}

impl TraitModel {
    pub fn new(descriptor: TraitDescriptor, store: AttributeStore) -> Self {
        Self { descriptor, store }
    }

    pub fn descriptor(&self) -> &TraitDescriptor {
        &self.descriptor
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Declared type identifier, `text` when absent
    pub fn type_name(&self) -> &str {
        self.descriptor
            .kind
            .as_deref()
            .filter(|kind| !kind.is_empty())
            .unwrap_or("text")
    }

    pub fn control_kind(&self) -> ControlKind {
        ControlKind::from_type_name(self.type_name())
    }

    /// Display label, derived from the name when not declared
    pub fn label(&self) -> String {
        match &self.descriptor.label {
            Some(label) => label.clone(),
            None => label_from_name(&self.descriptor.name),
        }
    }

    /// Fallback value, falling back further to the placeholder text
    pub fn default_value(&self) -> Option<AttrValue> {
        self.descriptor
            .default_value
            .clone()
            .filter(|value| !value.is_null())
            .or_else(|| self.descriptor.placeholder.clone().map(AttrValue::String))
    }

    /// Current value in the backing store
    pub fn value(&self) -> Option<AttrValue> {
        self.store.get(&self.descriptor.name).filter(|value| !value.is_null())
    }

    /// Current value, or the default when the value is absent
    pub fn value_or_default(&self) -> Option<AttrValue> {
        self.value().or_else(|| self.default_value())
    }

    pub fn options(&self) -> &[TraitOption] {
        &self.descriptor.options
    }

    pub fn option(&self, id: &str) -> Option<&TraitOption> {
        self.descriptor.options.iter().find(|option| option.id == id)
    }

    pub fn command(&self) -> Option<&TraitCommand> {
        self.descriptor.command.as_ref().filter(|command| !command.is_empty())
    }

    /// Programmatic write (host `setValue`). Controls write through their own
    /// claimed writer instead.
    pub fn set_value(&self, value: AttrValue) -> bool {
        self.store.set(&self.descriptor.name, value)
    }
}

/// `first_name` / `first-name` -> `First Name`
pub fn label_from_name(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_derivation() {
        assert_eq!(label_from_name("label"), "Label");
        assert_eq!(label_from_name("first_name"), "First Name");
        assert_eq!(label_from_name("data-source"), "Data Source");
        assert_eq!(label_from_name(""), "");
    }

    #[test]
    fn test_seed_shorthand_and_descriptor() {
        let seeds: Vec<TraitSeed> = serde_json::from_value(json!([
            "placeholder",
            {
                "type": "select",
                "name": "type",
                "label": "Type",
                "options": [{"id": "text", "name": "Text"}, {"id": "email", "label": "Email"}]
            },
            {"type": "button", "name": "open", "command": "open-code"}
        ]))
        .unwrap();

        assert_eq!(seeds[0].name(), "placeholder");
        let select = seeds[1].clone().into_descriptor();
        assert_eq!(select.kind.as_deref(), Some("select"));
        assert_eq!(select.options[0], TraitOption::new("text", "Text"));
        assert_eq!(select.options[1].label, "Email");

        let button = seeds[2].clone().into_descriptor();
        assert!(matches!(button.command, Some(TraitCommand::Id(ref id)) if id == "open-code"));
    }

    #[test]
    fn test_value_reads_through_store() {
        let store = AttributeStore::new();
        let model = TraitModel::new(TraitDescriptor::new("title"), store.clone());
        assert_eq!(model.type_name(), "text");
        assert!(model.value().is_none());

        store.set("title", json!("Hello"));
        assert_eq!(model.value(), Some(json!("Hello")));

        assert!(model.set_value(json!("World")));
        assert_eq!(store.get("title"), Some(json!("World")));
    }

    #[test]
    fn test_default_falls_back_to_placeholder() {
        let store = AttributeStore::new();
        let with_default = TraitModel::new(
            TraitDescriptor::new("color")
                .with_default(json!("#ffffff"))
                .with_placeholder("pick"),
            store.clone(),
        );
        assert_eq!(with_default.default_value(), Some(json!("#ffffff")));

        let placeholder_only =
            TraitModel::new(TraitDescriptor::new("hint").with_placeholder("Type here"), store);
        assert_eq!(placeholder_only.default_value(), Some(json!("Type here")));
        assert_eq!(placeholder_only.value_or_default(), Some(json!("Type here")));
    }

    #[test]
    fn test_empty_command_is_ignored() {
        let model = TraitModel::new(
            TraitDescriptor::new("run").with_command(TraitCommand::Id("  ".into())),
            AttributeStore::new(),
        );
        assert!(model.command().is_none());
    }
}
