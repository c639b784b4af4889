//! Trait-to-control resolution.
//!
//! `resolve` is a pure function of the trait descriptor and the current store
//! value: it never fails and never writes. Unknown types degrade to a text control.

use canvas_types::{to_dom_string, AttrValue};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::control::{ControlError, ControlIntent};
use crate::kind::ControlKind;
use crate::model::{TraitModel, TraitOption};

/// Renderable description of a control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSpec {
    pub trait_name: String,
    pub label: String,
    /// Kind actually rendered (`Text` when the declared type fell back)
    pub kind: ControlKind,
    pub widget: Widget,
}

/// Widget-level state of a control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    TextInput {
        value: String,
        placeholder: Option<String>,
    },
    Select {
        options: Vec<TraitOption>,
        selected: Option<String>,
    },
    /// Text field plus an adjoining color swatch
    Color {
        text: String,
        placeholder: Option<String>,
        swatch: String,
    },
    Checkbox {
        checked: bool,
    },
    Button {
        caption: String,
    },
    /// Text field with a lookup trigger
    ExternalData {
        value: String,
        pending: bool,
    },
    Custom {
        kind: String,
        props: AttrValue,
    },
}

/// Rendering strategy for a host-registered control kind
pub trait ControlStrategy: Send + Sync {
    /// Widget for the trait in its current state
    fn render(&self, model: &TraitModel) -> Widget;

    /// Value to commit for an intent, or `None` to ignore it.
    /// Text input commits the typed string by default.
    fn interpret(&self, _model: &TraitModel, intent: &ControlIntent) -> Option<AttrValue> {
        match intent {
            ControlIntent::Input(text) => Some(AttrValue::String(text.clone())),
            _ => None,
        }
    }
}

/// Maps traits to control specs. Built-in kinds are handled directly; additional
/// kinds are registered by the host.
#[derive(Default)]
pub struct ControlResolver {
    extensions: RwLock<HashMap<String, Arc<dyn ControlStrategy>>>,
}

impl ControlResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy for a new control kind.
    ///
    /// Built-in type names cannot be overridden. Registering an existing
    /// extension name replaces it.
    pub fn register_extension(
        &self,
        type_name: impl Into<String>,
        strategy: Arc<dyn ControlStrategy>,
    ) -> Result<(), ControlError> {
        let type_name = type_name.into();
        if ControlKind::from_type_name(&type_name).is_builtin() {
            return Err(ControlError::BuiltinKind(type_name));
        }
        if self.extensions.write().insert(type_name.clone(), strategy).is_some() {
            tracing::debug!("Replaced control strategy for '{}'", type_name);
        } else {
            tracing::debug!("Registered control strategy for '{}'", type_name);
        }
        Ok(())
    }

    pub fn extension(&self, type_name: &str) -> Option<Arc<dyn ControlStrategy>> {
        self.extensions.read().get(type_name).cloned()
    }

    /// The kind that will actually be rendered for a trait
    pub fn effective_kind(&self, model: &TraitModel) -> ControlKind {
        match model.control_kind() {
            ControlKind::Extension(name) if !self.extensions.read().contains_key(&name) => {
                tracing::debug!(
                    "No control registered for type '{}' on trait '{}', using text",
                    name,
                    model.name()
                );
                ControlKind::Text
            }
            kind => kind,
        }
    }

    pub fn resolve(&self, model: &TraitModel) -> ControlSpec {
        self.resolve_as(model, self.effective_kind(model))
    }

    /// Render `model` as an already chosen kind. Mounted controls keep the kind
    /// they were mounted with, even if extensions change afterwards.
    pub fn resolve_as(&self, model: &TraitModel, kind: ControlKind) -> ControlSpec {
        let widget = match &kind {
            ControlKind::Text => text_widget(model),
            ControlKind::Select => Widget::Select {
                options: model.options().to_vec(),
                selected: model.value().map(|v| to_dom_string(&v)),
            },
            ControlKind::Color => Widget::Color {
                text: display_string(model.value()),
                placeholder: model.default_value().map(|v| to_dom_string(&v)),
                swatch: display_string(model.value_or_default()),
            },
            ControlKind::Checkbox => Widget::Checkbox {
                checked: model.value_or_default().as_ref().map_or(false, truthy),
            },
            ControlKind::Button => Widget::Button {
                caption: model.label(),
            },
            ControlKind::Data => Widget::ExternalData {
                value: display_string(model.value()),
                pending: false,
            },
            ControlKind::Extension(name) => match self.extension(name) {
                Some(strategy) => strategy.render(model),
                // Removed after the kind was chosen
                None => text_widget(model),
            },
        };

        ControlSpec {
            trait_name: model.name().to_string(),
            label: model.label(),
            kind,
            widget,
        }
    }
}

fn text_widget(model: &TraitModel) -> Widget {
    Widget::TextInput {
        value: display_string(model.value_or_default()),
        placeholder: model.default_value().map(|v| to_dom_string(&v)),
    }
}

fn display_string(value: Option<AttrValue>) -> String {
    value.map(|v| to_dom_string(&v)).unwrap_or_default()
}

/// Checkbox interpretation of a stored value
pub fn truthy(value: &AttrValue) -> bool {
    match value {
        AttrValue::Bool(b) => *b,
        AttrValue::String(s) => s == "true",
        AttrValue::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        _ => false,
    }
}
