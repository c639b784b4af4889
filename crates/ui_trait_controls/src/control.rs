//! Mounted controls.
//!
//! A `Control` is the live binding between one trait and its widget. It holds the
//! only writer for the trait's attribute and turns user intents into at most one
//! store write each. Every failure is handled here and reported to the host; the
//! returned `Result` is informational and never needs to be propagated further.

use canvas_types::{AttrValue, AttrWriter, EditorHost, HostError, StoreError};
use std::fmt;
use std::sync::Arc;

use crate::external::ExternalValueResolver;
use crate::kind::ControlKind;
use crate::lookup::DataLookup;
use crate::model::{TraitCommand, TraitModel};
use crate::resolver::{ControlResolver, ControlSpec, Widget};

/// Errors produced while mounting or driving a control
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("Cannot mount control for '{name}': {source}")]
    Mount {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("Control type '{0}' is built in and cannot be replaced")]
    BuiltinKind(String),

    #[error("{kind} control on '{name}' does not accept {intent}")]
    UnsupportedIntent {
        kind: ControlKind,
        name: String,
        intent: &'static str,
    },

    #[error("'{value}' is not an option of '{name}'")]
    UnknownOption { name: String, value: String },

    #[error("Command for '{name}' failed: {source}")]
    Command {
        name: String,
        #[source]
        source: HostError,
    },
}

/// A user action on a control
#[derive(Debug, Clone, PartialEq)]
pub enum ControlIntent {
    /// Text typed into a text-like field
    Input(String),
    /// Option picked from a select, by option id
    Select(String),
    /// Color committed from the native picker swatch
    PickColor(String),
    /// Checkbox state changed
    Toggle(bool),
    /// Button pressed
    Activate,
}

impl ControlIntent {
    fn name(&self) -> &'static str {
        match self {
            ControlIntent::Input(_) => "input",
            ControlIntent::Select(_) => "select",
            ControlIntent::PickColor(_) => "pick-color",
            ControlIntent::Toggle(_) => "toggle",
            ControlIntent::Activate => "activate",
        }
    }
}

/// Result of a handled intent
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutcome {
    /// The value was written to the store
    Committed(AttrValue),
    /// The intent carried the value already stored
    Unchanged,
    /// A button command ran
    Dispatched,
    /// Nothing to do (e.g. a button without a command)
    Ignored,
}

/// Everything a control needs from its surroundings
#[derive(Clone)]
pub struct ControlContext {
    pub resolver: Arc<ControlResolver>,
    pub host: Arc<dyn EditorHost>,
    pub lookup: Arc<dyn DataLookup>,
}

impl ControlContext {
    pub fn new(
        resolver: Arc<ControlResolver>,
        host: Arc<dyn EditorHost>,
        lookup: Arc<dyn DataLookup>,
    ) -> Self {
        Self {
            resolver,
            host,
            lookup,
        }
    }
}

enum Binding {
    /// Direct writer for synchronous kinds
    Writer(AttrWriter),
    /// `data` controls write through their resolver
    External(ExternalValueResolver),
    /// Buttons never write
    None,
}

pub struct Control {
    model: Arc<TraitModel>,
    kind: ControlKind,
    binding: Binding,
    context: ControlContext,
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("trait", &self.model.name())
            .field("kind", &self.kind)
            .finish()
    }
}

impl Control {
    /// Bind a control to a trait, claiming the trait's single writer.
    pub fn mount(model: Arc<TraitModel>, context: ControlContext) -> Result<Self, ControlError> {
        let kind = context.resolver.effective_kind(&model);
        let claim = || {
            model.store().claim_writer(model.name()).map_err(|source| ControlError::Mount {
                name: model.name().to_string(),
                source,
            })
        };

        let binding = match kind {
            ControlKind::Data => Binding::External(ExternalValueResolver::new(
                claim()?,
                context.lookup.clone(),
                context.host.clone(),
            )),
            _ if !kind.commits_value() => Binding::None,
            _ => Binding::Writer(claim()?),
        };

        tracing::debug!("Mounted {} control for trait '{}'", kind, model.name());
        Ok(Self {
            model,
            kind,
            binding,
            context,
        })
    }

    pub fn model(&self) -> &Arc<TraitModel> {
        &self.model
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    /// The lookup side of a `data` control
    pub fn external(&self) -> Option<&ExternalValueResolver> {
        match &self.binding {
            Binding::External(external) => Some(external),
            _ => None,
        }
    }

    /// Current renderable state
    pub fn render(&self) -> ControlSpec {
        let mut spec = self.context.resolver.resolve_as(&self.model, self.kind.clone());
        if let (Binding::External(external), Widget::ExternalData { value, pending }) =
            (&self.binding, &mut spec.widget)
        {
            *value = external.shadow();
            *pending = external.is_pending();
        }
        spec
    }

    /// Handle a user intent.
    pub fn dispatch(&self, intent: ControlIntent) -> Result<ControlOutcome, ControlError> {
        let result = self.handle(intent);
        if let Err(err) = &result {
            tracing::warn!("{}", err);
        }
        result
    }

    fn handle(&self, intent: ControlIntent) -> Result<ControlOutcome, ControlError> {
        match (&self.kind, intent) {
            (ControlKind::Text, ControlIntent::Input(text)) => self.commit(AttrValue::String(text)),

            (ControlKind::Select, ControlIntent::Select(id)) => {
                if self.model.option(&id).is_none() {
                    return Err(ControlError::UnknownOption {
                        name: self.model.name().to_string(),
                        value: id,
                    });
                }
                self.commit(AttrValue::String(id))
            }

            // Both entry points share one commit path
            (ControlKind::Color, ControlIntent::Input(color))
            | (ControlKind::Color, ControlIntent::PickColor(color)) => {
                self.commit(AttrValue::String(color))
            }

            (ControlKind::Checkbox, ControlIntent::Toggle(checked)) => {
                self.commit(AttrValue::Bool(checked))
            }

            (ControlKind::Button, ControlIntent::Activate) => self.run_command(),

            (ControlKind::Data, ControlIntent::Input(text)) => match &self.binding {
                Binding::External(external) => Ok(outcome(external.edit(text.clone()), text)),
                _ => self.unsupported("input"),
            },

            (ControlKind::Extension(name), intent) => {
                let interpreted = self
                    .context
                    .resolver
                    .extension(name)
                    .and_then(|strategy| strategy.interpret(&self.model, &intent));
                match interpreted {
                    Some(value) => self.commit(value),
                    None => Ok(ControlOutcome::Ignored),
                }
            }

            (_, intent) => self.unsupported(intent.name()),
        }
    }

    fn commit(&self, value: AttrValue) -> Result<ControlOutcome, ControlError> {
        match &self.binding {
            Binding::Writer(writer) => {
                let changed = writer.commit(value.clone());
                tracing::debug!("Committed '{}' = {}", self.model.name(), value);
                Ok(outcome(changed, value))
            }
            _ => self.unsupported("commit"),
        }
    }

    fn run_command(&self) -> Result<ControlOutcome, ControlError> {
        let Some(command) = self.model.command() else {
            tracing::debug!("Button '{}' has no command", self.model.name());
            return Ok(ControlOutcome::Ignored);
        };

        match command {
            TraitCommand::Id(id) => match self.context.host.run_command(id) {
                Ok(()) => Ok(ControlOutcome::Dispatched),
                Err(source) => {
                    let err = ControlError::Command {
                        name: self.model.name().to_string(),
                        source,
                    };
                    self.context.host.report_error(&err);
                    Err(err)
                }
            },
            TraitCommand::Callback(callback) => {
                callback(self.context.host.as_ref(), &self.model);
                Ok(ControlOutcome::Dispatched)
            }
        }
    }

    fn unsupported(&self, intent: &'static str) -> Result<ControlOutcome, ControlError> {
        Err(ControlError::UnsupportedIntent {
            kind: self.kind.clone(),
            name: self.model.name().to_string(),
            intent,
        })
    }
}

fn outcome(changed: bool, value: impl Into<AttrValue>) -> ControlOutcome {
    if changed {
        ControlOutcome::Committed(value.into())
    } else {
        ControlOutcome::Unchanged
    }
}
