//! UI Trait Controls - type-driven mapping from trait descriptors to controls
//!
//! A trait describes one editable property of a component. This crate resolves a
//! trait's declared type to a control ([`ControlResolver::resolve`]), mounts that
//! control against the component's [`AttributeStore`](canvas_types::AttributeStore)
//! ([`Control::mount`]) and turns user intents into single store writes.
//!
//! Built-in kinds are `text`, `select`, `color`, `checkbox`, `button` and `data`.
//! Hosts add kinds with [`ControlResolver::register_extension`]; anything else
//! renders as a text control.

pub mod control;
pub mod external;
pub mod kind;
pub mod lookup;
pub mod model;
pub mod resolver;

pub use control::{Control, ControlContext, ControlError, ControlIntent, ControlOutcome};
pub use external::{ExternalValueResolver, LookupOutcome};
pub use kind::ControlKind;
pub use lookup::{extract_field, DataLookup, HttpLookup, HttpLookupConfig, LookupError};
pub use model::{
    label_from_name, CommandCallback, TraitCommand, TraitDescriptor, TraitModel, TraitOption,
    TraitSeed,
};
pub use resolver::{truthy, ControlResolver, ControlSpec, ControlStrategy, Widget};
