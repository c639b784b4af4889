//! # Component Types
//!
//! Binds DOM shapes to component behavior. A component type pairs a matcher with
//! default traits, default attributes and sync rules that keep slot descendants
//! in step with the component's attribute store.

pub mod binding;
pub mod component;
pub mod registry;

pub use binding::{tag_matcher, ComponentTypeSpec, Matcher, Slot, SyncRule};
pub use component::Component;
pub use registry::{ComponentType, ComponentTypeRegistry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("No component type matches <{0}>")]
    NoMatchingType(String),

    #[error("Unknown component type '{0}'")]
    UnknownType(String),

    #[error("Component type '{0}' has no template to create from")]
    NoTemplate(String),

    #[error("Component '{component}' already has a trait named '{name}'")]
    DuplicateTrait { component: String, name: String },
}
