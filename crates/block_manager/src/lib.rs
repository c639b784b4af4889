//! # Block Manager
//!
//! Reusable content fragments ("blocks") and the registry a host palette lists
//! them from. Registration also marks each block's structural wrapper classes
//! private, so they never surface in user-facing style editing.

pub mod definition;
pub mod markup;
pub mod privacy;
pub mod registry;

pub use definition::{BlockContent, BlockDefinition, ComponentContent, PlacementConstraints};
pub use markup::{attrs_to_string, Fragment};
pub use privacy::{PrivateSelectorSet, SelectorPrivacyFilter};
pub use registry::{register, BlockRegistry, PaletteEntry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("Block id must not be empty")]
    EmptyId,

    #[error("Block '{block}' declares an invalid structural class '{class}'")]
    InvalidClass { block: String, class: String },
}
