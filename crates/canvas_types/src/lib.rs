//! # Canvas Types
//!
//! Shared vocabulary between the canvas customization crates and the host editor.
//!
//! The host editor runtime (canvas rendering, undo/redo, persistence) is not part of
//! this workspace. It is reached only through the narrow surfaces defined here:
//! - [`AttributeStore`]: the single authoritative store of a component's attributes,
//!   with change events keyed by attribute name
//! - [`EditorHost`]: command dispatch and the host's standard error channel
//! - [`SelectorManager`]: the style selector registry with its `private` flag
//! - [`Element`]: the DOM-like shape components are matched against and rendered into

pub mod element;
pub mod host;
pub mod selectors;
pub mod store;

pub use element::Element;
pub use host::{EditorHost, HostError, LocalEditorHost};
pub use selectors::{Selector, SelectorEvent, SelectorKind, SelectorManager};
pub use store::{AttrWriter, AttributeChange, AttributeStore, StoreError, SubscriptionId};

/// Attribute and trait values travel as JSON values.
///
/// Primitive values (strings, numbers, booleans) are what most traits hold; sequences
/// and maps appear in block placement attributes.
pub type AttrValue = serde_json::Value;

/// Ordered attribute map. Insertion order is preserved so serialized markup is stable.
pub type AttrMap = serde_json::Map<String, AttrValue>;

/// Render an attribute value the way a DOM `setAttribute` call would stringify it.
///
/// Strings are written verbatim, everything else uses its JSON text
/// (`false` becomes `"false"`, `["width"]` becomes `"[\"width\"]"`).
pub fn to_dom_string(value: &AttrValue) -> String {
    match value {
        AttrValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Returns true for values that need the structured quoting convention
/// (sequences and key/value maps).
pub fn is_structured(value: &AttrValue) -> bool {
    matches!(value, AttrValue::Array(_) | AttrValue::Object(_))
}
