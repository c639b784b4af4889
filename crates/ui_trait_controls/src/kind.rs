//! Control kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which control a trait renders as.
///
/// The built-in kinds are matched exhaustively; any other declared type name is
/// carried as [`ControlKind::Extension`] and looked up in the resolver's
/// extension registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    Select,
    Color,
    Checkbox,
    Button,
    Data,
    Extension(String),
}

impl ControlKind {
    pub const BUILTIN: [ControlKind; 6] = [
        ControlKind::Text,
        ControlKind::Select,
        ControlKind::Color,
        ControlKind::Checkbox,
        ControlKind::Button,
        ControlKind::Data,
    ];

    /// Map a declared type name to a kind. Empty means `text`.
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "" | "text" => ControlKind::Text,
            "select" => ControlKind::Select,
            "color" => ControlKind::Color,
            "checkbox" => ControlKind::Checkbox,
            "button" => ControlKind::Button,
            "data" => ControlKind::Data,
            other => ControlKind::Extension(other.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ControlKind::Text => "text",
            ControlKind::Select => "select",
            ControlKind::Color => "color",
            ControlKind::Checkbox => "checkbox",
            ControlKind::Button => "button",
            ControlKind::Data => "data",
            ControlKind::Extension(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, ControlKind::Extension(_))
    }

    /// Whether activating the control writes a value (buttons only dispatch)
    pub fn commits_value(&self) -> bool {
        !matches!(self, ControlKind::Button)
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_round_trip() {
        for kind in ControlKind::BUILTIN {
            assert_eq!(ControlKind::from_type_name(kind.type_name()), kind);
            assert!(kind.is_builtin());
        }
    }

    #[test]
    fn test_unknown_names_are_extensions() {
        assert_eq!(ControlKind::from_type_name(""), ControlKind::Text);
        let kind = ControlKind::from_type_name("slider");
        assert_eq!(kind, ControlKind::Extension("slider".into()));
        assert!(!kind.is_builtin());
        assert_eq!(kind.to_string(), "slider");
    }

    #[test]
    fn test_only_buttons_skip_commit() {
        assert!(!ControlKind::Button.commits_value());
        assert!(ControlKind::Checkbox.commits_value());
        assert!(ControlKind::Extension("x".into()).commits_value());
    }
}
