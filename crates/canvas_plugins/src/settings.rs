//! Plugin options and persisted settings.
//
// Settings live in `canvas.toml` under the platform config directory. A missing
// file is created with defaults on first load; unknown keys are ignored and
// missing keys take their defaults, so older files keep loading.

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use ui_trait_controls::HttpLookupConfig;

/// Lookup service used by `data` traits
pub type LookupSettings = HttpLookupConfig;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Could not determine the config directory")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Options shared by the bundled plugins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Prefix of generated structural classes
    pub style_prefix: String,
    /// Category of the basic blocks
    pub category: String,
    pub label_text: String,
    pub label_link: String,
    pub label_image: String,
    /// Category of the layout blocks
    pub layout_category: String,
    pub flexbox_label: String,
    pub label_row: String,
    pub label_column: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            style_prefix: "gjs-".to_string(),
            category: "Basic".to_string(),
            label_text: "Text".to_string(),
            label_link: "Link".to_string(),
            label_image: "Image".to_string(),
            layout_category: "Layout".to_string(),
            flexbox_label: "Flexbox".to_string(),
            label_row: "Row".to_string(),
            label_column: "Column".to_string(),
        }
    }
}

impl PluginOptions {
    pub fn row_class(&self) -> String {
        format!("{}row", self.style_prefix)
    }

    pub fn cell_class(&self) -> String {
        format!("{}cell", self.style_prefix)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub plugins: PluginOptions,
    pub lookup: LookupSettings,
}

impl CanvasSettings {
    /// `canvas.toml` in the platform config directory
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let proj_dirs =
            ProjectDirs::from("com", "Canvas", "Canvas_Editor").ok_or(SettingsError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("canvas.toml"))
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`, writing defaults there first if it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("No settings at {}, writing defaults", path.display());
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }
        Self::load(path)
    }

    /// Settings from the default location
    pub fn load_default() -> anyhow::Result<Self> {
        let path = Self::default_path()?;
        Self::load_or_init(&path)
            .with_context(|| format!("Failed to load canvas settings from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PluginOptions::default();
        assert_eq!(options.style_prefix, "gjs-");
        assert_eq!(options.category, "Basic");
        assert_eq!(options.row_class(), "gjs-row");
        assert_eq!(options.cell_class(), "gjs-cell");
        assert_eq!(CanvasSettings::default().lookup.field, "/name");
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("canvas.toml");

        let settings = CanvasSettings::load_or_init(&path).unwrap();
        assert_eq!(settings, CanvasSettings::default());
        assert!(path.exists());
        assert_eq!(CanvasSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.toml");
        fs::write(
            &path,
            "[plugins]\nstyle_prefix = \"cv-\"\n\n[lookup]\nendpoint = \"https://example.com/items/{query}\"\n",
        )
        .unwrap();

        let settings = CanvasSettings::load(&path).unwrap();
        assert_eq!(settings.plugins.style_prefix, "cv-");
        assert_eq!(settings.plugins.category, "Basic");
        assert_eq!(settings.lookup.endpoint, "https://example.com/items/{query}");
        assert_eq!(settings.lookup.timeout_secs, 10);
    }

    #[test]
    fn test_round_trip_and_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.toml");

        let mut settings = CanvasSettings::default();
        settings.plugins.label_text = "Paragraph".into();
        settings.save(&path).unwrap();
        assert_eq!(CanvasSettings::load(&path).unwrap(), settings);

        fs::write(&path, "plugins = 3").unwrap();
        assert!(matches!(
            CanvasSettings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
