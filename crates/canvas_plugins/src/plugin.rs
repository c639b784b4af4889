//! Plugin interface and load-time context.

use block_manager::{BlockError, BlockRegistry, PrivateSelectorSet, SelectorPrivacyFilter};
use canvas_types::{EditorHost, SelectorManager};
use component_types::ComponentTypeRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use ui_trait_controls::{ControlContext, ControlResolver, DataLookup, HttpLookup, LookupError};

use crate::settings::CanvasSettings;

// ============================================================================
// Identity
// ============================================================================

/// Unique plugin identifier (reverse domain notation)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub id: PluginId,
    pub name: String,
    pub description: String,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin '{0}' is already loaded")]
    AlreadyLoaded(PluginId),

    #[error("Block registration failed: {0}")]
    Block(#[from] BlockError),

    #[error("Lookup service misconfigured: {0}")]
    Lookup(#[from] LookupError),
}

// ============================================================================
// Context
// ============================================================================

/// Registries and host services plugins register into.
///
/// Registries are filled once at load time and read for the rest of the
/// process.
#[derive(Clone)]
pub struct PluginContext {
    pub blocks: Arc<BlockRegistry>,
    pub components: Arc<ComponentTypeRegistry>,
    pub selectors: Arc<SelectorManager>,
    pub privacy: Arc<SelectorPrivacyFilter>,
    pub controls: ControlContext,
}

impl PluginContext {
    /// Context over the process-wide private selector set
    pub fn new(host: Arc<dyn EditorHost>, lookup: Arc<dyn DataLookup>) -> Self {
        Self::with_private_set(host, lookup, PrivateSelectorSet::global())
    }

    pub fn with_private_set(
        host: Arc<dyn EditorHost>,
        lookup: Arc<dyn DataLookup>,
        private_set: Arc<PrivateSelectorSet>,
    ) -> Self {
        let selectors = Arc::new(SelectorManager::new());
        let privacy = Arc::new(SelectorPrivacyFilter::new(private_set));
        privacy.attach(&selectors);

        Self {
            blocks: Arc::new(BlockRegistry::new()),
            components: Arc::new(ComponentTypeRegistry::new()),
            selectors,
            privacy,
            controls: ControlContext::new(Arc::new(ControlResolver::new()), host, lookup),
        }
    }

    /// Context whose `data` traits use the configured HTTP lookup
    pub fn from_settings(settings: &CanvasSettings, host: Arc<dyn EditorHost>) -> Result<Self, PluginError> {
        let lookup = HttpLookup::new(settings.lookup.clone())?;
        Ok(Self::new(host, Arc::new(lookup)))
    }
}

// ============================================================================
// Plugins
// ============================================================================

/// A bundle of component types and blocks
pub trait CanvasPlugin: Send + Sync {
    fn metadata(&self) -> PluginMetadata;

    /// Register everything the plugin provides. Called once per context.
    fn load(&self, context: &PluginContext) -> Result<(), PluginError>;
}

/// Loads plugins into a context, at most once each
pub struct PluginLoader {
    context: PluginContext,
    loaded: Vec<PluginMetadata>,
}

impl PluginLoader {
    pub fn new(context: PluginContext) -> Self {
        Self {
            context,
            loaded: Vec::new(),
        }
    }

    pub fn context(&self) -> &PluginContext {
        &self.context
    }

    pub fn loaded(&self) -> &[PluginMetadata] {
        &self.loaded
    }

    pub fn load(&mut self, plugin: &dyn CanvasPlugin) -> Result<(), PluginError> {
        let metadata = plugin.metadata();
        if self.loaded.iter().any(|m| m.id == metadata.id) {
            return Err(PluginError::AlreadyLoaded(metadata.id));
        }

        plugin.load(&self.context)?;
        tracing::info!("Loaded plugin: {} ({})", metadata.name, metadata.id);
        self.loaded.push(metadata);
        Ok(())
    }

    /// Load each plugin, logging and skipping the ones that fail.
    pub fn load_all(&mut self, plugins: &[&dyn CanvasPlugin]) -> usize {
        let mut count = 0;
        for plugin in plugins {
            match self.load(*plugin) {
                Ok(()) => count += 1,
                Err(e) => tracing::error!("Failed to load plugin {}: {}", plugin.metadata().id, e),
            }
        }
        count
    }
}
