//! # Canvas Plugins
//!
//! Bundled plugins for the canvas editor and the glue an embedding application
//! needs around them:
//! - [`plugins`]: the basic blocks (labeled input component, text, link, image)
//!   and the flexbox layout block
//! - [`plugin`]: the plugin trait, load context and loader
//! - [`panel`]: trait panels for a selected component
//! - [`settings`]: plugin options and the `canvas.toml` file
//! - [`logging`]: tracing subscriber setup

pub mod logging;
pub mod panel;
pub mod plugin;
pub mod plugins;
pub mod settings;

pub use panel::TraitPanel;
pub use plugin::{CanvasPlugin, PluginContext, PluginError, PluginId, PluginLoader, PluginMetadata};
pub use plugins::{BasicBlocksPlugin, FlexboxPlugin};
pub use settings::{CanvasSettings, LookupSettings, PluginOptions, SettingsError};

/// Load both bundled plugins into `context` with the given options.
pub fn load_bundled(context: PluginContext, options: &PluginOptions) -> PluginLoader {
    let basic = BasicBlocksPlugin::new(options.clone());
    let flexbox = FlexboxPlugin::new(options.clone());
    let plugins: [&dyn CanvasPlugin; 2] = [&basic, &flexbox];
    let mut loader = PluginLoader::new(context);
    loader.load_all(&plugins);
    loader
}
