//! Bundled plugins.

pub mod basic;
pub mod flexbox;

pub use basic::BasicBlocksPlugin;
pub use flexbox::FlexboxPlugin;
