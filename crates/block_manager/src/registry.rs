//! Block registry and palette surface.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::definition::{BlockContent, BlockDefinition};
use crate::privacy::SelectorPrivacyFilter;
use crate::BlockError;

// ============================================================================
// Block Registry
// ============================================================================

/// Registered blocks, in registration order
#[derive(Default)]
pub struct BlockRegistry {
    blocks: RwLock<Vec<Arc<BlockDefinition>>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block. A block whose id is already registered is ignored and
    /// `false` is returned.
    pub fn insert(&self, definition: BlockDefinition) -> bool {
        let mut blocks = self.blocks.write();
        if blocks.iter().any(|b| b.id == definition.id) {
            tracing::warn!("Block '{}' is already registered, ignoring", definition.id);
            return false;
        }
        tracing::debug!("Registered block '{}' in '{}'", definition.id, definition.category);
        blocks.push(Arc::new(definition));
        true
    }

    pub fn get(&self, id: &str) -> Option<Arc<BlockDefinition>> {
        self.blocks.read().iter().find(|b| b.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    pub fn all(&self) -> Vec<Arc<BlockDefinition>> {
        self.blocks.read().clone()
    }

    /// Blocks grouped by category. Categories appear in the order their first
    /// block was registered.
    pub fn by_category(&self) -> Vec<(String, Vec<Arc<BlockDefinition>>)> {
        let mut groups: Vec<(String, Vec<Arc<BlockDefinition>>)> = Vec::new();
        for block in self.blocks.read().iter() {
            match groups.iter_mut().find(|(category, _)| *category == block.category) {
                Some((_, members)) => members.push(block.clone()),
                None => groups.push((block.category.clone(), vec![block.clone()])),
            }
        }
        groups
    }

    /// What a host palette lists
    pub fn palette(&self) -> Vec<PaletteEntry> {
        self.blocks.read().iter().map(|b| PaletteEntry::from(b.as_ref())).collect()
    }
}

// ============================================================================
// Palette
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub id: String,
    pub label: String,
    pub category: String,
    pub media: Option<String>,
    pub content: BlockContent,
}

impl From<&BlockDefinition> for PaletteEntry {
    fn from(block: &BlockDefinition) -> Self {
        Self {
            id: block.id.clone(),
            label: block.label.clone(),
            category: block.category.clone(),
            media: block.media.clone(),
            content: block.content.clone(),
        }
    }
}

// ============================================================================
// Composition
// ============================================================================

/// Register a block so it becomes insertable.
///
/// Structural classes are marked private before insertion. A block whose id
/// is already registered is ignored entirely, including its classes. Returns
/// whether the block was newly inserted.
pub fn register(
    definition: BlockDefinition,
    registry: &BlockRegistry,
    privacy: &SelectorPrivacyFilter,
) -> Result<bool, BlockError> {
    if definition.id.trim().is_empty() {
        return Err(BlockError::EmptyId);
    }
    if let Some(class) = definition
        .structural_classes
        .iter()
        .find(|class| class.trim_start_matches('.').trim().is_empty())
    {
        return Err(BlockError::InvalidClass {
            block: definition.id.clone(),
            class: class.clone(),
        });
    }

    if registry.get(&definition.id).is_some() {
        tracing::warn!("Block '{}' is already registered, ignoring", definition.id);
        return Ok(false);
    }

    for selector in definition.private_selectors() {
        privacy.mark_private(&selector);
    }
    Ok(registry.insert(definition))
}
