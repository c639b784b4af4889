//! Flexbox layout block: one row holding two cells.

use block_manager::{register, BlockContent, BlockDefinition, Fragment, PlacementConstraints};

use crate::plugin::{CanvasPlugin, PluginContext, PluginError, PluginId, PluginMetadata};
use crate::settings::PluginOptions;

const FLEXBOX_MEDIA: &str = r#"<svg viewBox="0 0 23 24">
    <path fill="currentColor" d="M2 20h8V4H2v16Zm-1 0V4a1 1 0 0 1 1-1h8a1 1 0 0 1 1 1v16a1 1 0 0 1-1 1H2a1 1 0 0 1-1-1ZM13 20h8V4h-8v16Zm-1 0V4a1 1 0 0 1 1-1h8a1 1 0 0 1 1 1v16a1 1 0 0 1-1 1h-8a1 1 0 0 1-1-1Z"/>
  </svg>"#;

pub struct FlexboxPlugin {
    options: PluginOptions,
}

impl FlexboxPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }
}

impl Default for FlexboxPlugin {
    fn default() -> Self {
        Self::new(PluginOptions::default())
    }
}

impl CanvasPlugin for FlexboxPlugin {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            id: PluginId::new("com.canvas.flexbox"),
            name: "Flexbox".to_string(),
            description: "Row and column layout block".to_string(),
        }
    }

    fn load(&self, context: &PluginContext) -> Result<(), PluginError> {
        register(flexbox_block(&self.options), &context.blocks, &context.privacy)?;
        Ok(())
    }
}

pub fn row_fragment(options: &PluginOptions) -> Fragment {
    let row = Fragment::new("div")
        .with_attribute("class", options.row_class())
        .with_constraints(&PlacementConstraints {
            droppable_into: Some(format!(".{}", options.cell_class())),
            ..Default::default()
        })
        .with_attribute("data-gjs-custom-name", options.label_row.as_str());

    let cell = cell_fragment(options);
    row.with_child(cell.clone()).with_child(cell)
}

fn cell_fragment(options: &PluginOptions) -> Fragment {
    Fragment::new("div")
        .with_attribute("class", options.cell_class())
        .with_constraints(&PlacementConstraints {
            draggable_as: Some(format!(".{}", options.row_class())),
            ..Default::default()
        })
        .with_attribute("data-gjs-custom-name", options.label_column.as_str())
        .with_constraints(&PlacementConstraints {
            unstylable_properties: vec!["width".into()],
            stylable_require: vec!["flex-basis".into()],
            ..Default::default()
        })
        .with_attribute("data-gjs-type", "gridColumn")
}

pub fn flexbox_styles(options: &PluginOptions) -> String {
    let row = options.row_class();
    let cell = options.cell_class();
    format!(
        r#".{row} {{
  display: flex;
  justify-content: flex-start;
  align-items: stretch;
  flex-wrap: nowrap;
  padding: 10px;
}}
@media (max-width: 768px) {{
  .{row} {{
    flex-wrap: wrap;
  }}
}}
.{cell} {{
  min-height: 75px;
  flex-grow: 1;
  flex-basis: 100%;
}}
[data-gjs-type="gridColumn"]:empty {{
  text-decoration: none;
  padding: 5px;
}}
[data-gjs-type="gridColumn"]:empty:before {{
  background-color: #ddd;
  color: #000;
  font-size: 16px;
  font-weight: bold;
  font-family: -apple-system, system-ui, BlinkMacSystemFont, "Segoe UI", "Open Sans", Roboto, "Helvetica Neue", Helvetica, Arial, sans-serif;
  height: 100%;
  display: flex;
  align-items: center;
  justify-content: center;
  min-height: 30px;
  padding: 0 10px;
  opacity: 0.3;
  border-radius: 3px;
  white-space: nowrap;
  overflow: hidden;
  text-overflow: ellipsis;
  content: "{column}";
}}"#,
        row = row,
        cell = cell,
        column = options.label_column,
    )
}

pub fn flexbox_block(options: &PluginOptions) -> BlockDefinition {
    let row = row_fragment(options);
    BlockDefinition::new(
        "flexbox",
        options.flexbox_label.as_str(),
        BlockContent::markup_with_style(&row.to_markup(), &flexbox_styles(options)),
    )
    .with_category(options.layout_category.as_str())
    .with_media(FLEXBOX_MEDIA)
    .with_attribute("class", "gjs-fonts gjs-f-b2")
    .with_structural_classes(row.classes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_manager::attrs_to_string;

    #[test]
    fn test_cell_attribute_serialization() {
        let cell = cell_fragment(&PluginOptions::default());
        assert_eq!(
            attrs_to_string(&cell.attributes),
            concat!(
                r#" class="gjs-cell" data-gjs-draggable=".gjs-row" data-gjs-custom-name="Column""#,
                r#" data-gjs-unstylable='["width"]' data-gjs-stylable-require='["flex-basis"]'"#,
                r#" data-gjs-type="gridColumn""#
            )
        );
    }

    #[test]
    fn test_row_markup() {
        let markup = row_fragment(&PluginOptions::default()).to_markup();
        assert!(markup.starts_with(
            r#"<div class="gjs-row" data-gjs-droppable=".gjs-cell" data-gjs-custom-name="Row"><div class="gjs-cell""#
        ));
        assert_eq!(markup.matches(r#"class="gjs-cell""#).count(), 2);
    }

    #[test]
    fn test_block_definition() {
        let block = flexbox_block(&PluginOptions::default());
        assert_eq!(block.id, "flexbox");
        assert_eq!(block.label, "Flexbox");
        assert_eq!(block.category, "Layout");
        assert_eq!(block.private_selectors(), vec![".gjs-row", ".gjs-cell"]);
        assert_eq!(
            block.attributes.get("class").and_then(|v| v.as_str()),
            Some("gjs-fonts gjs-f-b2")
        );

        let BlockContent::Markup(markup) = &block.content else {
            panic!("flexbox content should be markup");
        };
        assert!(markup.contains("<style>.gjs-row {"));
        assert!(markup.contains("content: \"Column\";"));
    }

    #[test]
    fn test_column_placeholder_styles() {
        let styles = flexbox_styles(&PluginOptions::default());
        let placeholder = styles
            .split("[data-gjs-type=\"gridColumn\"]:empty:before {")
            .nth(1)
            .unwrap();
        assert!(placeholder.contains(
            r#"font-family: -apple-system, system-ui, BlinkMacSystemFont, "Segoe UI", "Open Sans", Roboto, "Helvetica Neue", Helvetica, Arial, sans-serif;"#
        ));
        assert!(placeholder.contains("content: \"Column\";"));
    }

    #[test]
    fn test_custom_prefix() {
        let options = PluginOptions {
            style_prefix: "cv-".into(),
            ..Default::default()
        };
        let block = flexbox_block(&options);
        assert_eq!(block.private_selectors(), vec![".cv-row", ".cv-cell"]);
        let BlockContent::Markup(markup) = &block.content else {
            panic!("flexbox content should be markup");
        };
        assert!(markup.contains(r#"data-gjs-droppable=".cv-cell""#));
        assert!(markup.contains(".cv-cell {"));
    }
}
