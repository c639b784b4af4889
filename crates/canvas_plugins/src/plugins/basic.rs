//! Basic blocks: a labeled input component plus text, link and image blocks.

use block_manager::{register, BlockContent, BlockDefinition, ComponentContent};
use canvas_types::{AttrValue, Element};
use component_types::{ComponentTypeSpec, Matcher, Slot, SyncRule};
use std::sync::Arc;
use ui_trait_controls::{TraitDescriptor, TraitOption, TraitSeed};

use crate::plugin::{CanvasPlugin, PluginContext, PluginError, PluginId, PluginMetadata};
use crate::settings::PluginOptions;

pub const INPUT_TYPE: &str = "input";

/// Attributes copied from the component onto its `<input>` child
pub const INPUT_ATTRIBUTES: [&str; 4] = ["placeholder", "type", "required", "value"];

const INPUT_MEDIA: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
    <path fill="currentColor" d="M22 9c0-.6-.5-1-1.3-1H3.4C2.5 8 2 8.4 2 9v6c0 .6.5 1 1.3 1h17.4c.8 0 1.3-.4 1.3-1V9zm-1 6H3V9h18v6z"></path>
    <path fill="currentColor" d="M4 10h1v4H4z"></path>
  </svg>"#;

const TEXT_MEDIA: &str = r#"<svg viewBox="0 0 24 24">
    <path fill="currentColor" d="M18.5,4L19.66,8.35L18.7,8.61C18.25,7.74 17.79,6.87 17.26,6.43C16.73,6 16.11,6 15.5,6H13V16.5C13,17 13,17.5 13.33,17.75C13.67,18 14.33,18 15,18V19H9V18C9.67,18 10.33,18 10.67,17.75C11,17.5 11,17 11,16.5V6H8.5C7.89,6 7.27,6 6.74,6.43C6.21,6.87 5.75,7.74 5.3,8.61L4.34,8.35L5.5,4H18.5Z" />
  </svg>"#;

const LINK_MEDIA: &str = r#"<svg viewBox="0 0 24 24">
    <path fill="currentColor" d="M3.9,12C3.9,10.29 5.29,8.9 7,8.9H11V7H7A5,5 0 0,0 2,12A5,5 0 0,0 7,17H11V15.1H7C5.29,15.1 3.9,13.71 3.9,12M8,13H16V11H8V13M17,7H13V8.9H17C18.71,8.9 20.1,10.29 20.1,12C20.1,13.71 18.71,15.1 17,15.1H13V17H17A5,5 0 0,0 22,12A5,5 0 0,0 17,7Z" />
  </svg>"#;

const IMAGE_MEDIA: &str = r#"<svg viewBox="0 0 24 24">
    <path fill="currentColor" d="M21,3H3C2,3 1,4 1,5V19A2,2 0 0,0 3,21H21C22,21 23,20 23,19V5C23,4 22,3 21,3M5,17L8.5,12.5L11,15.5L14.5,11L19,17H5Z" />
  </svg>"#;

const INPUT_STYLES: &str = r#"[data-gjs-type="input"] {
  padding: 10px;
  display: flex;
  flex-direction: column;
  gap: 0.25rem;
}
[data-gjs-type="input"][required] label:after {
  content: ' *';
}"#;

pub struct BasicBlocksPlugin {
    options: PluginOptions,
}

impl BasicBlocksPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }
}

impl Default for BasicBlocksPlugin {
    fn default() -> Self {
        Self::new(PluginOptions::default())
    }
}

impl CanvasPlugin for BasicBlocksPlugin {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            id: PluginId::new("com.canvas.basic-blocks"),
            name: "Basic Blocks".to_string(),
            description: "Labeled input component with text, link and image blocks".to_string(),
        }
    }

    fn load(&self, context: &PluginContext) -> Result<(), PluginError> {
        context
            .components
            .bind(INPUT_TYPE, input_matcher(), input_component_spec());

        for class in [self.options.row_class(), self.options.cell_class()] {
            context.privacy.mark_private(&format!(".{}", class));
        }

        for block in basic_blocks(&self.options) {
            register(block, &context.blocks, &context.privacy)?;
        }
        Ok(())
    }
}

/// Bare `<input>` elements, or any element tagged as an input component
fn input_matcher() -> Matcher {
    Arc::new(|element: &Element| {
        element.tag_is("input") || element.attribute("data-gjs-type") == Some(INPUT_TYPE)
    })
}

pub fn input_component_spec() -> ComponentTypeSpec {
    let input_types = ["text", "email", "password", "number"]
        .into_iter()
        .map(|id| TraitOption::new(id, ui_trait_controls::label_from_name(id)))
        .collect();

    ComponentTypeSpec::new()
        .with_traits([
            TraitSeed::from("label"),
            TraitSeed::from("placeholder"),
            TraitDescriptor::new("type")
                .with_kind("select")
                .with_label("Type")
                .with_options(input_types)
                .into(),
            TraitDescriptor::new("required").with_kind("checkbox").into(),
            TraitDescriptor::new("value").with_kind("data").into(),
        ])
        .with_attribute("label", AttrValue::from("My label"))
        .with_attribute("type", AttrValue::from("text"))
        .with_attribute("required", AttrValue::Bool(false))
        .with_rule(SyncRule::attributes(
            Slot::new("input", 1).expecting("input"),
            INPUT_ATTRIBUTES,
        ))
        .with_rule(SyncRule::text_content(
            "label",
            Slot::new("label", 0).expecting("label"),
        ))
        .with_template(
            Element::new("div")
                .with_attribute("data-gjs-type", INPUT_TYPE)
                .with_child(Element::new("label"))
                .with_child(Element::new("input")),
        )
}

pub fn basic_blocks(options: &PluginOptions) -> Vec<BlockDefinition> {
    let category = options.category.as_str();

    vec![
        BlockDefinition::new(
            "input",
            "Input",
            BlockContent::Component(
                ComponentContent::new(INPUT_TYPE)
                    .with_content("<label>My label</label><input type=\"text\"></input>")
                    .with_styles(INPUT_STYLES),
            ),
        )
        .with_category(category)
        .with_media(INPUT_MEDIA)
        .with_select(true)
        .with_activate(true),
        BlockDefinition::new(
            "text",
            options.label_text.as_str(),
            BlockContent::Component(
                ComponentContent::new("text")
                    .with_content("Insert your text here")
                    .with_style("padding", "10px"),
            ),
        )
        .with_category(category)
        .with_media(TEXT_MEDIA)
        .with_select(true)
        .with_activate(true),
        BlockDefinition::new(
            "link",
            options.label_link.as_str(),
            BlockContent::Component(
                ComponentContent::new("link")
                    .with_content("Link")
                    .with_style("color", "#d983a6"),
            ),
        )
        .with_category(category)
        .with_media(LINK_MEDIA)
        .with_select(true),
        BlockDefinition::new(
            "image",
            options.label_image.as_str(),
            BlockContent::Component(ComponentContent::new("image").with_style("color", "black")),
        )
        .with_category(category)
        .with_media(IMAGE_MEDIA)
        .with_select(true)
        .with_activate(true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_manager::PrivateSelectorSet;
    use canvas_types::{LocalEditorHost, SelectorKind};
    use serde_json::json;
    use ui_trait_controls::{DataLookup, LookupError};

    struct Offline;

    #[async_trait::async_trait]
    impl DataLookup for Offline {
        async fn lookup(&self, _query: &str) -> Result<String, LookupError> {
            Err(LookupError::Transport("offline".into()))
        }
    }

    fn context() -> PluginContext {
        PluginContext::with_private_set(
            Arc::new(LocalEditorHost::new()),
            Arc::new(Offline),
            Arc::new(PrivateSelectorSet::new()),
        )
    }

    #[test]
    fn test_registers_blocks_in_order() {
        let context = context();
        BasicBlocksPlugin::default().load(&context).unwrap();

        let ids: Vec<String> = context.blocks.all().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec!["input", "text", "link", "image"]);

        for block in context.blocks.all() {
            assert_eq!(block.category, "Basic");
            assert!(block.select);
            assert_eq!(block.activate, block.id != "link");
        }
    }

    #[test]
    fn test_labels_follow_options() {
        let options = PluginOptions {
            label_text: "Paragraph".into(),
            category: "Forms".into(),
            ..Default::default()
        };
        let blocks = basic_blocks(&options);
        assert_eq!(blocks[1].label, "Paragraph");
        assert!(blocks.iter().all(|b| b.category == "Forms"));
    }

    #[test]
    fn test_input_component_defaults() {
        let context = context();
        BasicBlocksPlugin::default().load(&context).unwrap();

        let component = context.components.create(INPUT_TYPE).unwrap();
        let element = component.element();
        assert_eq!(element.children[0].text.as_deref(), Some("My label"));
        assert_eq!(element.children[1].attribute("type"), Some("text"));
        assert_eq!(element.children[1].attribute("required"), Some("false"));

        let names: Vec<String> = component.traits().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["label", "placeholder", "type", "required", "value"]);

        let select = component.trait_named("type").unwrap();
        let ids: Vec<&str> = select.options().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["text", "email", "password", "number"]);
        assert_eq!(select.options()[2].label, "Password");

        component.set_attribute("value", json!("Luke"));
        assert_eq!(component.element().children[1].attribute("value"), Some("Luke"));
    }

    #[test]
    fn test_recognizes_bare_inputs() {
        let context = context();
        BasicBlocksPlugin::default().load(&context).unwrap();
        let recognized = context.components.recognize(&Element::new("INPUT")).unwrap();
        assert_eq!(recognized.id(), INPUT_TYPE);
    }

    #[test]
    fn test_structural_classes_private() {
        let context = context();
        BasicBlocksPlugin::default().load(&context).unwrap();
        assert!(context.selectors.add(SelectorKind::Class, "gjs-row").is_private());
        assert!(context.selectors.add(SelectorKind::Class, "gjs-cell").is_private());
        assert!(!context.selectors.add(SelectorKind::Class, "hero").is_private());
    }
}
