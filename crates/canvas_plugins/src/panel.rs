//! Trait panel: the controls for one selected component, in trait order.

use component_types::Component;
use ui_trait_controls::{Control, ControlContext, ControlError, ControlIntent, ControlOutcome, ControlSpec};

pub struct TraitPanel {
    component_id: u64,
    controls: Vec<Control>,
}

impl TraitPanel {
    /// Mount a control for every trait of `component`.
    ///
    /// Traits whose control cannot be mounted (another panel already owns the
    /// trait) are skipped with a warning, so the rest of the panel still works.
    pub fn mount(component: &Component, context: &ControlContext) -> Self {
        let mut controls = Vec::new();
        for model in component.traits() {
            let name = model.name().to_string();
            match Control::mount(model, context.clone()) {
                Ok(control) => controls.push(control),
                Err(e) => {
                    tracing::warn!("Skipping trait '{}' of component #{}: {}", name, component.id(), e)
                }
            }
        }
        Self {
            component_id: component.id(),
            controls,
        }
    }

    pub fn component_id(&self) -> u64 {
        self.component_id
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, trait_name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.model().name() == trait_name)
    }

    pub fn render(&self) -> Vec<ControlSpec> {
        self.controls.iter().map(Control::render).collect()
    }

    /// Route an intent to the control of `trait_name`.
    pub fn dispatch(&self, trait_name: &str, intent: ControlIntent) -> Option<Result<ControlOutcome, ControlError>> {
        self.control(trait_name).map(|control| control.dispatch(intent))
    }
}
