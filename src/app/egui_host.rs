use crate::ui::{show_inspector, InspectorState, UiEvent};

pub struct EguiFrameOutput {
    pub events: Vec<UiEvent>,
    pub shape_count: usize,
}

/// Owns the egui context the inspector panel runs in. Input arrives as raw
/// egui input so any windowing layer (or none) can drive it.
pub struct EguiHost {
    context: egui::Context,
}

impl EguiHost {
    pub fn new() -> Self {
        Self {
            context: egui::Context::default(),
        }
    }

    pub fn run_inspector(
        &mut self,
        raw_input: egui::RawInput,
        state: &mut InspectorState,
    ) -> EguiFrameOutput {
        let mut events = Vec::new();
        let full_output = self.context.run(raw_input, |ctx| {
            egui::SidePanel::right("inspector").show(ctx, |ui| {
                events.extend(show_inspector(ui, state));
            });
        });

        EguiFrameOutput {
            events,
            shape_count: full_output.shapes.len(),
        }
    }
}
