use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X:",
            Axis::Y => "Y:",
            Axis::Z => "Z:",
        }
    }
}

/// Discrete edits emitted by the inspector. They always target the current
/// selection and are dropped when nothing is selected.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    MaterialChanged { locator: String },
    AxisChanged { axis: Axis, value: f32 },
    Extend,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextureOption {
    pub label: String,
    pub locator: String,
}

/// What the inspector shows: header label, panel visibility, axis fields and
/// the texture choice.
#[derive(Debug, Clone)]
pub struct InspectorState {
    header: String,
    visible: bool,
    axes: [f32; 3],
    texture_options: Vec<TextureOption>,
    selected_texture: usize,
}

impl InspectorState {
    pub fn new(texture_options: Vec<TextureOption>) -> Self {
        Self {
            header: String::new(),
            visible: false,
            axes: [0.0; 3],
            texture_options,
            selected_texture: 0,
        }
    }

    #[cfg(test)]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn axes(&self) -> Vec3 {
        Vec3::from_array(self.axes)
    }

    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        // Empty or unparsable numeric input reads as zero.
        self.axes[axis.index()] = if value.is_finite() { value } else { 0.0 };
    }

    pub fn show_selection(&mut self, name: &str, position: Vec3) {
        self.header = name.to_string();
        self.visible = true;
        self.axes = position.to_array();
    }

    pub fn clear_selection(&mut self) {
        self.header.clear();
        self.visible = false;
    }

    pub fn select_texture(&mut self, locator: &str) {
        if let Some(index) = self
            .texture_options
            .iter()
            .position(|option| option.locator == locator)
        {
            self.selected_texture = index;
        }
    }
}

/// Draws the header and, while something is selected, the inspector controls.
pub fn show_inspector(ui: &mut egui::Ui, state: &mut InspectorState) -> Vec<UiEvent> {
    let mut events = Vec::new();
    ui.heading(state.header.as_str());
    if !state.visible {
        return events;
    }

    if ui.button("Extend").clicked() {
        events.push(UiEvent::Extend);
    }

    let previous_texture = state.selected_texture;
    let selected_label = state
        .texture_options
        .get(state.selected_texture)
        .map(|option| option.label.clone())
        .unwrap_or_default();
    ui.horizontal(|ui| {
        ui.label("Color:");
        egui::ComboBox::from_id_salt("texture_selector")
            .selected_text(selected_label)
            .show_ui(ui, |ui| {
                for (index, option) in state.texture_options.iter().enumerate() {
                    ui.selectable_value(&mut state.selected_texture, index, option.label.as_str());
                }
            });
    });
    if state.selected_texture != previous_texture {
        if let Some(option) = state.texture_options.get(state.selected_texture) {
            events.push(UiEvent::MaterialChanged {
                locator: option.locator.clone(),
            });
        }
    }

    ui.horizontal(|ui| {
        for axis in Axis::ALL {
            ui.label(axis.label());
            let value = &mut state.axes[axis.index()];
            if ui.add(egui::DragValue::new(value).speed(0.1)).changed() {
                events.push(UiEvent::AxisChanged {
                    axis,
                    value: *value,
                });
            }
        }
    });

    events
}
