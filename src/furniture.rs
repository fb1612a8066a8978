//! Furniture domain objects.
//!
//! A `FurnitureObject` groups every scene primitive produced by one asset
//! load under a single identity. All mutations fan out to each owned
//! primitive so a compound asset always moves, scales and re-skins as one.

use crate::assets::FurnitureDescriptor;
use crate::scene::{PrimitiveHandle, SceneBackend};
use glam::Vec3;
use std::sync::Arc;

/// Scale applied by `extend`; stretches along X only.
pub const EXTEND_SCALE: Vec3 = Vec3::new(2.0, 1.0, 1.0);

const MATERIAL_NAME: &str = "FurnitureMaterial";

/// Registry-assigned identity, stable for the life of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FurnitureId(pub(crate) u32);

impl FurnitureId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct FurnitureObject {
    id: FurnitureId,
    descriptor: Arc<FurnitureDescriptor>,
    primitives: Vec<PrimitiveHandle>,
    selected: bool,
}

impl FurnitureObject {
    /// Builds a fully loaded object. Returns `None` for an empty primitive set
    /// since an object without geometry can never be picked or edited.
    pub fn new(
        descriptor: Arc<FurnitureDescriptor>,
        primitives: Vec<PrimitiveHandle>,
    ) -> Option<Self> {
        if primitives.is_empty() {
            return None;
        }
        Some(Self {
            id: FurnitureId(u32::MAX),
            descriptor,
            primitives,
            selected: false,
        })
    }

    pub fn id(&self) -> FurnitureId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: FurnitureId) {
        self.id = id;
    }

    pub fn descriptor(&self) -> &FurnitureDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn primitives(&self) -> &[PrimitiveHandle] {
        &self.primitives
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Two objects are the same piece of furniture if they share any primitive.
    pub fn equals(&self, other: &FurnitureObject) -> bool {
        self.primitives
            .iter()
            .any(|handle| other.primitives.contains(handle))
    }

    /// Enables outline rendering. Returns false when already selected.
    pub fn select(&mut self, scene: &mut dyn SceneBackend) -> bool {
        if self.selected {
            return false;
        }
        log::info!("Selected {}", self.descriptor.name);
        for &handle in &self.primitives {
            scene.set_outline(handle, true);
        }
        self.selected = true;
        true
    }

    /// Disables outline rendering. Returns false when not selected.
    pub fn deselect(&mut self, scene: &mut dyn SceneBackend) -> bool {
        if !self.selected {
            return false;
        }
        log::info!("Deselected {}", self.descriptor.name);
        for &handle in &self.primitives {
            scene.set_outline(handle, false);
        }
        self.selected = false;
        true
    }

    pub fn set_position(&self, scene: &mut dyn SceneBackend, position: Vec3) {
        for &handle in &self.primitives {
            scene.set_position(handle, position);
        }
    }

    pub fn set_rotation(&self, scene: &mut dyn SceneBackend, rotation: Vec3) {
        for &handle in &self.primitives {
            scene.set_rotation(handle, rotation);
        }
    }

    pub fn set_scaling(&self, scene: &mut dyn SceneBackend, scaling: Vec3) {
        for &handle in &self.primitives {
            scene.set_scaling(handle, scaling);
        }
    }

    pub fn locally_translate(&self, scene: &mut dyn SceneBackend, offset: Vec3) {
        for &handle in &self.primitives {
            scene.translate_local(handle, offset);
        }
    }

    /// Position of the first primitive; all primitives share it after `set_position`.
    pub fn position(&self, scene: &dyn SceneBackend) -> Vec3 {
        self.primitives
            .first()
            .and_then(|handle| scene.transform(*handle))
            .map(|transform| transform.position)
            .unwrap_or(Vec3::ZERO)
    }

    /// Assigns one new material sampling `texture_locator` to every primitive.
    /// The previous material is left for the backend's garbage pass.
    pub fn set_material(&self, scene: &mut dyn SceneBackend, texture_locator: &str) {
        let texture = scene.create_texture(texture_locator);
        let material = scene.create_material(MATERIAL_NAME, texture, texture);
        for &handle in &self.primitives {
            scene.assign_material(handle, material);
        }
        log::debug!("{} material -> {}", self.descriptor.name, texture_locator);
    }

    pub fn extend(&self, scene: &mut dyn SceneBackend) {
        self.set_scaling(scene, EXTEND_SCALE);
    }

    /// Per-frame hook. `dt` has already been sanitized by the frame driver.
    pub fn tick(&mut self, _scene: &mut dyn SceneBackend, _dt: f32) {}
}
