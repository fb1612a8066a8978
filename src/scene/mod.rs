pub mod material;

pub use material::{MaterialId, MaterialLibrary, TextureId};

use crate::assets::{ImportedAsset, PrimitiveBounds};
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Opaque reference to one renderable primitive owned by a scene backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveHandle(u64);

impl PrimitiveHandle {
    #[cfg(test)]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Parent-space transform of a primitive. Rotation is XYZ Euler radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scaling: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scaling: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scaling, self.rotation_quat(), self.position)
    }
}

/// The per-primitive operations the editor core needs from a renderer.
///
/// Calls naming a handle the backend does not know are ignored.
pub trait SceneBackend {
    fn instantiate(&mut self, asset: &ImportedAsset) -> Vec<PrimitiveHandle>;
    fn remove(&mut self, handle: PrimitiveHandle);
    fn set_outline(&mut self, handle: PrimitiveHandle, enabled: bool);
    fn set_position(&mut self, handle: PrimitiveHandle, position: Vec3);
    fn set_rotation(&mut self, handle: PrimitiveHandle, rotation: Vec3);
    fn set_scaling(&mut self, handle: PrimitiveHandle, scaling: Vec3);
    /// Moves along the primitive's own rotated axes.
    fn translate_local(&mut self, handle: PrimitiveHandle, offset: Vec3);
    fn transform(&self, handle: PrimitiveHandle) -> Option<Transform>;
    fn create_texture(&mut self, locator: &str) -> TextureId;
    fn create_material(&mut self, name: &str, diffuse: TextureId, emissive: TextureId)
        -> MaterialId;
    fn assign_material(&mut self, handle: PrimitiveHandle, material: MaterialId);
}

#[derive(Debug, Clone)]
pub struct PrimitiveState {
    pub name: String,
    pub bounds: PrimitiveBounds,
    pub transform: Transform,
    pub outline: bool,
    pub material: Option<MaterialId>,
}

/// Scene graph kept entirely in memory. Stands in for the GPU renderer: it
/// tracks what a renderer would draw without drawing it.
pub struct MemoryScene {
    primitives: HashMap<PrimitiveHandle, PrimitiveState>,
    next_handle: u64,
    materials: MaterialLibrary,
}

impl MemoryScene {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            primitives: HashMap::new(),
            next_handle: 1,
            materials: MaterialLibrary::new(asset_root),
        }
    }

    pub fn add_primitive(&mut self, name: &str, bounds: PrimitiveBounds) -> PrimitiveHandle {
        let handle = PrimitiveHandle(self.next_handle);
        self.next_handle += 1;
        self.primitives.insert(
            handle,
            PrimitiveState {
                name: name.to_string(),
                bounds,
                transform: Transform::default(),
                outline: false,
                material: None,
            },
        );
        handle
    }

    /// Flat slab with its top face at `height`; used for the floor.
    pub fn add_ground(&mut self, width: f32, depth: f32, height: f32) -> PrimitiveHandle {
        let half_w = width * 0.5;
        let half_d = depth * 0.5;
        let handle = self.add_primitive(
            "ground",
            PrimitiveBounds {
                min: [-half_w, -0.01, -half_d],
                max: [half_w, 0.0, half_d],
            },
        );
        self.set_position(handle, Vec3::new(0.0, height, 0.0));
        handle
    }

    #[cfg(test)]
    pub fn primitive(&self, handle: PrimitiveHandle) -> Option<&PrimitiveState> {
        self.primitives.get(&handle)
    }

    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveHandle, &PrimitiveState)> {
        self.primitives.iter().map(|(handle, state)| (*handle, state))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    /// World-space AABB enclosing the transformed local bounds.
    pub fn world_bounds(&self, handle: PrimitiveHandle) -> Option<(Vec3, Vec3)> {
        let state = self.primitives.get(&handle)?;
        let world = state.bounds.transformed(state.transform.matrix());
        Some((Vec3::from_array(world.min), Vec3::from_array(world.max)))
    }

    /// Frees materials and textures no primitive references anymore.
    pub fn collect_garbage(&mut self) -> usize {
        let in_use: HashSet<MaterialId> = self
            .primitives
            .values()
            .filter_map(|state| state.material)
            .collect();
        self.materials.collect_unreferenced(&in_use)
    }

    fn state_mut(&mut self, handle: PrimitiveHandle) -> Option<&mut PrimitiveState> {
        let state = self.primitives.get_mut(&handle);
        if state.is_none() {
            log::warn!("Unknown primitive {:?}", handle);
        }
        state
    }
}

impl SceneBackend for MemoryScene {
    fn instantiate(&mut self, asset: &ImportedAsset) -> Vec<PrimitiveHandle> {
        asset
            .primitives
            .iter()
            .map(|primitive| self.add_primitive(&primitive.name, primitive.bounds))
            .collect()
    }

    fn remove(&mut self, handle: PrimitiveHandle) {
        if self.primitives.remove(&handle).is_none() {
            log::warn!("Unknown primitive {:?}", handle);
        }
    }

    fn set_outline(&mut self, handle: PrimitiveHandle, enabled: bool) {
        if let Some(state) = self.state_mut(handle) {
            state.outline = enabled;
        }
    }

    fn set_position(&mut self, handle: PrimitiveHandle, position: Vec3) {
        if let Some(state) = self.state_mut(handle) {
            state.transform.position = position;
        }
    }

    fn set_rotation(&mut self, handle: PrimitiveHandle, rotation: Vec3) {
        if let Some(state) = self.state_mut(handle) {
            state.transform.rotation = rotation;
        }
    }

    fn set_scaling(&mut self, handle: PrimitiveHandle, scaling: Vec3) {
        if let Some(state) = self.state_mut(handle) {
            state.transform.scaling = scaling;
        }
    }

    fn translate_local(&mut self, handle: PrimitiveHandle, offset: Vec3) {
        if let Some(state) = self.state_mut(handle) {
            let rotated = state.transform.rotation_quat() * offset;
            state.transform.position += rotated;
        }
    }

    fn transform(&self, handle: PrimitiveHandle) -> Option<Transform> {
        self.primitives.get(&handle).map(|state| state.transform)
    }

    fn create_texture(&mut self, locator: &str) -> TextureId {
        self.materials.create_texture(locator)
    }

    fn create_material(
        &mut self,
        name: &str,
        diffuse: TextureId,
        emissive: TextureId,
    ) -> MaterialId {
        self.materials.create_material(name, diffuse, emissive)
    }

    fn assign_material(&mut self, handle: PrimitiveHandle, material: MaterialId) {
        if let Some(state) = self.state_mut(handle) {
            state.material = Some(material);
        }
    }
}
