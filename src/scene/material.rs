use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct TextureResource {
    pub locator: String,
    /// `None` when the image could not be probed; the texture still exists so
    /// the material stays assignable.
    pub dimensions: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    pub diffuse: TextureId,
    pub emissive: TextureId,
}

/// Owns textures and materials created on behalf of scene primitives.
/// Nothing is freed on reassignment; `collect_unreferenced` reclaims what no
/// primitive uses anymore.
pub struct MaterialLibrary {
    root: PathBuf,
    textures: HashMap<TextureId, TextureResource>,
    texture_by_locator: HashMap<String, TextureId>,
    materials: HashMap<MaterialId, StandardMaterial>,
    next_texture: u32,
    next_material: u32,
}

impl MaterialLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
            texture_by_locator: HashMap::new(),
            materials: HashMap::new(),
            next_texture: 0,
            next_material: 0,
        }
    }

    #[cfg(test)]
    pub fn texture(&self, id: TextureId) -> Option<&TextureResource> {
        self.textures.get(&id)
    }

    #[cfg(test)]
    pub fn material(&self, id: MaterialId) -> Option<&StandardMaterial> {
        self.materials.get(&id)
    }

    #[cfg(test)]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn create_texture(&mut self, locator: &str) -> TextureId {
        if let Some(id) = self.texture_by_locator.get(locator) {
            return *id;
        }
        let dimensions = probe_dimensions(&self.root, locator);
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(
            id,
            TextureResource {
                locator: locator.to_string(),
                dimensions,
            },
        );
        self.texture_by_locator.insert(locator.to_string(), id);
        id
    }

    pub fn create_material(
        &mut self,
        name: &str,
        diffuse: TextureId,
        emissive: TextureId,
    ) -> MaterialId {
        if let Some((width, height)) = self.textures.get(&diffuse).and_then(|t| t.dimensions) {
            log::debug!("Material {} samples a {}x{} texture", name, width, height);
        }
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        self.materials.insert(
            id,
            StandardMaterial {
                name: name.to_string(),
                diffuse,
                emissive,
            },
        );
        id
    }

    /// Drops materials outside `in_use` and then any texture no surviving
    /// material samples. Returns the number of materials dropped.
    pub fn collect_unreferenced(&mut self, in_use: &HashSet<MaterialId>) -> usize {
        let before = self.materials.len();
        self.materials.retain(|id, material| {
            let keep = in_use.contains(id);
            if !keep {
                log::trace!("Dropping material {} ({:?})", material.name, id);
            }
            keep
        });
        let dropped = before - self.materials.len();

        let live_textures: HashSet<TextureId> = self
            .materials
            .values()
            .flat_map(|material| [material.diffuse, material.emissive])
            .collect();
        self.textures.retain(|id, _| live_textures.contains(id));
        self.texture_by_locator = self
            .textures
            .iter()
            .map(|(id, texture)| (texture.locator.clone(), *id))
            .collect();

        if dropped > 0 {
            log::debug!(
                "Reclaimed {} materials ({} textures live)",
                dropped,
                self.textures.len()
            );
        }
        dropped
    }
}

fn probe_dimensions(root: &Path, locator: &str) -> Option<(u32, u32)> {
    let path = root.join(locator);
    match image::image_dimensions(&path) {
        Ok(dimensions) => Some(dimensions),
        Err(err) => {
            log::warn!("Texture {} unavailable: {}", path.display(), err);
            None
        }
    }
}
