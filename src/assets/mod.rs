mod loader;

pub use loader::{LoadJob, LoadTicket, LoadWorker};

use glam::{Mat4, Vec3};
use std::path::PathBuf;

/// What to load and how to label it. Shared between every object spawned from
/// the same asset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FurnitureDescriptor {
    pub mesh_path: String,
    pub name: String,
}

impl FurnitureDescriptor {
    pub fn new(mesh_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mesh_path: mesh_path.into(),
            name: name.into(),
        }
    }
}

/// Axis-aligned bounds of one imported primitive in its own space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl PrimitiveBounds {
    #[cfg(test)]
    pub const UNIT: Self = Self {
        min: [-0.5, -0.5, -0.5],
        max: [0.5, 0.5, 0.5],
    };

    /// Box enclosing all eight corners after `matrix` is applied.
    pub fn transformed(&self, matrix: Mat4) -> Self {
        let lo = Vec3::from_array(self.min);
        let hi = Vec3::from_array(self.max);
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in 0..8 {
            let local = Vec3::new(
                if corner & 1 == 0 { lo.x } else { hi.x },
                if corner & 2 == 0 { lo.y } else { hi.y },
                if corner & 4 == 0 { lo.z } else { hi.z },
            );
            let world = matrix.transform_point3(local);
            min = min.min(world);
            max = max.max(world);
        }
        Self {
            min: min.to_array(),
            max: max.to_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedPrimitive {
    pub name: String,
    pub bounds: PrimitiveBounds,
}

/// Geometry-free summary of an asset, enough for the scene backend to
/// instantiate one renderable per primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedAsset {
    pub path: String,
    pub primitives: Vec<ImportedPrimitive>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to import glTF at {path}: {source}")]
    Import {
        path: String,
        #[source]
        source: gltf::Error,
    },
    #[error("asset contains no mesh primitives: {path}")]
    EmptyAsset { path: String },
    #[error("asset not found: {path}")]
    NotFound { path: String },
}

/// Turns an asset locator into primitive data. Runs on loader threads.
pub trait AssetImporter: Send + Sync {
    fn import(&self, path: &str) -> Result<ImportedAsset, AssetError>;
}

/// Reads `.gltf`/`.glb` files relative to an asset root.
pub struct GltfImporter {
    root: PathBuf,
}

impl GltfImporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetImporter for GltfImporter {
    fn import(&self, path: &str) -> Result<ImportedAsset, AssetError> {
        let full_path = self.root.join(path);
        if !full_path.exists() {
            return Err(AssetError::NotFound {
                path: full_path.display().to_string(),
            });
        }
        // Only accessor min/max are read, so buffers and images stay on disk.
        let gltf = gltf::Gltf::open(&full_path).map_err(|source| AssetError::Import {
            path: full_path.display().to_string(),
            source,
        })?;

        let mut primitives = Vec::new();
        if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &mut primitives);
            }
        }

        if primitives.is_empty() {
            return Err(AssetError::EmptyAsset {
                path: path.to_string(),
            });
        }

        log::debug!("Imported {} ({} primitives)", path, primitives.len());
        Ok(ImportedAsset {
            path: path.to_string(),
            primitives,
        })
    }
}

/// One primitive per (node, mesh primitive), with bounds baked into asset space.
fn collect_node(node: &gltf::Node, parent: Mat4, out: &mut Vec<ImportedPrimitive>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        let node_label = node
            .name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("node_{}", node.index()));
        let mesh_label = mesh
            .name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
        for primitive in mesh.primitives() {
            let bounds = primitive.bounding_box();
            let local = PrimitiveBounds {
                min: bounds.min,
                max: bounds.max,
            };
            out.push(ImportedPrimitive {
                name: format!("{}/{}/{}", node_label, mesh_label, primitive.index()),
                bounds: local.transformed(world),
            });
        }
    }
    for child in node.children() {
        collect_node(&child, world, out);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Importer backed by a fixed table; unknown paths fail like a missing file.
    pub(crate) struct TableImporter {
        pub(crate) assets: HashMap<String, usize>,
    }

    impl TableImporter {
        pub(crate) fn new(entries: &[(&str, usize)]) -> Self {
            Self {
                assets: entries
                    .iter()
                    .map(|(path, count)| (path.to_string(), *count))
                    .collect(),
            }
        }
    }

    impl AssetImporter for TableImporter {
        fn import(&self, path: &str) -> Result<ImportedAsset, AssetError> {
            let count = self.assets.get(path).copied().ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            })?;
            if count == 0 {
                return Err(AssetError::EmptyAsset {
                    path: path.to_string(),
                });
            }
            Ok(ImportedAsset {
                path: path.to_string(),
                primitives: (0..count)
                    .map(|index| ImportedPrimitive {
                        name: format!("{}/{}", path, index),
                        bounds: PrimitiveBounds::UNIT,
                    })
                    .collect(),
            })
        }
    }

    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
        }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "meshes": [{
            "name": "seat",
            "primitives": [
                { "attributes": { "POSITION": 0 } },
                { "attributes": { "POSITION": 0 } }
            ]
        }],
        "nodes": [{ "mesh": 0 }],
        "scenes": [{ "nodes": [0] }],
        "scene": 0
    }"#;

    fn temp_asset_dir(tag: &str) -> PathBuf {
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!("furnish_{}_{}_{}", tag, std::process::id(), nonce));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn gltf_importer_reports_every_primitive_with_bounds() {
        let dir = temp_asset_dir("gltf");
        std::fs::write(dir.join("chair.gltf"), TRIANGLE_GLTF).unwrap();

        let importer = GltfImporter::new(&dir);
        let asset = importer.import("chair.gltf").unwrap();
        assert_eq!(asset.path, "chair.gltf");
        assert_eq!(asset.primitives.len(), 2);
        assert_eq!(asset.primitives[0].name, "node_0/seat/0");
        assert_eq!(asset.primitives[1].name, "node_0/seat/1");
        assert_eq!(asset.primitives[0].bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(asset.primitives[0].bounds.max, [1.0, 1.0, 0.0]);

        let _ = std::fs::remove_dir_all(dir);
    }

    const PLACED_TWICE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 36, "uri": "seat.bin" }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "meshes": [{ "name": "seat", "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "nodes": [
            { "name": "root", "children": [1, 2], "scale": [2.0, 2.0, 2.0] },
            { "name": "left", "mesh": 0, "translation": [-5.0, 0.0, 0.0] },
            { "name": "right", "mesh": 0, "translation": [5.0, 0.0, 0.0] }
        ],
        "scenes": [{ "nodes": [0] }],
        "scene": 0
    }"#;

    #[test]
    fn gltf_importer_emits_one_primitive_per_placed_node() {
        let dir = temp_asset_dir("instanced");
        // The buffer file is never written; bounds come from the accessor alone.
        std::fs::write(dir.join("bench.gltf"), PLACED_TWICE_GLTF).unwrap();

        let asset = GltfImporter::new(&dir).import("bench.gltf").unwrap();
        assert_eq!(asset.primitives.len(), 2);
        assert_eq!(asset.primitives[0].name, "left/seat/0");
        assert_eq!(asset.primitives[0].bounds.min, [-10.0, 0.0, 0.0]);
        assert_eq!(asset.primitives[0].bounds.max, [-8.0, 2.0, 0.0]);
        assert_eq!(asset.primitives[1].name, "right/seat/0");
        assert_eq!(asset.primitives[1].bounds.min, [10.0, 0.0, 0.0]);
        assert_eq!(asset.primitives[1].bounds.max, [12.0, 2.0, 0.0]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn transformed_bounds_cover_rotated_corners() {
        let bounds = PrimitiveBounds {
            min: [0.0, 0.0, 0.0],
            max: [2.0, 1.0, 1.0],
        };
        let rotated = bounds.transformed(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let min = Vec3::from_array(rotated.min);
        let max = Vec3::from_array(rotated.max);
        assert!((min - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        assert!((max - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn gltf_importer_fails_on_missing_file() {
        let dir = temp_asset_dir("missing");
        let importer = GltfImporter::new(&dir);
        let err = importer.import("models/nope.glb").unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn gltf_importer_fails_on_garbage() {
        let dir = temp_asset_dir("garbage");
        std::fs::write(dir.join("broken.gltf"), "not json").unwrap();
        let importer = GltfImporter::new(&dir);
        let err = importer.import("broken.gltf").unwrap_err();
        assert!(matches!(err, AssetError::Import { .. }));
        let _ = std::fs::remove_dir_all(dir);
    }
}
