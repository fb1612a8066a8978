use crate::assets::FurnitureDescriptor;
use crate::ui::TextureOption;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_target")]
    pub target: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
    #[serde(default = "CameraConfig::default_distance")]
    pub distance: f32,
    #[serde(default = "CameraConfig::default_fov")]
    pub fov_y_deg: f32,
}

impl CameraConfig {
    fn default_target() -> [f32; 3] {
        [0.0, 0.0, 0.0]
    }

    fn default_distance() -> f32 {
        10.0
    }

    fn default_fov() -> f32 {
        45.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target: Self::default_target(),
            yaw: 0.0,
            pitch: 0.0,
            distance: Self::default_distance(),
            fov_y_deg: Self::default_fov(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// One piece of furniture to spawn at startup and where to put it once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct FurniturePlacement {
    #[serde(flatten)]
    pub descriptor: FurnitureDescriptor,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
    #[serde(default)]
    pub scaling: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default = "EditorConfig::default_texture")]
    pub default_texture: String,
    #[serde(default = "EditorConfig::default_texture_options")]
    pub texture_options: Vec<TextureOption>,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default = "EditorConfig::default_loader_threads")]
    pub loader_threads: usize,
    #[serde(default = "EditorConfig::default_ground_size")]
    pub ground_size: f32,
    #[serde(default = "EditorConfig::default_furniture")]
    pub furniture: Vec<FurniturePlacement>,
    #[serde(default)]
    pub session: Option<PathBuf>,
    #[serde(default = "EditorConfig::default_max_frames")]
    pub max_frames: u32,
}

impl EditorConfig {
    fn default_asset_root() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_texture() -> String {
        "texture/default.png".to_string()
    }

    fn default_texture_options() -> Vec<TextureOption> {
        [
            ("Default", "texture/default.png"),
            ("Green", "texture/green.png"),
            ("Checkerboard", "texture/checkers.png"),
        ]
        .iter()
        .map(|(label, locator)| TextureOption {
            label: label.to_string(),
            locator: locator.to_string(),
        })
        .collect()
    }

    fn default_loader_threads() -> usize {
        2
    }

    fn default_ground_size() -> f32 {
        30.0
    }

    fn default_furniture() -> Vec<FurniturePlacement> {
        let chair = FurnitureDescriptor::new("models/chair/chair.glb", "Chair");
        let shelf = FurnitureDescriptor::new("models/shelf/shelf.glb", "Shelf");
        [
            (&chair, [0.0, 0.0, 0.0]),
            (&chair, [0.0, 0.0, 4.0]),
            (&shelf, [0.0, 4.0, -1.0]),
            (&shelf, [0.0, 4.0, 0.0]),
            (&shelf, [0.0, 4.0, 1.0]),
        ]
        .iter()
        .map(|(descriptor, position)| FurniturePlacement {
            descriptor: (*descriptor).clone(),
            position: *position,
            rotation: None,
            scaling: None,
        })
        .collect()
    }

    fn default_max_frames() -> u32 {
        600
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            asset_root: Self::default_asset_root(),
            default_texture: Self::default_texture(),
            texture_options: Self::default_texture_options(),
            camera: CameraConfig::default(),
            viewport: ViewportConfig::default(),
            loader_threads: Self::default_loader_threads(),
            ground_size: Self::default_ground_size(),
            furniture: Self::default_furniture(),
            session: None,
            max_frames: Self::default_max_frames(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_demo_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config.default_texture, "texture/default.png");
        assert_eq!(config.texture_options.len(), 3);
        assert_eq!(config.furniture.len(), 5);
        assert_eq!(config.furniture[0].descriptor.name, "Chair");
        assert_eq!(config.furniture[4].position, [0.0, 4.0, 1.0]);
        assert_eq!(config.camera.distance, 10.0);
        assert_eq!(config.viewport.width, 1280);
        assert!(config.session.is_none());
    }

    #[test]
    fn placements_flatten_descriptor_fields() {
        let config = EditorConfig::from_json(
            r#"{
                "asset_root": "assets",
                "furniture": [
                    {
                        "mesh_path": "models/table.glb",
                        "name": "Table",
                        "position": [1, 0, 2],
                        "scaling": [1, 2, 1]
                    }
                ],
                "camera": { "distance": 4.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.asset_root, PathBuf::from("assets"));
        assert_eq!(config.furniture.len(), 1);
        let table = &config.furniture[0];
        assert_eq!(table.descriptor.mesh_path, "models/table.glb");
        assert_eq!(table.position, [1.0, 0.0, 2.0]);
        assert_eq!(table.rotation, None);
        assert_eq!(table.scaling, Some([1.0, 2.0, 1.0]));
        assert_eq!(config.camera.distance, 4.0);
        assert_eq!(config.camera.fov_y_deg, 45.0);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = EditorConfig::load(Path::new("/nonexistent/furnish.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
