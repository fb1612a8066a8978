mod egui_host;
mod input;
mod timing;

pub use egui_host::EguiHost;
pub use input::{InputEvent, Session, SessionError};
pub use timing::{sanitize_dt, FrameTiming};

use crate::assets::{
    AssetError, AssetImporter, FurnitureDescriptor, GltfImporter, ImportedAsset, LoadJob,
    LoadTicket, LoadWorker,
};
use crate::config::{ConfigError, EditorConfig, FurniturePlacement};
use crate::furniture::{FurnitureId, FurnitureObject};
use crate::registry::{Registry, RegistryError};
use crate::render::{ray_pick, CameraController, Viewport};
use crate::scene::{MemoryScene, PrimitiveHandle, SceneBackend};
use crate::selection::{SelectionChange, SelectionController};
use crate::ui::{InspectorState, UiEvent};

use glam::Vec3;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

const LOADER_QUEUE_DEPTH: usize = 16;
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Runs once with the freshly registered object, before anything can pick it.
pub type OnLoaded = Box<dyn FnOnce(&FurnitureObject, &mut dyn SceneBackend)>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("load queue rejected {path}")]
    QueueFull { path: String },
}

#[derive(Debug)]
pub enum LoadEvent {
    Loaded {
        ticket: LoadTicket,
        id: FurnitureId,
    },
    Failed {
        ticket: LoadTicket,
        descriptor: Arc<FurnitureDescriptor>,
        error: LoadError,
    },
}

#[derive(Debug)]
pub struct FrameReport {
    pub dt: f32,
    pub load_events: Vec<LoadEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load session {path}: {source}")]
    Session {
        path: String,
        #[source]
        source: SessionError,
    },
}

/// Wires pointer picks, inspector edits and the frame clock to the furniture
/// registry and the selection controller.
pub struct Editor {
    scene: MemoryScene,
    registry: Registry,
    selection: SelectionController,
    loader: LoadWorker,
    pending: HashMap<LoadTicket, Option<OnLoaded>>,
    rejected: Vec<LoadEvent>,
    next_ticket: u64,
    inspector: InspectorState,
    camera: CameraController,
    viewport: Viewport,
    default_texture: String,
    timing: FrameTiming,
}

impl Editor {
    pub fn new(config: &EditorConfig, loader: LoadWorker) -> Self {
        let mut scene = MemoryScene::new(config.asset_root.clone());
        scene.add_ground(config.ground_size, config.ground_size, -1.0);
        let camera = CameraController::orbiting(
            config.camera.target,
            config.camera.yaw,
            config.camera.pitch,
            config.camera.distance,
            config.camera.fov_y_deg,
        );
        Self {
            scene,
            registry: Registry::new(),
            selection: SelectionController::new(),
            loader,
            pending: HashMap::new(),
            rejected: Vec::new(),
            next_ticket: 1,
            inspector: InspectorState::new(config.texture_options.clone()),
            camera,
            viewport: Viewport {
                width: config.viewport.width,
                height: config.viewport.height,
            },
            default_texture: config.default_texture.clone(),
            timing: FrameTiming::new(),
        }
    }

    pub fn scene(&self) -> &MemoryScene {
        &self.scene
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    #[cfg(test)]
    pub fn inspector(&self) -> &InspectorState {
        &self.inspector
    }

    pub fn loads_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Starts loading a new piece of furniture and returns at once. The object
    /// only becomes pickable once `pump_loads` has registered it.
    pub fn request_furniture(
        &mut self,
        descriptor: Arc<FurnitureDescriptor>,
        on_loaded: Option<OnLoaded>,
    ) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        let job = LoadJob {
            ticket,
            descriptor,
        };
        match self.loader.submit(job) {
            Ok(()) => {
                log::debug!("Queued load {:?}", ticket);
                self.pending.insert(ticket, on_loaded);
            }
            Err(job) => {
                self.rejected.push(LoadEvent::Failed {
                    ticket,
                    error: LoadError::QueueFull {
                        path: job.descriptor.mesh_path.clone(),
                    },
                    descriptor: job.descriptor,
                });
            }
        }
        ticket
    }

    /// Registers every finished load and reports failures. Must run on the
    /// editor thread; this is the only place objects enter the registry.
    pub fn pump_loads(&mut self) -> Vec<LoadEvent> {
        let mut events = std::mem::take(&mut self.rejected);
        for result in self.loader.drain() {
            let on_loaded = self.pending.remove(&result.ticket).flatten();
            let outcome = result
                .data
                .map_err(LoadError::from)
                .and_then(|asset| self.complete_load(Arc::clone(&result.descriptor), &asset));
            match outcome {
                Ok(id) => {
                    if let (Some(callback), Some(object)) = (on_loaded, self.registry.get(id)) {
                        callback(object, &mut self.scene);
                    }
                    events.push(LoadEvent::Loaded {
                        ticket: result.ticket,
                        id,
                    });
                }
                Err(error) => {
                    log::warn!("Failed to load {}: {}", result.descriptor.name, error);
                    events.push(LoadEvent::Failed {
                        ticket: result.ticket,
                        descriptor: result.descriptor,
                        error,
                    });
                }
            }
        }
        events
    }

    fn complete_load(
        &mut self,
        descriptor: Arc<FurnitureDescriptor>,
        asset: &ImportedAsset,
    ) -> Result<FurnitureId, LoadError> {
        let handles = self.scene.instantiate(asset);
        let object = FurnitureObject::new(descriptor, handles.clone()).ok_or_else(|| {
            AssetError::EmptyAsset {
                path: asset.path.clone(),
            }
        })?;
        let id = match self.registry.register(object) {
            Ok(id) => id,
            Err(err) => {
                // Nothing may stay pickable without an owner.
                for handle in handles {
                    self.scene.remove(handle);
                }
                return Err(err.into());
            }
        };
        self.registry.debug_assert_consistent();
        if let Some(object) = self.registry.get(id) {
            object.set_material(&mut self.scene, &self.default_texture);
        }
        log::info!(
            "Loaded {} from {}",
            self.registry.get(id).map(|o| o.name()).unwrap_or("furniture"),
            asset.path
        );
        Ok(id)
    }

    /// Applies a pick result and mirrors the new selection into the inspector.
    pub fn handle_pick(&mut self, picked: Option<PrimitiveHandle>) -> SelectionChange {
        let change = self
            .selection
            .resolve_pick(picked, &mut self.registry, &mut self.scene);
        match change {
            SelectionChange::Selected(id) | SelectionChange::Switched { to: id, .. } => {
                if let Some(object) = self.registry.get(id) {
                    let position = object.position(&self.scene);
                    self.inspector.show_selection(object.name(), position);
                }
            }
            SelectionChange::Cleared(_) => self.inspector.clear_selection(),
            SelectionChange::Unchanged => {}
        }
        log::debug!("{:?}, selection now {:?}", change, self.selection.current());
        change
    }

    pub fn handle_pointer(&mut self, screen_x: f32, screen_y: f32) -> SelectionChange {
        let (origin, dir) = self.camera.ray_through(screen_x, screen_y, self.viewport);
        let hit = ray_pick(&self.scene, origin, dir);
        log::debug!("Pointer ({}, {}) -> {:?}", screen_x, screen_y, hit);
        self.handle_pick(hit.map(|hit| hit.handle))
    }

    /// Routes an inspector edit to the current selection. Returns false when
    /// nothing is selected and the edit was dropped.
    pub fn handle_ui(&mut self, event: UiEvent) -> bool {
        let Some(object) = self.selection.current_mut(&mut self.registry) else {
            log::debug!("Ignoring {:?}: nothing selected", event);
            return false;
        };
        match event {
            UiEvent::MaterialChanged { locator } => {
                object.set_material(&mut self.scene, &locator);
                self.inspector.select_texture(&locator);
            }
            UiEvent::AxisChanged { axis, value } => {
                self.inspector.set_axis(axis, value);
                object.set_position(&mut self.scene, self.inspector.axes());
            }
            UiEvent::Extend => object.extend(&mut self.scene),
        }
        true
    }

    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.handle_pointer(x, y);
            }
            InputEvent::PointerMiss => {
                self.handle_pick(None);
            }
            InputEvent::Ui { event } => {
                self.handle_ui(event);
            }
            InputEvent::WaitFrames { .. } | InputEvent::WaitLoads => {}
        }
    }

    /// Per-frame pass over every object, then the backend's resource cleanup.
    pub fn tick(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);
        for object in self.registry.iter_mut() {
            object.tick(&mut self.scene, dt);
        }
        self.scene.collect_garbage();
    }

    pub fn run_inspector(&mut self, host: &mut EguiHost, raw_input: egui::RawInput) -> usize {
        let output = host.run_inspector(raw_input, &mut self.inspector);
        log::trace!("Inspector drew {} shapes", output.shape_count);
        let count = output.events.len();
        for event in output.events {
            self.handle_ui(event);
        }
        count
    }

    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let dt = self.timing.update(now);
        let load_events = self.pump_loads();
        self.tick(dt);
        FrameReport { dt, load_events }
    }
}

fn placement_callback(placement: &FurniturePlacement) -> OnLoaded {
    let position = Vec3::from_array(placement.position);
    let rotation = placement.rotation.map(Vec3::from_array);
    let scaling = placement.scaling.map(Vec3::from_array);
    Box::new(move |object: &FurnitureObject, scene: &mut dyn SceneBackend| {
        object.set_position(scene, position);
        if let Some(rotation) = rotation {
            object.set_rotation(scene, rotation);
        }
        if let Some(scaling) = scaling {
            object.set_scaling(scene, scaling);
        }
    })
}

pub fn run(config_path: Option<&Path>) -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Furnish editor core starting");
    let config = match config_path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    log::info!(
        "Asset root {} ({} furniture requests)",
        config.asset_root.display(),
        config.furniture.len()
    );

    let importer: Arc<dyn AssetImporter> = Arc::new(GltfImporter::new(config.asset_root.clone()));
    let loader = LoadWorker::spawn(Arc::clone(&importer), config.loader_threads, LOADER_QUEUE_DEPTH)
        .unwrap_or_else(|| {
            log::warn!("Falling back to inline asset loading");
            LoadWorker::inline(importer)
        });
    let mut editor = Editor::new(&config, loader);
    for placement in &config.furniture {
        editor.request_furniture(
            Arc::new(placement.descriptor.clone()),
            Some(placement_callback(placement)),
        );
    }

    let mut session = match &config.session {
        Some(path) => Session::load(path).map_err(|source| AppError::Session {
            path: path.display().to_string(),
            source,
        })?,
        None => Session::default(),
    };

    let mut host = EguiHost::new();
    let mut frames = 0u32;
    loop {
        let report = editor.frame(Instant::now());
        for event in &report.load_events {
            if let LoadEvent::Failed { descriptor, .. } = event {
                log::error!(
                    "{} ({}) will not appear in the scene",
                    descriptor.name,
                    descriptor.mesh_path
                );
            }
        }
        for event in session.poll(editor.loads_pending()) {
            editor.apply_input(event);
        }
        editor.run_inspector(&mut host, egui::RawInput::default());

        frames += 1;
        if !editor.loads_pending() && session.is_finished() {
            break;
        }
        if frames >= config.max_frames {
            log::warn!("Stopping after {} frames with loads still pending", frames);
            break;
        }
        std::thread::sleep(FRAME_DURATION);
    }

    let outlined = editor
        .scene()
        .primitives()
        .filter(|(_, state)| state.outline)
        .count();
    log::info!(
        "{} furniture objects live ({} materials), selection: {} ({} primitives outlined)",
        editor.registry().len(),
        editor.scene().materials().material_count(),
        editor.selection().label(editor.registry()).unwrap_or("<none>"),
        outlined
    );
    log::info!("Goodbye");
    Ok(())
}
