//! Application shell: window lifecycle, event routing, and the per-frame
//! loop tying the interaction core to the render host and the chrome.
//!
//! Event routing order matters. The chrome sees input first; anything it
//! captures never reaches picking or the camera. Clicks that get through
//! run the pick-select path, and raw device motion drives the orbit camera.

use std::path::PathBuf;
use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix, Vector3};
use log::{info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::assets::{load_system_model, settle_all, LoadOutcome, LoadedModel};
use crate::gfx::{
    camera::{CameraController, OrbitCamera, ViewPreset},
    render_host::RenderHost,
    scene::{SceneGraph, SceneNode},
};
use crate::interact::{
    visibility, LabelProjector, PickingEngine, SelectionController,
};
use crate::model::{add_ground_grid, populate, standard_catalog};
use crate::registry::{AnatomyPart, AnatomyRegistry, GeometryRef, PartMetadata, RegistryError};
use crate::ui::{ChromeAction, UiChrome, UiManager};

/// The anatomy explorer application.
///
/// Construction builds the full catalog scene up front; [`Self::run`] hands
/// control to winit and blocks until the window closes.
pub struct ExplorerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_host: Option<RenderHost>,
    ui_manager: Option<UiManager>,

    registry: AnatomyRegistry,
    scene: SceneGraph,
    grid_index: usize,

    camera: OrbitCamera,
    controller: CameraController,
    picker: PickingEngine,
    selection: SelectionController,
    projector: LabelProjector,
    chrome: UiChrome,

    /// Last cursor position in surface pixels, for picking on click.
    pointer: (f32, f32),
    /// Extra OBJ-backed systems queued before the window exists.
    queued_models: Vec<(String, PathBuf)>,
}

impl ExplorerApp {
    pub async fn new() -> Self {
        let _ = env_logger::try_init();

        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let mut registry = AnatomyRegistry::new();
        let mut scene = SceneGraph::new();
        populate(&mut registry, &mut scene, &standard_catalog())
            .expect("catalog ids are unique");
        let grid_index = add_ground_grid(&mut scene);

        let camera = OrbitCamera::new(12.0, 0.35, 0.25, Vector3::new(0.0, 2.0, 0.0), 1.0);
        let controller = CameraController::new(0.005, 0.1);

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_host: None,
                ui_manager: None,
                registry,
                scene,
                grid_index,
                camera,
                controller,
                picker: PickingEngine::new(),
                selection: SelectionController::new(),
                projector: LabelProjector::new(),
                chrome: UiChrome::new(),
                pointer: (0.0, 0.0),
                queued_models: Vec::new(),
            },
        }
    }

    /// Queues an OBJ model as an additional single-part system.
    ///
    /// Queued models load when the window comes up; a model that fails to
    /// load leaves its system absent and the rest of the scene intact.
    pub fn queue_model(&mut self, system_id: &str, path: impl Into<PathBuf>) {
        self.app_state
            .queued_models
            .push((system_id.to_string(), path.into()));
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl AppState {
    /// Loads every queued model, settling failures as absent systems.
    fn settle_queued_models(&mut self) {
        if self.queued_models.is_empty() {
            return;
        }

        self.chrome.set_pending_systems(
            self.queued_models
                .iter()
                .map(|(id, _)| id.clone())
                .collect(),
        );

        let loads: Vec<_> = self
            .queued_models
            .drain(..)
            .map(|(system_id, path)| load_system_model(system_id, path))
            .collect();

        for outcome in pollster::block_on(settle_all(loads)) {
            self.chrome.mark_system_settled(outcome.system_id());
            if let LoadOutcome::Ready(model) = outcome {
                if let Err(err) = self.install_loaded_model(model) {
                    warn!("could not install loaded model: {err}");
                }
            }
        }
    }

    fn install_loaded_model(&mut self, model: LoadedModel) -> Result<(), RegistryError> {
        self.registry.declare_system(&model.system_id)?;

        let node = SceneNode::from_geometry(
            &model.system_id,
            &model.geometry,
            Matrix4::identity(),
            [0.8, 0.8, 0.8, 1.0],
        );
        let bounds = node.world_bounds();
        let anchor = node.anchor();
        let node_index = self.scene.add_node(node);

        self.registry.register(AnatomyPart {
            id: model.system_id.clone(),
            display_name: model.system_id.clone(),
            system_id: model.system_id,
            geometry: GeometryRef {
                node_index,
                bounds,
                anchor,
            },
            metadata: PartMetadata::new("Imported model.", "", &[]),
        })
    }

    /// Resolves a left click at the tracked pointer position.
    fn handle_click(&mut self) {
        let Some(host) = self.render_host.as_ref() else {
            return;
        };
        let (width, height) = host.surface_size();

        let hit = self.picker.pick(
            self.pointer,
            (width as f32, height as f32),
            &self.camera,
            &self.registry,
        );

        match self
            .selection
            .on_pick(hit.as_ref().map(|h| h.part_id.as_str()), &self.registry)
        {
            Ok(Some(update)) => self.chrome.apply_panel_update(update),
            Ok(None) => {}
            Err(err) => warn!("selection out of sync with picking: {err}"),
        }
    }

    fn apply_actions(&mut self, actions: Vec<ChromeAction>) {
        for action in actions {
            match action {
                ChromeAction::ToggleSystem { system_id, visible } => {
                    if let Err(err) =
                        visibility::set_system_visible(&mut self.registry, &system_id, visible)
                    {
                        warn!("visibility toggle failed: {err}");
                    }
                }
                ChromeAction::SoloSystem(system_id) => {
                    if let Err(err) = visibility::solo_system(&mut self.registry, &system_id) {
                        warn!("solo failed: {err}");
                    }
                }
                ChromeAction::ToggleLabels(show) => self.projector.show_labels = show,
                ChromeAction::ToggleGrid(show) => {
                    if let Some(node) = self.scene.nodes.get_mut(self.grid_index) {
                        node.visible = show;
                    }
                }
                ChromeAction::Search(query) => self.search(&query),
                ChromeAction::SetView(preset) => self.apply_view(preset),
                ChromeAction::ClosePanel => {
                    let update = self.selection.on_close();
                    self.chrome.apply_panel_update(update);
                }
            }
        }
    }

    /// Search selects the first matching part, as if it had been clicked.
    fn search(&mut self, query: &str) {
        let Some(part_id) = self.registry.find_by_name(query).map(|p| p.id.clone()) else {
            info!("no part matches '{}'", query.trim());
            return;
        };

        match self.selection.on_pick(Some(&part_id), &self.registry) {
            Ok(Some(update)) => self.chrome.apply_panel_update(update),
            Ok(None) => {}
            Err(err) => warn!("search selection failed: {err}"),
        }
    }

    fn apply_view(&mut self, preset: ViewPreset) {
        self.camera.apply_preset(preset);
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let Some(host) = self.render_host.as_ref() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        self.scene.sync_visibility(&self.registry);
        host.update_camera(self.camera.uniform);

        let (width, height) = host.surface_size();
        let labels =
            self.projector
                .project(&self.camera, width as f32, height as f32, &self.registry);

        let mut actions = Vec::new();
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let window = window.clone();
            let chrome = &mut self.chrome;
            let registry = &self.registry;

            host.render_frame(&self.scene, |device, queue, encoder, color_attachment| {
                ui_manager.draw(
                    device,
                    queue,
                    encoder,
                    &window,
                    color_attachment,
                    |ui| {
                        actions = chrome.build(ui, registry, &labels);
                    },
                );
            });
        }

        self.apply_actions(actions);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("Anatomy Explorer")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.camera.resize_projection(width, height);

            let window_clone = window_handle.clone();
            let host = pollster::block_on(async move {
                RenderHost::new(window_clone, width, height).await
            });

            self.settle_queued_models();
            self.scene
                .init_gpu_resources(host.device(), host.node_layout());

            let ui_manager = UiManager::new(
                host.device(),
                host.queue(),
                host.surface_format(),
                &window_handle,
            );

            self.ui_manager = Some(ui_manager);
            self.render_host = Some(host);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.render_host.is_none() {
            return;
        }
        let Some(window) = self.window.as_ref().cloned() else {
            return;
        };

        // Track the pointer before any capture check so a click that lands
        // after the chrome releases the mouse picks at the right spot.
        if let WindowEvent::CursorMoved { position, .. } = &event {
            self.pointer = (position.x as f32, position.y as f32);
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click();
                window.request_redraw();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.resize_projection(width, height);
                if let Some(host) = self.render_host.as_mut() {
                    host.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Camera stands down while the chrome holds the mouse or keyboard.
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_input() {
                return;
            }
        }

        self.controller.process_events(&event, window, &mut self.camera);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
