//! Wind-animated procedural grass field
//!
//! Generates the whole field once at startup, uploads it as static geometry
//! and animates it purely through the shader's time uniform.
//!
//! Usage:
//!   grass_field [config.toml]
//!
//! The optional TOML file may contain `[field]` and `[view]` tables; any
//! omitted value keeps its default. See `grass_field.toml`.
//!
//! Controls:
//!   Left drag — orbit the camera around the field
//!   Escape    — exit

use meadow_field::FieldConfig;
use meadow_render::{
    fov_from_focal_length, AnimationClock, Camera, GpuMesh, OrbitControls, Renderer, RendererConfig,
    ViewConfig,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Everything the demo can be configured with
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    field: FieldConfig,
    view: ViewConfig,
}

/// Errors raised while loading the demo configuration file
#[derive(Debug, thiserror::Error)]
enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn load_config(path: &Path) -> Result<DemoConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn main() {
    env_logger::init();
    log::info!("Starting Meadow grass field");

    let config = match std::env::args_os().nth(1) {
        Some(path) => load_config(Path::new(&path)).unwrap_or_else(|e| {
            log::error!("{}", e);
            std::process::exit(1);
        }),
        None => DemoConfig::default(),
    };

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::new(config);

    event_loop.run_app(&mut app).expect("Event loop error");
}

struct App {
    config: DemoConfig,
    state: Option<RenderContext>,
}

/// Per-window state threaded through every event and frame
struct RenderContext {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    field: GpuMesh,
    view: ViewConfig,
    orbit: OrbitControls,
    clock: AnimationClock,

    // Pointer drag state
    dragging: bool,
    cursor: Option<(f64, f64)>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self { config, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Meadow – Grass Field")
                        .with_inner_size(winit::dpi::LogicalSize::new(1280u32, 720u32)),
                )
                .expect("Failed to create window"),
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("Failed to find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .expect("Failed to create device");

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let renderer = Renderer::new(
            device.clone(),
            queue.clone(),
            RendererConfig {
                width: surface_config.width,
                height: surface_config.height,
                surface_format,
                view: self.config.view.clone(),
            },
        )
        .expect("Failed to create renderer");

        // One-shot generation; the CPU buffers are dropped after upload
        let field = match GpuMesh::generate(&device, &self.config.field) {
            Ok(field) => field,
            Err(e) => {
                log::error!("Failed to build grass field: {}", e);
                event_loop.exit();
                return;
            }
        };

        let orbit = OrbitControls::from_config(&self.config.view);

        self.state = Some(RenderContext {
            window,
            surface,
            device,
            surface_config,
            renderer,
            field,
            view: self.config.view.clone(),
            orbit,
            clock: AnimationClock::new(),
            dragging: false,
            cursor: None,
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else { return };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutting down");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            } => {
                event_loop.exit();
            }

            // ── Orbit drag ────────────────────────────────────────────────────
            WindowEvent::MouseInput { state: button_state, button: MouseButton::Left, .. } => {
                state.dragging = button_state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some((x, y))) = (state.dragging, state.cursor) {
                    let height = state.surface_config.height as f32;
                    state.orbit.rotate((position.x - x) as f32, (position.y - y) as f32, height);
                }
                state.cursor = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                state.cursor = None;
            }

            // ── Window resize ─────────────────────────────────────────────────
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                state.surface_config.width = size.width;
                state.surface_config.height = size.height;
                state.surface.configure(&state.device, &state.surface_config);
                state.renderer.resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                state.render();
                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

impl RenderContext {
    fn render(&mut self) {
        let dt = self.clock.tick();
        log::trace!("Frame delta {:.2} ms", dt * 1000.0);

        let eye = self.orbit.update();
        let aspect = self.renderer.aspect();
        let camera = Camera::perspective(
            eye,
            self.orbit.target,
            glam::Vec3::Y,
            fov_from_focal_length(self.view.focal_length, aspect),
            aspect,
            self.view.near,
            self.view.far,
            self.clock.elapsed_ms(),
        );

        // ── Acquire surface ────────────────────────────────────────────────────
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(e) => { log::warn!("Surface error: {:?}", e); return; }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        if let Err(e) = self.renderer.render(&self.field, &camera, &view) {
            log::error!("Render error: {:?}", e);
        }

        output.present();
    }
}
