use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fountain_assets::{load_cubemap, load_obj};
use fountain_input::{InputEvent, Key};
use fountain_render::{DebugOverlay, execute_frame, plan_frame};
use fountain_render_wgpu::{GpuError, WgpuRenderer};
use fountain_scene::{Camera, FrameContext, SceneConfig, SceneVariant};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Touchpad pixels treated as one wheel line.
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SceneArg {
    Fountain,
    Pool,
}

impl From<SceneArg> for SceneVariant {
    fn from(arg: SceneArg) -> Self {
        match arg {
            SceneArg::Fountain => SceneVariant::Fountain,
            SceneArg::Pool => SceneVariant::Pool,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OverlayArg {
    Reflection,
    Refraction,
}

impl From<OverlayArg> for DebugOverlay {
    fn from(arg: OverlayArg) -> Self {
        match arg {
            OverlayArg::Reflection => DebugOverlay::Reflection,
            OverlayArg::Refraction => DebugOverlay::Refraction,
        }
    }
}

#[derive(Parser)]
#[command(name = "fountain-desktop", about = "Planar water reflection and refraction demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Built-in scene preset
    #[arg(long, value_enum, default_value_t = SceneArg::Fountain)]
    scene: SceneArg,

    /// JSON scene file, used instead of the preset
    #[arg(long)]
    scene_file: Option<PathBuf>,

    /// Directory that relative model and skybox paths are resolved against
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Show an offscreen target in a small quad at the top of the screen
    #[arg(long, value_enum)]
    debug_overlay: Option<OverlayArg>,
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

struct FountainApp {
    scene: SceneConfig,
    overlay: Option<DebugOverlay>,
    ctx: FrameContext,
    /// Events polled since the last frame.
    events: Vec<InputEvent>,
    start: Instant,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    fatal: Option<anyhow::Error>,
}

impl FountainApp {
    fn new(scene: SceneConfig, overlay: Option<DebugOverlay>) -> Self {
        let camera = Camera::new(scene.camera_start);
        Self {
            ctx: FrameContext::new(camera, Default::default()),
            scene,
            overlay,
            events: Vec::new(),
            start: Instant::now(),
            window: None,
            renderer: None,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Fountain")
            .with_inner_size(PhysicalSize::new(
                self.ctx.viewport.width,
                self.ctx.viewport.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        if window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            .is_err()
        {
            tracing::warn!("cursor grab not supported on this platform");
        }
        window.set_cursor_visible(false);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("fountain_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create GPU device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let pool_mesh = match load_obj(&self.scene.pool_model) {
            Ok(mesh) => Some(mesh),
            Err(e) => {
                tracing::error!("pool model not loaded, skipping it: {e}");
                None
            }
        };
        let cubemap = self.scene.skybox.as_ref().map(|sky| load_cubemap(&sky.faces));

        let renderer = WgpuRenderer::new(
            surface,
            device,
            queue,
            config,
            &self.scene,
            pool_mesh.as_ref(),
            cubemap.as_ref(),
        );
        self.ctx.viewport = renderer.viewport();

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.start.elapsed().as_secs_f32();
        let events = std::mem::take(&mut self.events);
        self.ctx.begin_frame(now, &events);
        if self.ctx.should_close() {
            event_loop.exit();
            return;
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let plan = plan_frame(&self.ctx, &self.scene, self.overlay);
        match execute_frame(&plan, renderer) {
            Ok(()) => {}
            Err(GpuError::SurfaceReconfigured) => {
                tracing::debug!("surface reconfigured, frame skipped");
            }
            Err(GpuError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                tracing::error!("out of GPU memory");
                self.fatal = Some(anyhow::anyhow!("out of GPU memory"));
                event_loop.exit();
            }
            Err(e) => tracing::warn!("frame skipped: {e}"),
        }
    }
}

impl ApplicationHandler for FountainApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.events.push(InputEvent::CloseRequested);
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                }
                if new_size.width > 0 && new_size.height > 0 {
                    self.events.push(InputEvent::Resized {
                        width: new_size.width,
                        height: new_size.height,
                    });
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.events.push(InputEvent::Key {
                    key: map_key(code),
                    pressed: state == ElementState::Pressed,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.events.push(InputEvent::Scroll {
                    dy: scroll_lines(delta),
                });
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.events.push(InputEvent::MouseMotion {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("fountain-desktop starting");

    let scene = match &cli.scene_file {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load scene file {}", path.display()))?,
        None => SceneConfig::preset(cli.scene.into()),
    }
    .with_asset_root(&cli.assets);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FountainApp::new(scene, cli.debug_overlay.map(Into::into));
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn movement_keys_map() {
        assert_eq!(map_key(KeyCode::KeyW), Key::W);
        assert_eq!(map_key(KeyCode::KeyD), Key::D);
        assert_eq!(map_key(KeyCode::Escape), Key::Escape);
        assert_eq!(map_key(KeyCode::Space), Key::Other);
    }

    #[test]
    fn scroll_in_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0));
        assert_eq!(scroll_lines(pixels), 2.0);
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["fountain-desktop"]);
        assert!(matches!(cli.scene, SceneArg::Fountain));
        assert!(cli.scene_file.is_none());
        assert!(cli.debug_overlay.is_none());

        let cli = Cli::parse_from(["fountain-desktop", "--scene", "pool", "--debug-overlay", "refraction"]);
        assert_eq!(SceneVariant::from(cli.scene), SceneVariant::Pool);
        assert!(matches!(cli.debug_overlay, Some(OverlayArg::Refraction)));
    }
}
