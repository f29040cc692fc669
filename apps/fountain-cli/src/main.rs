use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use fountain_common::{Viewport, WaterPlane};
use fountain_render::{DebugOverlay, DebugTextRenderer, execute_frame, plan_frame};
use fountain_scene::{Camera, FrameContext, MirroredCamera, SceneConfig, SceneVariant};
use glam::Vec3;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fountain-cli", about = "Headless inspection of the water scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

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

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Mirror a camera about the water plane
    Mirror {
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [0.0, 3.0, 5.0])]
        position: Vec<f32>,
        /// Camera yaw in degrees
        #[arg(long, default_value = "-90", allow_negative_numbers = true)]
        yaw: f32,
        /// Camera pitch in degrees
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        pitch: f32,
        /// Water height
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        water: f32,
    },
    /// Describe one frame's passes from the scene's start camera
    Plan {
        #[arg(long, value_enum, default_value_t = SceneArg::Fountain)]
        scene: SceneArg,
        /// JSON scene file, used instead of the preset
        #[arg(long)]
        scene_file: Option<PathBuf>,
        #[arg(long, value_enum)]
        debug_overlay: Option<OverlayArg>,
    },
    /// Print a scene preset as JSON, or write it to a file
    Scene {
        #[arg(long, value_enum, default_value_t = SceneArg::Fountain)]
        scene: SceneArg,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_scene(scene: SceneArg, scene_file: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match scene_file {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load scene file {}", path.display())),
        None => Ok(SceneConfig::preset(scene.into())),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("fountain-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", fountain_common::crate_info());
            println!("input: {}", fountain_input::crate_info());
            println!("scene: {}", fountain_scene::crate_info());
            println!("assets: {}", fountain_assets::crate_info());
            println!("render: {}", fountain_render::crate_info());
        }
        Commands::Mirror {
            position,
            yaw,
            pitch,
            water,
        } => {
            let position = Vec3::from_slice(&position);
            let camera = Camera::with_angles(position, yaw, pitch);
            let mirrored = MirroredCamera::from_camera(&camera, WaterPlane::new(water));
            println!(
                "camera:   pos=({:.3}, {:.3}, {:.3}) yaw={:.1} pitch={:.1}",
                camera.position.x, camera.position.y, camera.position.z, camera.yaw, camera.pitch
            );
            println!(
                "mirrored: pos=({:.3}, {:.3}, {:.3}) yaw={:.1} pitch={:.1} distance={:.3}",
                mirrored.position.x,
                mirrored.position.y,
                mirrored.position.z,
                mirrored.yaw,
                mirrored.pitch,
                mirrored.distance
            );
            println!(
                "front:    ({:.3}, {:.3}, {:.3})",
                mirrored.front.x, mirrored.front.y, mirrored.front.z
            );
        }
        Commands::Plan {
            scene,
            scene_file,
            debug_overlay,
        } => {
            let scene = load_scene(scene, scene_file.as_ref())?;
            let ctx = FrameContext::new(Camera::new(scene.camera_start), Viewport::DEFAULT);
            let plan = plan_frame(&ctx, &scene, debug_overlay.map(Into::into));
            let mut text = DebugTextRenderer::new();
            let Ok(()) = execute_frame(&plan, &mut text);
            print!("{}", text.output());
        }
        Commands::Scene { scene, output } => {
            let scene = SceneConfig::preset(scene.into());
            match output {
                Some(path) => {
                    scene
                        .save(&path)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "scene written");
                }
                None => println!("{}", scene.to_json()?),
            }
        }
    }

    Ok(())
}
