//! Scene state: the live camera, its mirror image below the water plane,
//! per-frame timing and the authored scene layout.
//!
//! # Invariants
//! - Everything here is pure CPU math. Nothing touches the GPU.
//! - The mirrored camera is derived fresh from the live camera every frame;
//!   it is never stored.
//! - All per-frame state lives in [`FrameContext`], passed explicitly.

pub mod camera;
pub mod config;
pub mod context;
pub mod mirror;
pub mod tiles;
pub mod timing;

pub use camera::Camera;
pub use config::{ModelPlacement, SceneConfig, SceneError, SceneVariant, SkyboxConfig};
pub use context::FrameContext;
pub use mirror::{MirroredCamera, mirror_position};
pub use tiles::TileTransform;
pub use timing::FrameTiming;

pub fn crate_info() -> &'static str {
    "fountain-scene v0.1.0"
}
