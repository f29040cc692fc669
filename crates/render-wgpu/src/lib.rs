//! wgpu render backend for the water scene.
//!
//! Draws the pool model, a cubemap skybox and the planar water surface.
//! Reflection and refraction are rendered into offscreen textures first,
//! then sampled by the water shader in the main pass.
//!
//! # Invariants
//! - One uniform slot per pass; every slot is written before the frame's
//!   single submit, so passes never see each other's matrices.
//! - Offscreen targets use the surface format and are created once.
//! - The renderer never mutates the frame context.

mod cubemap;
mod geometry;
mod gpu;
mod shaders;
mod targets;

pub use cubemap::{CubemapTexture, sampler_descriptor, upload_cubemap};
pub use geometry::{SKYBOX_VERTICES, ScreenVertex, WATER_TILE, debug_quad};
pub use gpu::{GpuError, MAX_WATER_TILES, WgpuRenderer};
pub use targets::{GpuTarget, WgpuTargetAllocator, depth_format};

pub fn crate_info() -> &'static str {
    "fountain-render-wgpu v0.1.0"
}
