//! Asset loading: decodes images and meshes into plain CPU buffers that a
//! render backend uploads once at startup.
//!
//! Per-file failures are reported through [`AssetError`]; callers decide
//! whether a failure is fatal. The cubemap loader never fails as a whole.

mod cubemap;
mod mesh;

pub use cubemap::{CubeFace, CubemapImage, load_cubemap};
pub use mesh::{MeshData, MeshVertex, load_obj};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(
        "cubemap face {} is {width}x{height}, expected {expected}x{expected}",
        .path.display()
    )]
    FaceSize {
        path: PathBuf,
        expected: u32,
        width: u32,
        height: u32,
    },
    #[error("failed to load OBJ {}: {source}", .path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("OBJ {} contains no triangles", .0.display())]
    EmptyMesh(PathBuf),
}

pub fn crate_info() -> &'static str {
    "fountain-assets v0.1.0"
}
