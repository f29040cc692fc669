//! Shared value types used by every fountain crate.
//!
//! # Invariants
//! - Types here are plain data: no GPU handles, no I/O.

mod types;

pub use types::{
    ClipPlane, DepthAttachment, Filter, Rgba, SamplerSpec, Viewport, WaterPlane, Wrap,
};

pub fn crate_info() -> &'static str {
    "fountain-common v0.1.0"
}
