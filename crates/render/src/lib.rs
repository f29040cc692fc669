//! Rendering Adapter: renderer-agnostic frame plan and pass sequencer.
//!
//! [`plan_frame`] turns the frame context and scene into a [`FramePlan`]:
//! reflection pass, refraction pass, main pass, in that order.
//! [`execute_frame`] drives any [`RenderBackend`] through the plan.
//!
//! # Invariants
//! - The reflection target is bound and unbound before the refraction pass
//!   begins; both finish before the screen is bound.
//! - Clip planes are `(0,1,0,h)`, `(0,-1,0,h)` and all-zero, per pass.
//! - Backends never mutate the frame context.

mod backend;
mod plan;
mod targets;
mod text;

pub use backend::{BackendEvent, RecordingBackend, RenderBackend, execute_frame};
pub use plan::{
    DebugOverlay, DepthCompare, DrawCall, DrawKind, FramePlan, PassKind, PassPlan,
    REFLECTION_SLOT, REFRACTION_SLOT, RenderTarget, plan_frame, rotation_only,
};
pub use targets::{
    OffscreenTargets, TargetAllocator, TargetDescriptor, TargetDiagnostic, TargetStatus,
    setup_offscreen_targets,
};
pub use text::DebugTextRenderer;

pub fn crate_info() -> &'static str {
    "fountain-render v0.1.0"
}
