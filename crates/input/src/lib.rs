//! Input layer: raw window events in, camera actions out.
//!
//! # Invariants
//! - No dependency on a windowing library. Apps translate their native
//!   events into [`InputEvent`] and drain them once per frame.
//! - Held movement keys produce one movement per frame, scaled later by
//!   delta time.

pub mod action;
pub mod event;
pub mod state;

pub use action::{Action, Movement};
pub use event::{InputEvent, Key};
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "fountain-input v0.1.0"
}
