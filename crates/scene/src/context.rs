use crate::camera::Camera;
use crate::mirror::MirroredCamera;
use crate::timing::FrameTiming;
use fountain_common::{Viewport, WaterPlane};
use fountain_input::{Action, InputEvent, InputState};
use glam::Mat4;

/// Everything the frame loop mutates: camera, timing, held input and the
/// output size. Passed explicitly to input handling and rendering.
#[derive(Debug)]
pub struct FrameContext {
    pub camera: Camera,
    pub timing: FrameTiming,
    pub viewport: Viewport,
    pub input: InputState,
    should_close: bool,
}

impl FrameContext {
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self {
            camera,
            timing: FrameTiming::new(),
            viewport,
            input: InputState::new(),
            should_close: false,
        }
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Top of the frame: advance timing to `now`, then apply the events
    /// polled since the previous frame. Returns the delta time.
    pub fn begin_frame(&mut self, now: f32, events: &[InputEvent]) -> f32 {
        let dt = self.timing.tick(now);
        for action in self.input.process(events) {
            self.apply(action, dt);
        }
        dt
    }

    pub fn apply(&mut self, action: Action, dt: f32) {
        match action {
            Action::Quit => {
                tracing::info!("quit requested");
                self.should_close = true;
            }
            Action::Move(direction) => self.camera.process_movement(direction, dt),
            Action::Look { x_offset, y_offset } => self.camera.process_look(x_offset, y_offset),
            Action::Zoom(lines) => self.camera.process_zoom(lines),
            Action::Resize { width, height } => {
                tracing::debug!(width, height, "viewport resized");
                self.viewport = Viewport::new(width, height);
            }
        }
    }

    pub fn mirrored_camera(&self, water: WaterPlane) -> MirroredCamera {
        MirroredCamera::from_camera(&self.camera, water)
    }

    pub fn projection(&self, near: f32, far: f32) -> Mat4 {
        self.camera
            .projection_matrix(self.viewport.aspect(), near, far)
    }
}
