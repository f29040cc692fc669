use crate::backend::RenderBackend;
use crate::plan::{DepthCompare, DrawCall, PassPlan};

/// Text backend: writes a human-readable description of each pass.
///
/// Useful for CLI output, logging, and checking the sequencer without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    out: String,
    frames: u32,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl RenderBackend for DebugTextRenderer {
    type Error = std::convert::Infallible;

    fn begin_frame(&mut self) -> Result<(), Self::Error> {
        self.frames += 1;
        self.out
            .push_str(&format!("=== Frame {} ===\n", self.frames));
        Ok(())
    }

    fn begin_pass(&mut self, pass: &PassPlan) {
        let eye = pass.view.inverse().transform_point3(glam::Vec3::ZERO);
        let [r, g, b, a] = pass.clear_color.0;
        let [px, py, pz, pw] = pass.clip_plane.to_array();
        self.out.push_str(&format!(
            "[{}] -> {} clear=({r:.1}, {g:.1}, {b:.1}, {a:.1})\n",
            pass.kind.label(),
            pass.target.label()
        ));
        self.out.push_str(&format!(
            "  eye=({:.2}, {:.2}, {:.2}) clip=({px:.1}, {py:.1}, {pz:.1}, {pw:.2})\n",
            eye.x, eye.y, eye.z
        ));
    }

    fn set_depth_compare(&mut self, compare: DepthCompare) {
        let op = match compare {
            DepthCompare::Less => "<",
            DepthCompare::LessEqual => "<=",
        };
        self.out.push_str(&format!("  depth {op}\n"));
    }

    fn draw(&mut self, _pass: &PassPlan, call: &DrawCall) {
        let line = match call {
            DrawCall::Pool { model } => {
                let t = model.w_axis;
                format!("  draw pool origin=({:.2}, {:.2}, {:.2})", t.x, t.y, t.z)
            }
            DrawCall::Skybox { .. } => "  draw skybox".to_string(),
            DrawCall::Water { tiles } => format!("  draw water tiles={}", tiles.len()),
            DrawCall::DebugQuad { source } => format!("  draw overlay {}", source.label()),
        };
        self.out.push_str(&line);
        self.out.push('\n');
    }

    fn end_pass(&mut self, pass: &PassPlan) {
        self.out
            .push_str(&format!("  unbind {}\n", pass.target.label()));
    }

    fn present(&mut self) {
        self.out.push_str("present\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::execute_frame;
    use crate::plan::{DebugOverlay, plan_frame};
    use fountain_common::Viewport;
    use fountain_scene::{Camera, FrameContext, SceneConfig};
    use glam::Vec3;

    fn describe(scene: &SceneConfig, overlay: Option<DebugOverlay>) -> String {
        let ctx = FrameContext::new(Camera::new(Vec3::new(0.0, 3.0, 5.0)), Viewport::DEFAULT);
        let plan = plan_frame(&ctx, scene, overlay);
        let mut text = DebugTextRenderer::new();
        let Ok(()) = execute_frame(&plan, &mut text);
        text.into_string()
    }

    #[test]
    fn describes_passes_in_order() {
        let out = describe(&SceneConfig::fountain(), None);
        let reflection = out.find("[reflection]").unwrap();
        let refraction = out.find("[refraction]").unwrap();
        let main = out.find("[main] -> screen").unwrap();
        assert!(reflection < refraction && refraction < main);
        assert!(out.starts_with("=== Frame 1 ==="));
        assert!(out.ends_with("present\n"));
    }

    #[test]
    fn reflection_eye_is_mirrored() {
        let out = describe(&SceneConfig::fountain(), None);
        assert!(out.contains("-3.00, 5.00) clip=(0.0, 1.0, 0.0, 0.00)"));
        assert!(out.contains(" 3.00, 5.00) clip=(0.0, -1.0, 0.0, 0.00)"));
    }

    #[test]
    fn lists_draws() {
        let out = describe(&SceneConfig::fountain(), Some(DebugOverlay::Reflection));
        assert!(out.contains("draw water tiles=29"));
        assert!(out.contains("depth <=\n  draw skybox\n  depth <\n"));
        assert!(out.contains("draw overlay reflection"));
        assert!(!describe(&SceneConfig::pool(), None).contains("skybox"));
    }

    #[test]
    fn frames_are_numbered() {
        let ctx = FrameContext::new(Camera::default(), Viewport::DEFAULT);
        let plan = plan_frame(&ctx, &SceneConfig::pool(), None);
        let mut text = DebugTextRenderer::new();
        let Ok(()) = execute_frame(&plan, &mut text);
        let Ok(()) = execute_frame(&plan, &mut text);
        assert!(text.output().contains("=== Frame 2 ==="));
    }
}
