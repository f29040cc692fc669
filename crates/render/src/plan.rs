use fountain_common::{ClipPlane, Rgba, WaterPlane};
use fountain_scene::{FrameContext, SceneConfig};
use glam::{Mat3, Mat4};

/// Texture slot the water shader reads the reflection from.
pub const REFLECTION_SLOT: u32 = 0;
/// Texture slot the water shader reads the refraction from.
pub const REFRACTION_SLOT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Reflection,
    Refraction,
    Main,
}

impl PassKind {
    /// Execution order within a frame.
    pub const ORDER: [PassKind; 3] = [PassKind::Reflection, PassKind::Refraction, PassKind::Main];

    pub fn target(self) -> RenderTarget {
        match self {
            PassKind::Reflection => RenderTarget::Reflection,
            PassKind::Refraction => RenderTarget::Refraction,
            PassKind::Main => RenderTarget::Screen,
        }
    }

    pub fn clip_plane(self, water: WaterPlane) -> ClipPlane {
        match self {
            PassKind::Reflection => ClipPlane::reflection(water),
            PassKind::Refraction => ClipPlane::refraction(water),
            PassKind::Main => ClipPlane::DISABLED,
        }
    }

    /// Index of this pass in per-pass uniform storage.
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PassKind::Reflection => "reflection",
            PassKind::Refraction => "refraction",
            PassKind::Main => "main",
        }
    }
}

/// Where a pass draws to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    Reflection,
    Refraction,
    /// The window's default framebuffer.
    Screen,
}

impl RenderTarget {
    pub fn label(self) -> &'static str {
        match self {
            RenderTarget::Reflection => "reflection",
            RenderTarget::Refraction => "refraction",
            RenderTarget::Screen => "screen",
        }
    }
}

/// Offscreen texture previewed in a small screen-space quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugOverlay {
    Reflection,
    Refraction,
}

impl DebugOverlay {
    pub fn target(self) -> RenderTarget {
        match self {
            DebugOverlay::Reflection => RenderTarget::Reflection,
            DebugOverlay::Refraction => RenderTarget::Refraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthCompare {
    Less,
    LessEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Pool,
    Skybox,
    Water,
    DebugQuad,
}

impl DrawKind {
    /// The skybox is drawn at the far plane, so it needs `<=` to pass
    /// against a cleared depth buffer. Everything else uses `<`.
    pub fn depth_compare(self) -> DepthCompare {
        match self {
            DrawKind::Skybox => DepthCompare::LessEqual,
            DrawKind::Pool | DrawKind::Water | DrawKind::DebugQuad => DepthCompare::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// The pool/fountain model with the pass's view and clip plane.
    Pool { model: Mat4 },
    /// Skybox cube with a rotation-only view.
    Skybox { view_rotation: Mat4 },
    /// Water tiles sampling the reflection and refraction targets at
    /// [`REFLECTION_SLOT`] and [`REFRACTION_SLOT`].
    Water { tiles: Vec<Mat4> },
    /// Screen-space preview of an offscreen target.
    DebugQuad { source: RenderTarget },
}

impl DrawCall {
    pub fn kind(&self) -> DrawKind {
        match self {
            DrawCall::Pool { .. } => DrawKind::Pool,
            DrawCall::Skybox { .. } => DrawKind::Skybox,
            DrawCall::Water { .. } => DrawKind::Water,
            DrawCall::DebugQuad { .. } => DrawKind::DebugQuad,
        }
    }

    pub fn depth_compare(&self) -> DepthCompare {
        self.kind().depth_compare()
    }
}

/// One render pass: target, clear, camera matrices, clip plane, draws.
#[derive(Debug, Clone, PartialEq)]
pub struct PassPlan {
    pub kind: PassKind,
    pub target: RenderTarget,
    pub clear_color: Rgba,
    pub view: Mat4,
    pub projection: Mat4,
    pub clip_plane: ClipPlane,
    pub draws: Vec<DrawCall>,
}

impl PassPlan {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// All passes of one frame, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub passes: Vec<PassPlan>,
}

impl FramePlan {
    pub fn pass(&self, kind: PassKind) -> Option<&PassPlan> {
        self.passes.iter().find(|p| p.kind == kind)
    }
}

/// Strip translation from a view matrix, keeping its rotation.
pub fn rotation_only(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

/// Build the frame's pass list from the current camera and scene.
pub fn plan_frame(
    ctx: &FrameContext,
    scene: &SceneConfig,
    overlay: Option<DebugOverlay>,
) -> FramePlan {
    let projection = ctx.projection(scene.near, scene.far);
    let view = ctx.camera.view_matrix();
    let mirrored_view = ctx.mirrored_camera(scene.water).view_matrix();
    let pool = DrawCall::Pool {
        model: scene.pool_placement.matrix(),
    };

    let pass = |kind: PassKind, view: Mat4, draws: Vec<DrawCall>| PassPlan {
        kind,
        target: kind.target(),
        clear_color: scene.clear_color,
        view,
        projection,
        clip_plane: kind.clip_plane(scene.water),
        draws,
    };

    let mut reflection_draws = vec![pool.clone()];
    if scene.has_skybox() {
        reflection_draws.push(DrawCall::Skybox {
            view_rotation: rotation_only(mirrored_view),
        });
    }

    let refraction_draws = vec![pool.clone()];

    let mut main_draws = vec![
        pool,
        DrawCall::Water {
            tiles: scene.tile_matrices(),
        },
    ];
    if scene.has_skybox() {
        main_draws.push(DrawCall::Skybox {
            view_rotation: rotation_only(view),
        });
    }
    if let Some(overlay) = overlay {
        main_draws.push(DrawCall::DebugQuad {
            source: overlay.target(),
        });
    }

    FramePlan {
        passes: vec![
            pass(PassKind::Reflection, mirrored_view, reflection_draws),
            pass(PassKind::Refraction, view, refraction_draws),
            pass(PassKind::Main, view, main_draws),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fountain_common::Viewport;
    use fountain_scene::Camera;
    use glam::{Vec3, Vec4};

    fn ctx_at(position: Vec3) -> FrameContext {
        FrameContext::new(Camera::new(position), Viewport::DEFAULT)
    }

    fn kinds(pass: &PassPlan) -> Vec<DrawKind> {
        pass.draws.iter().map(DrawCall::kind).collect()
    }

    #[test]
    fn passes_are_ordered() {
        let plan = plan_frame(&ctx_at(Vec3::new(0.0, 3.0, 5.0)), &SceneConfig::fountain(), None);
        let order: Vec<PassKind> = plan.passes.iter().map(|p| p.kind).collect();
        assert_eq!(order, PassKind::ORDER.to_vec());
        let targets: Vec<RenderTarget> = plan.passes.iter().map(|p| p.target).collect();
        assert_eq!(
            targets,
            vec![RenderTarget::Reflection, RenderTarget::Refraction, RenderTarget::Screen]
        );
    }

    #[test]
    fn clip_planes_per_pass() {
        for h in [-1.0_f32, 0.0, 2.5] {
            let mut scene = SceneConfig::pool();
            scene.water = WaterPlane::new(h);
            let plan = plan_frame(&ctx_at(Vec3::new(0.0, 4.0, 0.0)), &scene, None);
            let planes: Vec<Vec4> = plan.passes.iter().map(|p| p.clip_plane.0).collect();
            assert_eq!(
                planes,
                vec![
                    Vec4::new(0.0, 1.0, 0.0, h),
                    Vec4::new(0.0, -1.0, 0.0, h),
                    Vec4::ZERO
                ]
            );
        }
    }

    #[test]
    fn fountain_draw_lists() {
        let plan = plan_frame(&ctx_at(Vec3::new(0.0, 3.0, 5.0)), &SceneConfig::fountain(), None);
        assert_eq!(
            kinds(&plan.passes[0]),
            vec![DrawKind::Pool, DrawKind::Skybox]
        );
        assert_eq!(kinds(&plan.passes[1]), vec![DrawKind::Pool]);
        assert_eq!(
            kinds(&plan.passes[2]),
            vec![DrawKind::Pool, DrawKind::Water, DrawKind::Skybox]
        );
        match &plan.passes[2].draws[1] {
            DrawCall::Water { tiles } => assert_eq!(tiles.len(), 29),
            other => panic!("expected water, got {other:?}"),
        }
    }

    #[test]
    fn pool_variant_has_no_skybox() {
        let plan = plan_frame(&ctx_at(Vec3::new(0.0, 3.0, 5.0)), &SceneConfig::pool(), None);
        for pass in &plan.passes {
            assert!(!kinds(pass).contains(&DrawKind::Skybox));
        }
    }

    #[test]
    fn reflection_uses_mirrored_view() {
        let ctx = ctx_at(Vec3::new(0.0, 3.0, 5.0));
        let plan = plan_frame(&ctx, &SceneConfig::fountain(), None);
        let reflection = plan.pass(PassKind::Reflection).unwrap();
        let eye = reflection.view.inverse().transform_point3(Vec3::ZERO);
        assert!((eye - Vec3::new(0.0, -3.0, 5.0)).length() < 1e-4);

        let refraction = plan.pass(PassKind::Refraction).unwrap();
        assert_eq!(refraction.view, ctx.camera.view_matrix());
        assert_eq!(refraction.projection, reflection.projection);
    }

    #[test]
    fn skybox_view_has_no_translation() {
        let plan = plan_frame(&ctx_at(Vec3::new(4.0, 3.0, 5.0)), &SceneConfig::fountain(), None);
        for pass in &plan.passes {
            for draw in &pass.draws {
                if let DrawCall::Skybox { view_rotation } = draw {
                    assert_eq!(view_rotation.w_axis, Vec4::W);
                    assert_eq!(draw.depth_compare(), DepthCompare::LessEqual);
                }
            }
        }
    }

    #[test]
    fn overlay_is_drawn_last() {
        let plan = plan_frame(
            &ctx_at(Vec3::new(0.0, 1.0, 0.0)),
            &SceneConfig::fountain(),
            Some(DebugOverlay::Refraction),
        );
        let main = plan.pass(PassKind::Main).unwrap();
        assert_eq!(
            main.draws.last(),
            Some(&DrawCall::DebugQuad {
                source: RenderTarget::Refraction
            })
        );
    }

    #[test]
    fn only_skybox_relaxes_depth_test() {
        assert_eq!(DrawKind::Pool.depth_compare(), DepthCompare::Less);
        assert_eq!(DrawKind::Water.depth_compare(), DepthCompare::Less);
        assert_eq!(DrawKind::Skybox.depth_compare(), DepthCompare::LessEqual);
    }
}
