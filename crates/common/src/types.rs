use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Horizontal water plane at `y = height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterPlane {
    pub height: f32,
}

impl WaterPlane {
    pub fn new(height: f32) -> Self {
        Self { height }
    }

    /// Signed distance of a point above the plane.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        point.y - self.height
    }
}

impl Default for WaterPlane {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

/// Plane equation uploaded per pass. Fragments with
/// `dot(vec4(world_pos, 1.0), plane) < 0` are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPlane(pub Vec4);

impl ClipPlane {
    /// Disabled plane: the dot product is always zero, nothing is discarded.
    pub const DISABLED: Self = Self(Vec4::ZERO);

    /// Plane used while rendering the reflection texture.
    pub fn reflection(water: WaterPlane) -> Self {
        Self(Vec4::new(0.0, 1.0, 0.0, water.height))
    }

    /// Plane used while rendering the refraction texture.
    pub fn refraction(water: WaterPlane) -> Self {
        Self(Vec4::new(0.0, -1.0, 0.0, water.height))
    }

    pub fn is_disabled(&self) -> bool {
        self.0 == Vec4::ZERO
    }

    /// Whether a world-space point survives the clip test.
    pub fn keeps(&self, point: Vec3) -> bool {
        self.0.dot(point.extend(1.0)) >= 0.0
    }

    pub fn to_array(self) -> [f32; 4] {
        self.0.to_array()
    }
}

/// Output size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const DEFAULT: Self = Self {
        width: 800,
        height: 600,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Depth attachment kind for render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthAttachment {
    /// Plain depth texture.
    #[default]
    Depth,
    /// Combined depth-stencil attachment.
    DepthStencil,
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    /// Teal used to clear every pass.
    pub const CLEAR: Self = Self([0.2, 0.3, 0.3, 1.0]);
}

impl Default for Rgba {
    fn default() -> Self {
        Self::CLEAR
    }
}

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Texture coordinate wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wrap {
    Repeat,
    ClampToEdge,
}

/// Backend-neutral sampler description. `wrap` is ordered S, T, R.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerSpec {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub wrap: [Wrap; 3],
}

impl SamplerSpec {
    /// Linear filtering, clamped on every axis.
    pub const LINEAR_CLAMP: Self = Self {
        min_filter: Filter::Linear,
        mag_filter: Filter::Linear,
        wrap: [Wrap::ClampToEdge; 3],
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_planes_match_water_height() {
        for h in [-2.5_f32, 0.0, 1.0, 7.25] {
            let water = WaterPlane::new(h);
            assert_eq!(ClipPlane::reflection(water).0, Vec4::new(0.0, 1.0, 0.0, h));
            assert_eq!(ClipPlane::refraction(water).0, Vec4::new(0.0, -1.0, 0.0, h));
        }
        assert_eq!(ClipPlane::DISABLED.0, Vec4::ZERO);
    }

    #[test]
    fn disabled_plane_keeps_everything() {
        let plane = ClipPlane::DISABLED;
        assert!(plane.is_disabled());
        assert!(plane.keeps(Vec3::new(0.0, -100.0, 0.0)));
        assert!(plane.keeps(Vec3::new(0.0, 100.0, 0.0)));
    }

    #[test]
    fn reflection_plane_culls_below_water() {
        let plane = ClipPlane::reflection(WaterPlane::default());
        assert!(plane.keeps(Vec3::new(0.0, 1.0, 0.0)));
        assert!(!plane.keeps(Vec3::new(0.0, -1.0, 0.0)));

        let plane = ClipPlane::refraction(WaterPlane::default());
        assert!(!plane.keeps(Vec3::new(0.0, 1.0, 0.0)));
        assert!(plane.keeps(Vec3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn viewport_aspect() {
        assert!((Viewport::DEFAULT.aspect() - 800.0 / 600.0).abs() < f32::EPSILON);
        assert_eq!(Viewport::new(10, 0).aspect(), 10.0);
    }

    #[test]
    fn signed_distance() {
        let water = WaterPlane::new(1.0);
        assert_eq!(water.signed_distance(Vec3::new(0.0, 3.0, 0.0)), 2.0);
    }
}
