use bytemuck::{Pod, Zeroable};

/// Unit water tile in the XY plane, two triangles. Tile matrices rotate
/// it flat onto XZ.
#[rustfmt::skip]
pub const WATER_TILE: [[f32; 3]; 6] = [
    [-0.5,  0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [ 0.5,  0.5, 0.0],
    [ 0.5,  0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [ 0.5, -0.5, 0.0],
];

/// Skybox cube, 36 positions. Drawn without culling.
#[rustfmt::skip]
pub const SKYBOX_VERTICES: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],

    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],

    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ScreenVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Preview quad in the top-center of the screen, NDC x in [-0.3, 0.3],
/// y in [0.7, 1.0]. `uv.y` is 0 at the top edge.
pub fn debug_quad() -> [ScreenVertex; 6] {
    let v = |x: f32, y: f32, u: f32, t: f32| ScreenVertex {
        position: [x, y],
        uv: [u, t],
    };
    [
        v(-0.3, 1.0, 0.0, 0.0),
        v(-0.3, 0.7, 0.0, 1.0),
        v(0.3, 0.7, 1.0, 1.0),
        v(-0.3, 1.0, 0.0, 0.0),
        v(0.3, 0.7, 1.0, 1.0),
        v(0.3, 1.0, 1.0, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Quat, Vec3};

    #[test]
    fn tile_lies_flat_after_rotation() {
        let rotate = Mat4::from_quat(Quat::from_rotation_x(90f32.to_radians()));
        for p in WATER_TILE {
            let world = rotate.transform_point3(Vec3::from(p));
            assert!(world.y.abs() < 1e-6);
            assert!(world.x.abs() <= 0.5 + 1e-6 && world.z.abs() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn skybox_covers_six_faces() {
        assert_eq!(SKYBOX_VERTICES.len(), 36);
        for axis in 0..3 {
            for side in [-1.0_f32, 1.0] {
                let on_face = SKYBOX_VERTICES
                    .chunks_exact(3)
                    .filter(|tri| tri.iter().all(|v| v[axis] == side))
                    .count();
                assert_eq!(on_face, 2, "axis {axis} side {side}");
            }
        }
    }

    #[test]
    fn debug_quad_bounds() {
        let quad = debug_quad();
        for v in &quad {
            assert!((-0.3..=0.3).contains(&v.position[0]));
            assert!((0.7..=1.0).contains(&v.position[1]));
            let top = v.position[1] == 1.0;
            assert_eq!(v.uv[1] == 0.0, top);
        }
    }
}
