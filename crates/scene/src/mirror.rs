use crate::camera::{Camera, front_from_angles};
use fountain_common::WaterPlane;
use glam::{Mat4, Vec3};

/// Reflect a position through the horizontal plane `y = water.height`.
pub fn mirror_position(position: Vec3, water: WaterPlane) -> Vec3 {
    let distance = 2.0 * water.signed_distance(position);
    Vec3::new(position.x, position.y - distance, position.z)
}

/// Camera pose reflected through the water plane, used to render the
/// reflection texture.
///
/// Yaw is kept, pitch is negated. The up vector is rebuilt from world up
/// rather than mirrored, so the reflection image comes out vertically
/// flipped and the water shader samples it with an inverted `v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirroredCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// How far the eye moved: twice its height above the water.
    pub distance: f32,
}

impl MirroredCamera {
    pub fn from_camera(camera: &Camera, water: WaterPlane) -> Self {
        let distance = 2.0 * water.signed_distance(camera.position);
        let mut position = camera.position;
        position.y -= distance;

        let pitch = -camera.pitch;
        let front = front_from_angles(camera.yaw, pitch);
        let right = front.cross(Vec3::Y).normalize();
        let up = right.cross(front).normalize();

        Self {
            position,
            yaw: camera.yaw,
            pitch,
            front,
            right,
            up,
            distance,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_camera_above_still_water() {
        let cam = Camera::new(Vec3::new(0.0, 3.0, 5.0));
        let mirrored = MirroredCamera::from_camera(&cam, WaterPlane::new(0.0));
        assert_eq!(mirrored.position, Vec3::new(0.0, -3.0, 5.0));
        assert_eq!(mirrored.distance, 6.0);
    }

    #[test]
    fn mirrored_height_is_reflected() {
        for h in [-3.0_f32, 0.0, 0.5, 4.0] {
            for y in [-10.0_f32, -1.0, 0.0, 2.0, 12.5] {
                let p = Vec3::new(1.5, y, -2.0);
                let m = mirror_position(p, WaterPlane::new(h));
                assert!((m.y - (2.0 * h - y)).abs() < 1e-4);
                assert_eq!((m.x, m.z), (p.x, p.z));
            }
        }
    }

    #[test]
    fn mirroring_twice_is_identity() {
        let water = WaterPlane::new(1.25);
        let mut cam = Camera::with_angles(Vec3::new(3.0, 4.0, -1.0), 30.0, -20.0);
        let once = MirroredCamera::from_camera(&cam, water);
        assert_eq!(once.pitch, 20.0);
        assert_eq!(once.yaw, 30.0);

        cam = Camera::with_angles(once.position, once.yaw, once.pitch);
        let twice = MirroredCamera::from_camera(&cam, water);
        assert!((twice.position - Vec3::new(3.0, 4.0, -1.0)).length() < 1e-4);
        assert_eq!(twice.pitch, -20.0);
    }

    #[test]
    fn mirrored_front_reflects_vertical_component() {
        let water = WaterPlane::default();
        for yaw in [-180.0_f32, -90.0, 0.0, 45.0, 170.0] {
            for pitch in [-89.0_f32, -45.0, 0.0, 12.0, 89.0] {
                let cam = Camera::with_angles(Vec3::new(0.0, 2.0, 0.0), yaw, pitch);
                let mirrored = MirroredCamera::from_camera(&cam, water);
                assert!((mirrored.front.length() - 1.0).abs() < 1e-5);
                assert!((mirrored.front.y + cam.front.y).abs() < 1e-5);
                assert!((mirrored.front.x - cam.front.x).abs() < 1e-5);
                assert!((mirrored.front.z - cam.front.z).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::with_angles(Vec3::new(0.0, 5.0, 5.0), -90.0, -30.0);
        let m = MirroredCamera::from_camera(&cam, WaterPlane::default());
        assert!(m.front.dot(m.right).abs() < 1e-5);
        assert!(m.front.dot(m.up).abs() < 1e-5);
        assert!((m.up.length() - 1.0).abs() < 1e-5);
        assert!(m.up.y > 0.0);
    }

    #[test]
    fn camera_below_water_mirrors_upward() {
        let cam = Camera::new(Vec3::new(0.0, -2.0, 0.0));
        let m = MirroredCamera::from_camera(&cam, WaterPlane::new(1.0));
        assert_eq!(m.position.y, 4.0);
        assert_eq!(m.distance, -6.0);
    }

    #[test]
    fn view_matrix_places_eye_at_origin() {
        let cam = Camera::new(Vec3::new(1.0, 3.0, 5.0));
        let m = MirroredCamera::from_camera(&cam, WaterPlane::default());
        let eye = m.view_matrix().transform_point3(m.position);
        assert!(eye.length() < 1e-4);
    }
}
