use fountain_common::WaterPlane;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Placement of one unit water tile.
///
/// The unit tile is authored in the XY plane; `rotation` lays it flat.
/// `offset.y` is relative to the water plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileTransform {
    pub offset: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,
}

impl TileTransform {
    /// Rotation that turns the XY-plane tile into a horizontal one.
    pub fn flat() -> Quat {
        Quat::from_rotation_x(90.0_f32.to_radians())
    }

    pub fn new(offset: Vec3, scale: Vec3) -> Self {
        Self {
            offset,
            scale,
            rotation: Self::flat(),
        }
    }

    /// `translate * scale * rotate`, lifted to the water height.
    pub fn matrix(&self, water: WaterPlane) -> Mat4 {
        Mat4::from_translation(self.offset + Vec3::Y * water.height)
            * Mat4::from_scale(self.scale)
            * Mat4::from_quat(self.rotation)
    }

    /// Grid of unit tiles centered on the origin.
    pub fn grid(columns: u32, rows: u32) -> Vec<Self> {
        let half_c = columns.saturating_sub(1) as f32 / 2.0;
        let half_r = rows.saturating_sub(1) as f32 / 2.0;
        let mut tiles = Vec::with_capacity((columns * rows) as usize);
        for i in 0..columns {
            for j in 0..rows {
                tiles.push(Self::new(
                    Vec3::new(i as f32 - half_c, 0.0, j as f32 - half_r),
                    Vec3::ONE,
                ));
            }
        }
        tiles
    }

    /// Stretched tiles that close the gaps between the 5x5 grid and the
    /// fountain basin rim.
    pub fn fountain_fill() -> Vec<Self> {
        #[rustfmt::skip]
        let table: [([f32; 3], [f32; 3]); 4] = [
            // offset               scale
            ([ 0.0,  0.0,  2.75], [3.0, 1.0, 0.5]),
            ([ 0.0,  0.0, -2.9 ], [4.2, 1.0, 0.8]),
            ([ 2.85, 0.0, -0.15], [0.7, 1.0, 4.0]),
            ([-2.9,  0.0, -0.2 ], [0.8, 1.0, 3.7]),
        ];
        table
            .iter()
            .map(|(offset, scale)| Self::new(Vec3::from(*offset), Vec3::from(*scale)))
            .collect()
    }
}
