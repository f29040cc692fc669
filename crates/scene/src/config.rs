//! Scene layout: which model to draw, where the water tiles go, and whether
//! a skybox surrounds the scene.
//!
//! Two presets ship with the demo. A scene can also be read from a JSON file
//! with the same shape as [`SceneConfig`].

use crate::tiles::TileTransform;
use fountain_common::{DepthAttachment, Rgba, WaterPlane};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from reading or writing scene files.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneVariant {
    /// Fountain basin, 5x5 water grid with fill tiles, skybox.
    Fountain,
    /// Rectangular pool, 7x15 water grid, no skybox.
    Pool,
}

/// Pool model transform. Applied as `scale * rotate * translate`, so the
/// translation is expressed in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPlacement {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
}

impl ModelPlacement {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_translation(self.translation)
    }
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
        }
    }
}

/// Cubemap face images ordered +X, -X, +Y, -Y, +Z, -Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyboxConfig {
    pub faces: [PathBuf; 6],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub variant: SceneVariant,
    pub water: WaterPlane,
    pub clear_color: Rgba,
    pub near: f32,
    pub far: f32,
    pub camera_start: Vec3,
    pub pool_model: PathBuf,
    pub pool_placement: ModelPlacement,
    pub tiles: Vec<TileTransform>,
    pub skybox: Option<SkyboxConfig>,
    pub depth_attachment: DepthAttachment,
}

impl SceneConfig {
    pub fn preset(variant: SceneVariant) -> Self {
        match variant {
            SceneVariant::Fountain => Self::fountain(),
            SceneVariant::Pool => Self::pool(),
        }
    }

    pub fn fountain() -> Self {
        let mut tiles = TileTransform::grid(5, 5);
        tiles.extend(TileTransform::fountain_fill());
        Self {
            variant: SceneVariant::Fountain,
            water: WaterPlane::default(),
            clear_color: Rgba::CLEAR,
            near: 0.1,
            far: 100.0,
            camera_start: Vec3::new(0.0, 0.0, 3.0),
            pool_model: PathBuf::from("resources/fountain/horniman-fountain-edit.obj"),
            pool_placement: ModelPlacement {
                scale: Vec3::splat(2.0),
                rotation: Quat::IDENTITY,
                translation: Vec3::new(0.0, -3.65, 0.0),
            },
            tiles,
            skybox: Some(SkyboxConfig {
                faces: [
                    "resources/skybox/right.jpg",
                    "resources/skybox/left.jpg",
                    "resources/skybox/top.jpg",
                    "resources/skybox/bottom.jpg",
                    "resources/skybox/front.jpg",
                    "resources/skybox/back.jpg",
                ]
                .map(PathBuf::from),
            }),
            depth_attachment: DepthAttachment::Depth,
        }
    }

    pub fn pool() -> Self {
        Self {
            variant: SceneVariant::Pool,
            water: WaterPlane::default(),
            clear_color: Rgba::CLEAR,
            near: 0.1,
            far: 100.0,
            camera_start: Vec3::new(0.0, 0.0, 3.0),
            pool_model: PathBuf::from("resources/pool/pool.obj"),
            pool_placement: ModelPlacement {
                translation: Vec3::new(0.0, -1.0, 0.0),
                ..ModelPlacement::default()
            },
            tiles: TileTransform::grid(7, 15),
            skybox: None,
            depth_attachment: DepthAttachment::DepthStencil,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(
            path = %path.as_ref().display(),
            variant = ?config.variant,
            tiles = config.tiles.len(),
            "loaded scene file"
        );
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve relative asset paths against `root`.
    pub fn with_asset_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        resolve(&mut self.pool_model);
        if let Some(skybox) = &mut self.skybox {
            skybox.faces.iter_mut().for_each(resolve);
        }
        self
    }

    pub fn tile_matrices(&self) -> Vec<Mat4> {
        self.tiles.iter().map(|t| t.matrix(self.water)).collect()
    }

    pub fn has_skybox(&self) -> bool {
        self.skybox.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fountain_preset() {
        let scene = SceneConfig::fountain();
        assert_eq!(scene.tiles.len(), 29);
        assert!(scene.has_skybox());
        assert_eq!(scene.depth_attachment, DepthAttachment::Depth);
        assert_eq!(scene.water.height, 0.0);
    }

    #[test]
    fn pool_preset() {
        let scene = SceneConfig::preset(SceneVariant::Pool);
        assert_eq!(scene.tiles.len(), 105);
        assert!(!scene.has_skybox());
        assert_eq!(scene.depth_attachment, DepthAttachment::DepthStencil);
    }

    #[test]
    fn placement_translates_in_model_space() {
        let m = SceneConfig::fountain().pool_placement.matrix();
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, -7.3, 0.0)).length() < 1e-5);
    }

    #[test]
    fn asset_root_resolves_relative_paths() {
        let scene = SceneConfig::fountain().with_asset_root("/data");
        assert_eq!(
            scene.pool_model,
            PathBuf::from("/data/resources/fountain/horniman-fountain-edit.obj")
        );
        let faces = scene.skybox.unwrap().faces;
        assert_eq!(faces[2], PathBuf::from("/data/resources/skybox/top.jpg"));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let scene = SceneConfig::pool();
        scene.save(tmp.path()).unwrap();
        let loaded = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn load_rejects_garbage() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "{ not json").unwrap();
        assert!(matches!(
            SceneConfig::load(tmp.path()),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn tile_matrices_follow_water_height() {
        let mut scene = SceneConfig::pool();
        scene.water = WaterPlane::new(2.0);
        let m = scene.tile_matrices();
        assert_eq!(m.len(), scene.tiles.len());
        assert!((m[0].transform_point3(Vec3::ZERO).y - 2.0).abs() < 1e-6);
    }
}
