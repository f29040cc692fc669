use crate::AssetError;
use fountain_common::SamplerSpec;
use std::path::{Path, PathBuf};

/// Cube-map faces in upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Array layer of this face in a cube texture.
    pub fn layer(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "+x",
            CubeFace::NegativeX => "-x",
            CubeFace::PositiveY => "+y",
            CubeFace::NegativeY => "-y",
            CubeFace::PositiveZ => "+z",
            CubeFace::NegativeZ => "-z",
        }
    }
}

/// Decoded cubemap, RGBA8, one square image per face.
///
/// A face that failed to load is `None`; the backend leaves it zero-filled.
#[derive(Debug, Clone)]
pub struct CubemapImage {
    /// Edge length of every face, taken from the first square face that decoded.
    /// Zero when no face decoded.
    pub size: u32,
    pub faces: [Option<Vec<u8>>; 6],
    pub sampler: SamplerSpec,
}

impl CubemapImage {
    pub fn face(&self, face: CubeFace) -> Option<&[u8]> {
        self.faces[face.layer() as usize].as_deref()
    }

    pub fn populated_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.populated_count() == CubeFace::ALL.len()
    }

    /// Edge length to allocate; never zero.
    pub fn extent(&self) -> u32 {
        self.size.max(1)
    }
}

/// Load six face images ordered +X, -X, +Y, -Y, +Z, -Z.
///
/// Never fails as a whole: a face that cannot be decoded, is not square,
/// or differs in size from the first accepted face is logged and left empty.
/// Filtering and wrapping are fixed to linear and clamp-to-edge.
pub fn load_cubemap(paths: &[PathBuf; 6]) -> CubemapImage {
    let mut size: Option<u32> = None;
    let mut faces: [Option<Vec<u8>>; 6] = Default::default();

    for (face, path) in CubeFace::ALL.into_iter().zip(paths) {
        match decode_face(path, &mut size) {
            Ok(pixels) => {
                tracing::debug!(face = face.label(), path = %path.display(), "loaded cubemap face");
                faces[face.layer() as usize] = Some(pixels);
            }
            Err(e) => {
                tracing::error!(face = face.label(), "cubemap face failed to load: {e}");
            }
        }
    }

    let image = CubemapImage {
        size: size.unwrap_or(0),
        faces,
        sampler: SamplerSpec::LINEAR_CLAMP,
    };
    tracing::info!(
        size = image.size,
        faces = image.populated_count(),
        "cubemap loaded"
    );
    image
}

fn decode_face(path: &Path, size: &mut Option<u32>) -> Result<Vec<u8>, AssetError> {
    let img = image::open(path)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let expected = size.unwrap_or(width);
    if width != expected || height != expected {
        return Err(AssetError::FaceSize {
            path: path.to_path_buf(),
            expected,
            width,
            height,
        });
    }
    *size = Some(expected);
    Ok(img.into_raw())
}
