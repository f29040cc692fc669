use crate::AssetError;
use std::path::Path;

const DEFAULT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Indexed triangle mesh with all OBJ models merged into one buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Load an OBJ file, triangulated, with one index per vertex.
///
/// Vertex colors come from the diffuse color of each model's material.
/// Models without normals get smooth normals averaged from their faces.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "material library not loaded: {e}");
        Vec::new()
    });

    let mut data = MeshData::default();
    for model in &models {
        let mesh = &model.mesh;
        let color = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.diffuse)
            .unwrap_or(DEFAULT_COLOR);

        let base = data.vertices.len() as u32;
        let vertex_count = mesh.positions.len() / 3;
        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            smooth_normals(&mesh.positions, &mesh.indices)
        };

        for (i, normal) in normals.into_iter().enumerate().take(vertex_count) {
            data.vertices.push(MeshVertex {
                position: [
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                ],
                normal,
                color,
            });
        }
        data.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    if data.is_empty() {
        return Err(AssetError::EmptyMesh(path.to_path_buf()));
    }

    tracing::info!(
        path = %path.display(),
        models = models.len(),
        vertices = data.vertices.len(),
        triangles = data.triangle_count(),
        "loaded OBJ model"
    );
    Ok(data)
}

fn smooth_normals(positions: &[f32], indices: &[u32]) -> Vec<[f32; 3]> {
    let vertex = |i: u32| {
        let i = i as usize * 3;
        [positions[i], positions[i + 1], positions[i + 2]]
    };
    let mut acc = vec![[0.0_f32; 3]; positions.len() / 3];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2]));
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        for &idx in tri {
            let slot = &mut acc[idx as usize];
            for k in 0..3 {
                slot[k] += n[k];
            }
        }
    }
    acc.into_iter()
        .map(|n| {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if len > f32::EPSILON {
                [n[0] / len, n[1] / len, n[2] / len]
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn triangle_gets_computed_normal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tri.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, DEFAULT_COLOR);
        }
    }

    #[test]
    fn quads_are_triangulated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\nvn 0 1 0\nf 1//1 2//1 3//1 4//1\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn material_diffuse_becomes_vertex_color() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "stone.mtl", "newmtl stone\nKd 0.5 0.25 0.125\n");
        let path = write(
            dir.path(),
            "basin.obj",
            "mtllib stone.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl stone\nf 1 2 3\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertices[0].color, [0.5, 0.25, 0.125]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_obj(dir.path().join("nope.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. }));
    }

    #[test]
    fn file_without_faces_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "points.obj", "v 0 0 0\nv 1 0 0\n");
        assert!(matches!(load_obj(&path), Err(AssetError::EmptyMesh(_))));
    }
}
