use std::io::Cursor;

use glam::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("not a readable STL file: {0}")]
    Parse(#[from] std::io::Error),
    #[error("STL file contains no triangles")]
    Empty,
}

/// Triangle soup ready for drawing: centered on the origin, flat normals.
#[derive(Debug, Clone)]
pub struct ModelMesh {
    /// 3 positions per triangle
    pub positions: Vec<Vec3>,
    /// 1 normal per triangle
    pub normals: Vec<Vec3>,
    /// Distance from the origin to the farthest vertex
    pub radius: f32,
}

impl ModelMesh {
    /// Parse ASCII or binary STL bytes.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<Self, MeshError> {
        let stl = stl_io::read_stl(&mut Cursor::new(bytes))?;

        let mut positions = Vec::with_capacity(stl.faces.len() * 3);
        for face in &stl.faces {
            for &i in &face.vertices {
                let v = stl.vertices.get(i).ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, "vertex index out of range")
                })?;
                positions.push(Vec3::new(v[0], v[1], v[2]));
            }
        }
        Self::from_positions(positions)
    }

    /// Build from raw triangle corners; recomputes normals and recenters.
    pub fn from_positions(mut positions: Vec<Vec3>) -> Result<Self, MeshError> {
        if positions.len() < 3 {
            return Err(MeshError::Empty);
        }
        positions.truncate(positions.len() - positions.len() % 3);

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let center = (min + max) * 0.5;
        for p in &mut positions {
            *p -= center;
        }

        let normals = positions
            .chunks_exact(3)
            .map(|t| (t[1] - t[0]).cross(t[2] - t[0]).normalize_or_zero())
            .collect();
        let radius = positions.iter().map(|p| p.length()).fold(0.0_f32, f32::max);

        Ok(Self {
            positions,
            normals,
            radius,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.normals.len()
    }
}
