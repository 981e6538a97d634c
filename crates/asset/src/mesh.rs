//! CPU-side mesh representation produced by decoders.

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Normal assigned when the source carries none.
    pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    pub fn at(position: [f32; 3]) -> Self {
        Self::new(position, Self::DEFAULT_NORMAL, [0.0, 0.0])
    }
}

impl Default for MeshVertex {
    fn default() -> Self {
        Self::at([0.0; 3])
    }
}

/// Indexed triangle mesh. `indices` is a triangle list; it may be empty for
/// point-only geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        let bounds = self
            .vertices
            .iter()
            .skip(1)
            .fold((first, first), |(mut min, mut max), v| {
                for axis in 0..3 {
                    min[axis] = min[axis].min(v.position[axis]);
                    max[axis] = max[axis].max(v.position[axis]);
                }
                (min, max)
            });
        Some(bounds)
    }
}
