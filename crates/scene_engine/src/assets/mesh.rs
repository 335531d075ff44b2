//! CPU-side mesh data
//!
//! Only the data the editor needs lives here: vertex attributes for the draw
//! list and the local bounds the OBB is built from. Uploading is the render
//! backend's business.

use crate::foundation::math::{Vec2, Vec3};

/// Single mesh vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Object-space position
    pub position: Vec3,
    /// Object-space normal
    pub normal: Vec3,
    /// Vertex color (RGB)
    pub color: Vec3,
    /// Texture coordinates
    pub tex_coords: Vec2,
}

impl Vertex {
    /// Vertex with white color and zero UVs
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            color: Vec3::new(1.0, 1.0, 1.0),
            tex_coords: Vec2::zeros(),
        }
    }

    /// Set the texture coordinates
    pub fn with_tex_coords(mut self, u: f32, v: f32) -> Self {
        self.tex_coords = Vec2::new(u, v);
        self
    }
}

/// Named triangle mesh with local bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Lookup name
    pub name: String,
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Smallest corner of the local bounds
    pub min_bounds: Vec3,
    /// Largest corner of the local bounds
    pub max_bounds: Vec3,
}

impl Mesh {
    /// Create a mesh and compute its bounds
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            name: name.into(),
            vertices,
            indices,
            min_bounds: Vec3::zeros(),
            max_bounds: Vec3::zeros(),
        };
        mesh.calculate_bounds();
        mesh
    }

    /// Recompute bounds from the vertex positions (zero when empty)
    pub fn calculate_bounds(&mut self) {
        let Some(first) = self.vertices.first() else {
            self.min_bounds = Vec3::zeros();
            self.max_bounds = Vec3::zeros();
            return;
        };

        let (min, max) = self.vertices.iter().fold(
            (first.position, first.position),
            |(min, max), vertex| (min.inf(&vertex.position), max.sup(&vertex.position)),
        );
        self.min_bounds = min;
        self.max_bounds = max;
    }

    /// Number of triangles in the index list
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unit cube spanning [-1, 1] on every axis
    pub fn cube(name: impl Into<String>) -> Self {
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::x(), Vec3::y(), Vec3::z()),
            (-Vec3::x(), Vec3::y(), -Vec3::z()),
            (Vec3::y(), Vec3::z(), Vec3::x()),
            (-Vec3::y(), Vec3::z(), -Vec3::x()),
            (Vec3::z(), Vec3::x(), Vec3::y()),
            (-Vec3::z(), Vec3::x(), -Vec3::y()),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
            for (su, sv, tu, tv) in [(-1.0, -1.0, 0.0, 0.0), (1.0, -1.0, 1.0, 0.0), (1.0, 1.0, 1.0, 1.0), (-1.0, 1.0, 0.0, 1.0)] {
                let position = normal + u * su + v * sv;
                vertices.push(Vertex::new(position, normal).with_tex_coords(tu, tv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(name, vertices, indices)
    }

    /// Flat quad in the XZ plane spanning [-1, 1], facing +Y
    pub fn plane(name: impl Into<String>) -> Self {
        let normal = Vec3::y();
        let vertices = vec![
            Vertex::new(Vec3::new(-1.0, 0.0, -1.0), normal).with_tex_coords(0.0, 0.0),
            Vertex::new(Vec3::new(1.0, 0.0, -1.0), normal).with_tex_coords(1.0, 0.0),
            Vertex::new(Vec3::new(1.0, 0.0, 1.0), normal).with_tex_coords(1.0, 1.0),
            Vertex::new(Vec3::new(-1.0, 0.0, 1.0), normal).with_tex_coords(0.0, 1.0),
        ];
        Self::new(name, vertices, vec![0, 2, 1, 0, 3, 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_mesh_has_zero_bounds() {
        let mesh = Mesh::new("empty", Vec::new(), Vec::new());
        assert_eq!(mesh.min_bounds, Vec3::zeros());
        assert_eq!(mesh.max_bounds, Vec3::zeros());
    }

    #[test]
    fn cube_spans_unit_bounds() {
        let mesh = Mesh::cube("cube");
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_relative_eq!(mesh.min_bounds, Vec3::new(-1.0, -1.0, -1.0));
        assert_relative_eq!(mesh.max_bounds, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn plane_is_flat() {
        let mesh = Mesh::plane("plane");
        assert_relative_eq!(mesh.min_bounds, Vec3::new(-1.0, 0.0, -1.0));
        assert_relative_eq!(mesh.max_bounds, Vec3::new(1.0, 0.0, 1.0));
    }
}
