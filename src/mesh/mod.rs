pub mod primitives;

use glam::Vec3;

pub use primitives::{cube, uv_sphere};

/// A vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Convert to flat array for WebGL buffer
    /// Layout: position(3) + normal(3) = 6 floats
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
        ]
    }
}

/// A mesh composed of vertices and triangle indices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vertex>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push(a);
        self.indices.push(b);
        self.indices.push(c);
    }

    /// Add a quad as two triangles (CCW winding)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Get vertex buffer data as flat f32 array
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.to_array())
            .collect()
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_to_array() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y);
        let arr = v.to_array();
        assert_eq!(arr.len(), 6);
        assert_eq!(arr[0], 1.0);
        assert_eq!(arr[4], 1.0); // normal.y
    }

    #[test]
    fn test_mesh_add_quad() {
        let mut mesh = Mesh::new();
        let start = mesh.add_vertices(vec![
            Vertex::new(Vec3::ZERO, Vec3::Z),
            Vertex::new(Vec3::X, Vec3::Z),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Vec3::Z),
            Vertex::new(Vec3::Y, Vec3::Z),
        ]);
        assert_eq!(start, 0);
        mesh.add_quad(0, 1, 2, 3);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.index_data(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_vertex_data_flat() {
        let mut mesh = Mesh::new();
        mesh.add_vertices(vec![
            Vertex::new(Vec3::ZERO, Vec3::Y),
            Vertex::new(Vec3::X, Vec3::Y),
        ]);
        assert_eq!(mesh.vertex_data().len(), 12);
    }
}
