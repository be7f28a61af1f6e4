//! Append-only output buffers shared across every cell of a mesh build.

use godot::prelude::*;

use crate::terrace::{Triangle, Vertex};

/// Growing vertex and triangle lists.
///
/// Triangles are recorded *before* the vertices they reference: a case calls
/// [`TerraceMesh::push_triangles`] with locally numbered indices, which are
/// rebased on the vertex count as it stands, then pushes its vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerraceMesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl TerraceMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
    }

    /// Offset the next block of vertices will start at.
    pub fn base_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Record locally numbered triangles, rebased on the current vertex count.
    pub fn push_triangles(&mut self, local: &[Triangle]) {
        let base = self.base_index();
        self.triangles.extend(local.iter().map(|&tri| tri + base));
    }

    pub fn push_vertex(&mut self, position: Vector3, color: Color) {
        self.vertices.push(Vertex::new(position, color));
    }

    pub fn push_vertices(&mut self, positions: &[Vector3], color: Color) {
        self.vertices
            .extend(positions.iter().map(|&p| Vertex::new(p, color)));
    }

    /// Concatenate `other`, rebasing its triangles past this mesh's vertices.
    pub fn append(&mut self, other: &TerraceMesh) {
        self.push_triangles(&other.triangles);
        self.vertices.extend_from_slice(&other.vertices);
    }

    /// Flat positions for a renderer.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    pub fn colors(&self) -> Vec<[f32; 4]> {
        self.vertices
            .iter()
            .map(|v| [v.color.r, v.color.g, v.color.b, v.color.a])
            .collect()
    }

    /// Flat index buffer, three per triangle.
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flat_map(|t| t.0).collect()
    }

    /// True when every triangle references an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.triangles.iter().all(|t| t.max_index() < n)
    }
}
