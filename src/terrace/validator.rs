use godot::prelude::*;
use std::collections::HashMap;

use crate::mesh_builder::TerraceMesh;

/// Area (as cross product length) below which a triangle counts as degenerate.
const DEGENERATE_EPSILON: f32 = 1e-9;
/// Largest |n.y| / |n| a riser may have and still count as vertical.
const VERTICAL_TOLERANCE: f32 = 1e-3;

/// Structural problems found in a terraced mesh.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Triangles referencing a vertex past the end of the buffer.
    pub out_of_range: Vec<usize>,
    /// Zero-area triangles. These appear wherever a corner lands exactly on a
    /// slice height and are harmless, so they do not fail validation.
    pub degenerate: Vec<usize>,
    /// Caps facing down, risers that are not vertical, and risers facing into
    /// the cap they hang from.
    pub misoriented: Vec<usize>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.out_of_range.is_empty() && self.misoriented.is_empty()
    }
}

/// Face normal using the mesh winding, (v1 - v0) x (v2 - v0).
pub fn face_normal(v0: Vector3, v1: Vector3, v2: Vector3) -> Vector3 {
    (v1 - v0).cross(v2 - v0)
}

/// Footprint of a point, as raw bits so it can key a map.
type FootprintKey = (u32, u32);
/// A horizontal segment: both footprints (sorted) and the shared height.
type EdgeKey = (FootprintKey, FootprintKey, u32);

fn footprint(p: Vector3) -> FootprintKey {
    (p.x.to_bits(), p.z.to_bits())
}

fn edge_key(a: Vector3, b: Vector3, y: f32) -> EdgeKey {
    let (fa, fb) = (footprint(a), footprint(b));
    (fa.min(fb), fa.max(fb), y.to_bits())
}

fn is_cap(v: [Vector3; 3]) -> bool {
    v[0].y == v[1].y && v[1].y == v[2].y
}

/// Check every triangle for valid indices and orientation.
///
/// Triangles whose three vertices share one height are caps and must face +y.
/// Everything else is a riser and must be vertical. A riser whose top edge is
/// also an edge of a cap must face away from that cap.
pub fn validate_mesh(mesh: &TerraceMesh) -> ValidationResult {
    let mut result = ValidationResult::default();
    let n = mesh.vertices.len() as u32;
    let position = |idx: u32| mesh.vertices[idx as usize].position;

    // Cap edge -> the cap vertex opposite it.
    let mut cap_edges: HashMap<EdgeKey, Vec<Vector3>> = HashMap::new();
    for tri in &mesh.triangles {
        if tri.max_index() >= n {
            continue;
        }
        let v = tri.0.map(position);
        if !is_cap(v) || face_normal(v[0], v[1], v[2]).length() <= DEGENERATE_EPSILON {
            continue;
        }
        for k in 0..3 {
            let (a, b, opposite) = (v[k], v[(k + 1) % 3], v[(k + 2) % 3]);
            cap_edges
                .entry(edge_key(a, b, a.y))
                .or_default()
                .push(opposite);
        }
    }

    for (i, tri) in mesh.triangles.iter().enumerate() {
        if tri.max_index() >= n {
            result.out_of_range.push(i);
            continue;
        }
        let v = tri.0.map(position);
        let normal = face_normal(v[0], v[1], v[2]);
        let len = normal.length();
        if len <= DEGENERATE_EPSILON {
            result.degenerate.push(i);
            continue;
        }

        let oriented = if is_cap(v) {
            normal.y > 0.0
        } else {
            normal.y.abs() / len <= VERTICAL_TOLERANCE && riser_faces_out(v, normal, &cap_edges)
        };
        if !oriented {
            result.misoriented.push(i);
        }
    }
    result
}

/// A vertical triangle spans exactly two footprints. Its top edge joins them
/// at its highest y; any cap sharing that edge must lie behind the normal.
fn riser_faces_out(
    v: [Vector3; 3],
    normal: Vector3,
    cap_edges: &HashMap<EdgeKey, Vec<Vector3>>,
) -> bool {
    let top = v[0].y.max(v[1].y).max(v[2].y);
    let a = v[0];
    let Some(b) = v.iter().copied().find(|p| footprint(*p) != footprint(a)) else {
        return true;
    };
    let Some(opposites) = cap_edges.get(&edge_key(a, b, top)) else {
        return true;
    };
    let anchor = Vector3::new(a.x, top, a.z);
    opposites
        .iter()
        .all(|&opposite| normal.dot(opposite - anchor) < 0.0)
}
