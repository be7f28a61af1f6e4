use crate::debug_log::{compute_normal_stats, count_duplicate_positions, debug_log};
use crate::error::{TerraceError, TerraceResult};
use crate::mesh_extraction::ExtractedMesh;
use crate::mesh_worker::ChunkResult;

/// Default grid spacing for position welding.
pub const DEFAULT_WELD_EPSILON: f32 = 1e-4;

/// Renderer-ready mesh: flat attribute arrays plus an index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombinedMesh {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl CombinedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl From<&ExtractedMesh> for CombinedMesh {
    fn from(extracted: &ExtractedMesh) -> Self {
        let mesh = &extracted.mesh;
        Self {
            vertices: mesh.positions(),
            normals: Vec::new(),
            colors: mesh.colors(),
            indices: mesh.indices(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostProcessParams {
    /// Positions are rounded to a grid of this spacing; vertices landing in
    /// the same grid cell (and agreeing on normal and color) are merged.
    weld_epsilon: f32,
    /// Remove zero-area triangles before welding.
    pub drop_degenerate: bool,
}

impl PostProcessParams {
    /// Fails unless `weld_epsilon` is finite and positive.
    pub fn new(weld_epsilon: f32, drop_degenerate: bool) -> TerraceResult<Self> {
        if !weld_epsilon.is_finite() || weld_epsilon <= 0.0 {
            return Err(TerraceError::InvalidWeldEpsilon(weld_epsilon));
        }
        Ok(Self {
            weld_epsilon,
            drop_degenerate,
        })
    }

    pub fn weld_epsilon(&self) -> f32 {
        self.weld_epsilon
    }
}

impl Default for PostProcessParams {
    fn default() -> Self {
        Self {
            weld_epsilon: DEFAULT_WELD_EPSILON,
            drop_degenerate: true,
        }
    }
}

/// Post-processor for merging and cleaning up terraced chunk meshes
pub struct MeshPostProcessor {
    pub params: PostProcessParams,
}

impl MeshPostProcessor {
    pub fn new(params: PostProcessParams) -> Self {
        Self { params }
    }

    /// Concatenate chunk meshes in row-major chunk order.
    ///
    /// The first failed chunk aborts the merge.
    pub fn merge_chunks(&self, mut chunks: Vec<ChunkResult>) -> TerraceResult<ExtractedMesh> {
        debug_log(&format!("[merge_chunks] Merging {} chunks", chunks.len()));
        chunks.sort_by_key(|chunk| chunk.coord.row_major());

        let mut merged = ExtractedMesh::default();
        for chunk in chunks {
            merged.append(&chunk.mesh?);
        }

        debug_log(&format!(
            "[merge_chunks] Final: {} verts, {} tris",
            merged.mesh.vertex_count(),
            merged.mesh.triangle_count()
        ));
        Ok(merged)
    }

    /// Drop zero-area triangles. Returns how many were removed.
    pub fn drop_degenerate_triangles(&self, mesh: &mut CombinedMesh) -> usize {
        let before = mesh.triangle_count();
        let vertices = &mesh.vertices;
        let kept: Vec<u32> = mesh
            .indices
            .chunks_exact(3)
            .filter(|tri| {
                let [a, b, c] = [0, 1, 2].map(|k| vertices[tri[k] as usize]);
                length(cross(sub(b, a), sub(c, a))) > NORMAL_EPSILON * NORMAL_EPSILON
            })
            .flatten()
            .copied()
            .collect();
        mesh.indices = kept;
        before - mesh.triangle_count()
    }

    /// One flat normal per vertex, taken from the face it belongs to.
    ///
    /// Terrace vertices are never shared between a cap and a riser, so every
    /// non-degenerate face touching a vertex agrees on its normal. Vertices
    /// reached only by degenerate faces get +Y.
    pub fn compute_flat_normals(&self, mesh: &mut CombinedMesh) {
        let mut normals = vec![[0.0, 1.0, 0.0]; mesh.vertices.len()];
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize]);
            let n = cross(sub(b, a), sub(c, a));
            if length(n) <= NORMAL_EPSILON * NORMAL_EPSILON {
                continue;
            }
            let n = normalize(n);
            for &idx in tri {
                normals[idx as usize] = n;
            }
        }
        mesh.normals = normals;
    }

    /// Weld vertices that agree on quantized position, normal and color
    /// Uses meshopt for efficient vertex deduplication
    pub fn weld_vertices(&self, mesh: &mut CombinedMesh) {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return;
        }

        let vertex_count = mesh.vertices.len();

        // Validate indices before processing
        if mesh.indices.iter().any(|&idx| idx as usize >= vertex_count) {
            return;
        }
        if mesh.normals.len() != vertex_count {
            self.compute_flat_normals(mesh);
        }

        let keys: Vec<WeldKey> = (0..vertex_count)
            .map(|i| {
                weld_key(
                    mesh.vertices[i],
                    mesh.normals[i],
                    mesh.colors.get(i).copied().unwrap_or([1.0; 4]),
                    self.params.weld_epsilon,
                )
            })
            .collect();

        let mut remap: Vec<u32> = vec![0; vertex_count];

        let unique_count = unsafe {
            meshopt::ffi::meshopt_generateVertexRemap(
                remap.as_mut_ptr(),
                mesh.indices.as_ptr(),
                mesh.indices.len(),
                keys.as_ptr() as *const std::ffi::c_void,
                vertex_count,
                std::mem::size_of::<WeldKey>(),
            )
        };

        // Safety check: if meshopt returned 0 unique vertices, don't modify the mesh
        if unique_count == 0 {
            return;
        }

        for idx in &mut mesh.indices {
            *idx = remap[*idx as usize];
        }

        let mut new_vertices = vec![[0.0f32; 3]; unique_count];
        let mut new_normals = vec![[0.0f32, 1.0, 0.0]; unique_count];
        let mut new_colors = vec![[1.0f32; 4]; unique_count];
        for (old_idx, &new_idx) in remap.iter().enumerate() {
            let idx = new_idx as usize;
            // Unreferenced vertices map to u32::MAX
            if idx < unique_count {
                new_vertices[idx] = mesh.vertices[old_idx];
                new_normals[idx] = mesh.normals[old_idx];
                if let Some(&color) = mesh.colors.get(old_idx) {
                    new_colors[idx] = color;
                }
            }
        }

        mesh.vertices = new_vertices;
        mesh.normals = new_normals;
        mesh.colors = new_colors;
    }

    /// Run the full post-processing pipeline
    pub fn process(&self, chunks: Vec<ChunkResult>) -> TerraceResult<CombinedMesh> {
        let merged = self.merge_chunks(chunks)?;
        Ok(self.process_mesh(&merged))
    }

    /// Post-process an already merged mesh
    pub fn process_mesh(&self, merged: &ExtractedMesh) -> CombinedMesh {
        let mut mesh = CombinedMesh::from(merged);

        if cfg!(debug_assertions) && !mesh.vertices.is_empty() {
            let epsilon = self.params.weld_epsilon;
            let shared = count_duplicate_positions(&mesh.vertices, epsilon);
            debug_log(&format!(
                "[process] {} positions shared by more than one vertex",
                shared
            ));
        }

        if self.params.drop_degenerate {
            let dropped = self.drop_degenerate_triangles(&mut mesh);
            if dropped > 0 {
                debug_log(&format!("[process] dropped {} degenerate tris", dropped));
            }
        }

        self.compute_flat_normals(&mut mesh);
        let before = mesh.vertex_count();
        self.weld_vertices(&mut mesh);

        if cfg!(debug_assertions) {
            let stats = compute_normal_stats(&mesh.normals);
            debug_log(&format!(
                "[process] weld {} -> {} verts, {} tris; normals up={}, horiz={}, degen={}",
                before,
                mesh.vertex_count(),
                mesh.triangle_count(),
                stats.up_count,
                stats.horizontal_count,
                stats.degenerate_count
            ));
        }

        mesh
    }
}

impl Default for MeshPostProcessor {
    fn default() -> Self {
        Self::new(PostProcessParams::default())
    }
}

/// Byte-comparable weld identity: quantized position and normal, raw color bits.
#[repr(C)]
#[derive(Clone, Copy)]
struct WeldKey([i32; 6], [u32; 4]);

fn weld_key(position: [f32; 3], normal: [f32; 3], color: [f32; 4], epsilon: f32) -> WeldKey {
    let scale = 1.0 / epsilon;
    let q = |v: f32, s: f32| (v * s).round() as i32;
    WeldKey(
        [
            q(position[0], scale),
            q(position[1], scale),
            q(position[2], scale),
            q(normal[0], 1e4),
            q(normal[1], 1e4),
            q(normal[2], 1e4),
        ],
        color.map(f32::to_bits),
    )
}

// Vector math helpers
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Epsilon for near-zero length checks (appropriate for f32 precision)
const NORMAL_EPSILON: f32 = 1e-6;

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len > NORMAL_EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 1.0, 0.0] // Default up vector for degenerate normals
    }
}
