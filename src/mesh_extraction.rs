use std::ops::Range;

use rayon::prelude::*;

use crate::debug_log::debug_log;
use crate::error::TerraceResult;
use crate::height_field::HeightField;
use crate::mesh_builder::TerraceMesh;
use crate::shared_params::TerraceParams;
use crate::terrace::{build_tile, SliceStats};

/// Geometry for a block of cells plus what the slice loop did to produce it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedMesh {
    pub mesh: TerraceMesh,
    pub stats: SliceStats,
}

impl ExtractedMesh {
    /// Concatenate `other` after this mesh.
    pub fn append(&mut self, other: &ExtractedMesh) {
        self.mesh.append(&other.mesh);
        self.stats.merge(&other.stats);
    }
}

/// Terrace the cells in `xs` x `zs`, row-major (z outer, x inner).
pub fn extract_region(
    field: &HeightField,
    xs: Range<usize>,
    zs: Range<usize>,
    params: &TerraceParams,
) -> TerraceResult<ExtractedMesh> {
    let mut out = ExtractedMesh::default();
    for z in zs {
        for x in xs.clone() {
            let square = field.cell(x, z)?;
            let stats = build_tile(&square, params, &mut out.mesh)?;
            out.stats.merge(&stats);
        }
    }
    Ok(out)
}

/// Terrace every cell of `field` into one mesh, on the calling thread.
pub fn extract_terraced_mesh(
    field: &HeightField,
    params: &TerraceParams,
) -> TerraceResult<ExtractedMesh> {
    let out = extract_region(field, 0..field.cells_x(), 0..field.cells_z(), params)?;
    log_extraction("extract_terraced_mesh", field, &out);
    Ok(out)
}

/// Same output as [`extract_terraced_mesh`], with one rayon task per row of cells.
///
/// Rows are built into private meshes and concatenated in row order, so the
/// vertex and index layout matches the sequential build exactly.
pub fn extract_terraced_mesh_parallel(
    field: &HeightField,
    params: &TerraceParams,
) -> TerraceResult<ExtractedMesh> {
    let cells_x = field.cells_x();
    let rows: Vec<ExtractedMesh> = (0..field.cells_z())
        .into_par_iter()
        .map(|z| extract_region(field, 0..cells_x, z..z + 1, params))
        .collect::<TerraceResult<_>>()?;

    let (verts, tris) = rows.iter().fold((0, 0), |(v, t), row| {
        (v + row.mesh.vertex_count(), t + row.mesh.triangle_count())
    });
    let mut out = ExtractedMesh {
        mesh: TerraceMesh::with_capacity(verts, tris),
        stats: SliceStats::default(),
    };
    for row in &rows {
        out.append(row);
    }

    log_extraction("extract_terraced_mesh_parallel", field, &out);
    Ok(out)
}

fn log_extraction(label: &str, field: &HeightField, out: &ExtractedMesh) {
    if !cfg!(debug_assertions) {
        return;
    }
    let (lo, hi) = field.height_range();
    debug_log(&format!(
        "[{}] {}x{} cells, heights {:.2}..{:.2}: slices={}, verts={}, tris={}{}",
        label,
        field.cells_x(),
        field.cells_z(),
        lo,
        hi,
        out.stats.slices,
        out.mesh.vertex_count(),
        out.mesh.triangle_count(),
        if out.mesh.is_empty() { " [EMPTY]" } else { "" }
    ));
}
