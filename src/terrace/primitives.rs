use super::cell_context::SliceContext;
use super::types::Triangle;
use crate::mesh_builder::TerraceMesh;

const RISER_QUAD: [Triangle; 2] = [Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)];

/// All corners above: flat cap over the whole cell.
pub fn add_full_cap(ctx: &SliceContext, mesh: &mut TerraceMesh) {
    mesh.push_triangles(&RISER_QUAD);
    mesh.push_vertices(&[ctx.cap(0), ctx.cap(1), ctx.cap(2), ctx.cap(3)], ctx.color);
}

/// One corner above (canonical slot 1): riser quad and a small cap triangle.
pub fn add_outer_corner(ctx: &SliceContext, mesh: &mut TerraceMesh) {
    add_corner_island(ctx, mesh, 0, 1, 2);
}

/// Riser + cap triangle around `apex`, cut along the edges from `left` and `right`.
fn add_corner_island(
    ctx: &SliceContext,
    mesh: &mut TerraceMesh,
    left: usize,
    apex: usize,
    right: usize,
) {
    let a = ctx.crossing(left, apex);
    let b = ctx.crossing(right, apex);

    mesh.push_triangles(&[
        Triangle::new(0, 1, 2),
        Triangle::new(0, 2, 3),
        Triangle::new(4, 5, 6),
    ]);

    // Riser
    mesh.push_vertices(&[a.sub, a.cap, b.cap, b.sub], ctx.color);
    // Cap
    mesh.push_vertices(&[a.cap, ctx.cap(apex), b.cap], ctx.color);
}

/// Two adjacent corners above (slots 1 and 2): riser quad and a cap quad.
pub fn add_edge(ctx: &SliceContext, mesh: &mut TerraceMesh) {
    let a = ctx.crossing(0, 1);
    let b = ctx.crossing(3, 2);

    mesh.push_triangles(&[
        Triangle::new(0, 1, 2),
        Triangle::new(0, 2, 3),
        Triangle::new(4, 5, 6),
        Triangle::new(4, 6, 7),
    ]);

    mesh.push_vertices(&[a.sub, a.cap, b.cap, b.sub], ctx.color);
    mesh.push_vertices(&[a.cap, ctx.cap(1), ctx.cap(2), b.cap], ctx.color);
}

/// Two diagonal corners above (slots 1 and 3): two disjoint outer-corner islands.
///
/// The diagonal is never bridged, whatever the corner magnitudes.
pub fn add_saddle(ctx: &SliceContext, mesh: &mut TerraceMesh) {
    add_corner_island(ctx, mesh, 0, 1, 2);
    add_corner_island(ctx, mesh, 2, 3, 0);
}

/// Three corners above, slot 0 below: riser quad and a cap pentagon fanned from slot 2.
pub fn add_inner_corner(ctx: &SliceContext, mesh: &mut TerraceMesh) {
    let a = ctx.crossing(1, 0);
    let b = ctx.crossing(3, 0);

    mesh.push_triangles(&[
        Triangle::new(0, 1, 2),
        Triangle::new(0, 2, 3),
        Triangle::new(6, 4, 5),
        Triangle::new(6, 7, 8),
        Triangle::new(6, 8, 4),
    ]);

    mesh.push_vertices(&[a.sub, a.cap, b.cap, b.sub], ctx.color);
    mesh.push_vertices(
        &[a.cap, ctx.cap(1), ctx.cap(2), ctx.cap(3), b.cap],
        ctx.color,
    );
}
