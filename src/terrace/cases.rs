use godot::prelude::*;

use super::cell_context::SliceContext;
use super::primitives::*;
use super::shape::TerraceShape;
use super::slices::HeightSlices;
use super::table::classify;
use super::types::{SliceStats, Template, CORNER_COUNT};
use crate::error::{TerraceError, TerraceResult};
use crate::mesh_builder::TerraceMesh;
use crate::shared_params::TerraceParams;

/// Emit the cap and riser for one cell cut at height `h`.
///
/// Returns the template the slice resolved to.
pub fn generate_slice(
    corners: &[Vector3; CORNER_COUNT],
    h: f32,
    params: &TerraceParams,
    mesh: &mut TerraceMesh,
) -> Template {
    let classification = classify(corners.map(|c| c.y), h);
    let template = classification.template();
    if template == Template::Empty {
        return template;
    }

    let ctx = SliceContext::new(
        corners,
        classification,
        h,
        params.riser_interval(),
        params.color,
    );

    match template {
        Template::Empty => {}
        Template::OuterCorner => add_outer_corner(&ctx, mesh),
        Template::Edge => add_edge(&ctx, mesh),
        Template::Saddle => add_saddle(&ctx, mesh),
        Template::InnerCorner => add_inner_corner(&ctx, mesh),
        Template::Full => add_full_cap(&ctx, mesh),
    }
    template
}

/// Terrace one cell: walk every slice from the floor of its lowest corner up to
/// its highest corner and append the geometry to `mesh`.
pub fn build_tile<S: TerraceShape + ?Sized>(
    shape: &S,
    params: &TerraceParams,
    mesh: &mut TerraceMesh,
) -> TerraceResult<SliceStats> {
    let corners = shape.corners()?;
    if let Some((index, corner)) = corners.iter().enumerate().find(|(_, c)| !c.y.is_finite()) {
        return Err(TerraceError::NonFiniteHeight {
            index,
            value: corner.y,
        });
    }
    let mut stats = SliceStats::default();

    for h in HeightSlices::new(shape.min_height(), shape.max_height(), params.riser_interval()) {
        stats.record(generate_slice(&corners, h, params, mesh));
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrace::interpolate::edge_parameter;
    use crate::terrace::shape::Square;
    use crate::terrace::table::CASE_TABLE;
    use crate::terrace::types::Triangle;

    fn unit_square(heights: [f32; 4]) -> Square {
        Square::new(
            Vector3::new(0.0, heights[0], 0.0),
            Vector3::new(0.0, heights[1], 1.0),
            Vector3::new(1.0, heights[2], 1.0),
            Vector3::new(1.0, heights[3], 0.0),
        )
    }

    fn corners_of(square: &Square) -> [Vector3; 4] {
        square.corners().expect("square corners")
    }

    fn heights_for_mask(mask: u8) -> [f32; 4] {
        let mut heights = [0.0; 4];
        for (i, h) in heights.iter_mut().enumerate() {
            if mask & (1 << i) != 0 {
                *h = 1.0;
            }
        }
        heights
    }

    #[test]
    fn test_counts_match_template_for_every_mask() {
        for mask in 0..16u8 {
            let square = unit_square(heights_for_mask(mask));
            let mut mesh = TerraceMesh::new();
            let corners = corners_of(&square);
            let template = generate_slice(&corners, 0.5, &TerraceParams::default(), &mut mesh);

            assert_eq!(template, CASE_TABLE[mask as usize].template());
            assert_eq!(mesh.vertex_count(), template.vertex_count(), "mask {mask:#06b}");
            assert_eq!(mesh.triangle_count(), template.triangle_count(), "mask {mask:#06b}");
            assert!(mesh.indices_in_range(), "mask {mask:#06b}");
        }
    }

    #[test]
    fn test_counts_independent_of_positions() {
        // Skewed footprint and uneven heights, same masks.
        for mask in 1..16u8 {
            let base = heights_for_mask(mask);
            let heights = [
                base[0] * 3.1 - 0.2,
                base[1] * 1.7 - 0.9,
                base[2] * 2.2 - 0.4,
                base[3] * 0.9 - 0.1,
            ];
            let corners = [
                Vector3::new(-0.3, heights[0], 0.1),
                Vector3::new(0.2, heights[1], 1.4),
                Vector3::new(1.6, heights[2], 0.9),
                Vector3::new(1.1, heights[3], -0.2),
            ];
            let mut mesh = TerraceMesh::new();
            let template = generate_slice(&corners, 0.0, &TerraceParams::default(), &mut mesh);
            assert_eq!(template, CASE_TABLE[mask as usize].template(), "mask {mask:#06b}");
            assert_eq!(mesh.vertex_count(), template.vertex_count());
            assert_eq!(mesh.triangle_count(), template.triangle_count());
        }
    }

    #[test]
    fn test_single_corner_above_scenario() {
        let square = unit_square([0.0, 1.0, 0.0, 0.0]);
        let corners = corners_of(&square);
        let mut mesh = TerraceMesh::new();

        let template = generate_slice(&corners, 0.5, &TerraceParams::default(), &mut mesh);

        assert_eq!(template, Template::OuterCorner);
        assert_eq!(mesh.vertex_count(), 7);
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(edge_parameter(0.0, 1.0, 0.5), 0.5);

        // Crossings sit halfway along both edges touching the top-left corner.
        let positions = mesh.positions();
        assert_eq!(positions[1], [0.0, 0.5, 0.5]);
        assert_eq!(positions[2], [0.5, 0.5, 1.0]);
        assert_eq!(positions[5], [0.0, 0.5, 1.0]);
        assert_eq!(positions[0], [0.0, 0.0, 0.5]);
        assert_eq!(positions[3], [0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_flat_cell_scenario() {
        let square = unit_square([0.3; 4]);
        let mut mesh = TerraceMesh::new();

        let stats = build_tile(&square, &TerraceParams::default(), &mut mesh).expect("build");

        assert_eq!(stats.slices, 1);
        assert_eq!(stats.count(Template::Full), 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.position.y == 0.0));
    }

    #[test]
    fn test_saddle_scenario() {
        let square = unit_square([1.0, 0.0, 1.0, 0.0]);
        let mut mesh = TerraceMesh::new();

        let corners = corners_of(&square);
        let template = generate_slice(&corners, 0.5, &TerraceParams::default(), &mut mesh);

        assert_eq!(template, Template::Saddle);
        assert_eq!(mesh.vertex_count(), 14);
        assert_eq!(mesh.triangle_count(), 6);

        // Two islands: triangles 0..3 only touch vertices 0..7, the rest 7..14.
        for tri in &mesh.triangles[..3] {
            assert!(tri.0.iter().all(|&i| i < 7), "{tri:?} leaks into second island");
        }
        for tri in &mesh.triangles[3..] {
            assert!(tri.0.iter().all(|&i| (7..14).contains(&i)), "{tri:?} leaks into first island");
        }

        // Each island's cap apex is one of the raised corners.
        let apexes = [mesh.vertices[5].position, mesh.vertices[12].position];
        assert!(apexes.contains(&Vector3::new(0.0, 0.5, 0.0)));
        assert!(apexes.contains(&Vector3::new(1.0, 0.5, 1.0)));
    }

    #[test]
    fn test_tile_visits_every_slice() {
        let square = unit_square([0.0, 2.0, 2.0, 0.0]);
        let mut mesh = TerraceMesh::new();

        let stats = build_tile(&square, &TerraceParams::default(), &mut mesh).expect("build");

        // 0.0 is full (everything >= 0), 0.5, 1.0, 1.5 cut an edge.
        assert_eq!(stats.slices, 4);
        assert_eq!(stats.count(Template::Full), 1);
        assert_eq!(stats.count(Template::Edge), 3);
        assert_eq!(mesh.vertex_count(), 4 + 3 * 8);
        assert!(mesh.indices_in_range());
    }

    #[test]
    fn test_rebase_across_cells() {
        let params = TerraceParams::default();
        let mut mesh = TerraceMesh::new();
        build_tile(&unit_square([0.3; 4]), &params, &mut mesh).expect("first");
        build_tile(&unit_square([0.0, 1.0, 0.0, 0.0]), &params, &mut mesh).expect("second");

        // Flat cap (4 verts) then the full slice at 0.0 (4) then the outer corner at 0.5.
        assert_eq!(mesh.triangles[2], Triangle::new(4, 5, 6));
        assert_eq!(mesh.triangles[4], Triangle::new(8, 9, 10));
        assert_eq!(mesh.triangles[6], Triangle::new(12, 13, 14));
        assert!(mesh.indices_in_range());
    }

    #[test]
    fn test_rotation_symmetry() {
        // Turning the corner labels a quarter turn reproduces the same geometry.
        // Slices that cut the cell only: a full cap picks its diagonal by label.
        let footprint = [(0.0_f32, 0.0_f32), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let heights = [0.2_f32, 1.7, 0.9, 1.4];
        let params = TerraceParams::default();

        let build = |shift: usize| {
            let corners: [Vector3; 4] = std::array::from_fn(|i| {
                let j = (i + shift) % 4;
                Vector3::new(footprint[j].0, heights[j], footprint[j].1)
            });
            let mut mesh = TerraceMesh::new();
            let templates =
                [0.5, 1.0, 1.5].map(|h| generate_slice(&corners, h, &params, &mut mesh));
            (mesh, templates)
        };

        let (reference, templates) = build(0);
        assert_eq!(
            templates,
            [Template::InnerCorner, Template::Saddle, Template::OuterCorner]
        );

        for shift in 1..4 {
            let (rotated, rotated_templates) = build(shift);
            assert_eq!(rotated_templates, templates, "shift {shift}");
            assert_eq!(rotated.vertex_count(), reference.vertex_count(), "shift {shift}");

            let mut a = triangle_set(&reference);
            let mut b = triangle_set(&rotated);
            a.sort();
            b.sort();
            assert_eq!(a, b, "shift {shift} produced different triangles");
        }
    }

    /// Triangles as rotation-normalized position triples, quantized for comparison.
    fn triangle_set(mesh: &TerraceMesh) -> Vec<[[i64; 3]; 3]> {
        let q = |v: Vector3| {
            [
                (v.x * 1e5).round() as i64,
                (v.y * 1e5).round() as i64,
                (v.z * 1e5).round() as i64,
            ]
        };
        mesh.triangles
            .iter()
            .map(|t| {
                let pts = t.0.map(|i| q(mesh.vertices[i as usize].position));
                // Cyclic rotation keeps winding; start from the smallest point.
                let start = (0..3).min_by_key(|&k| pts[k]).unwrap_or(0);
                [pts[start], pts[(start + 1) % 3], pts[(start + 2) % 3]]
            })
            .collect()
    }

    #[test]
    fn test_idempotent_builds() {
        let square = unit_square([0.1, 2.3, 1.4, 0.7]);
        let params = TerraceParams::default();

        let mut first = TerraceMesh::new();
        build_tile(&square, &params, &mut first).expect("first");

        let mut second = TerraceMesh::new();
        build_tile(&unit_square([0.3; 4]), &params, &mut second).expect("prefix");
        let offset = second.vertex_count() as u32;
        let tri_offset = second.triangle_count();
        build_tile(&square, &params, &mut second).expect("second");

        assert_eq!(&second.vertices[offset as usize..], &first.vertices[..]);
        for (a, b) in first.triangles.iter().zip(&second.triangles[tri_offset..]) {
            assert_eq!(*a + offset, *b);
        }
    }

    #[test]
    fn test_interpolated_edges_always_straddle() {
        // Sweep a spread of corner heights; crossings assert straddling in debug builds.
        let params = TerraceParams::default();
        let samples = [-1.25_f32, -0.5, 0.0, 0.3, 0.5, 1.0, 1.75, 2.5];
        let mut mesh = TerraceMesh::new();
        for &a in &samples {
            for &b in &samples {
                for &c in &samples {
                    for &d in &samples {
                        build_tile(&unit_square([a, b, c, d]), &params, &mut mesh).expect("build");
                    }
                }
            }
        }
        assert!(mesh.indices_in_range());
        assert!(mesh.vertices.iter().all(|v| {
            let p = v.position;
            p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
        }));
    }

    #[test]
    fn test_non_finite_corner_rejected() {
        let mut mesh = TerraceMesh::new();
        let result = build_tile(
            &unit_square([0.0, f32::NEG_INFINITY, 1.0, 0.0]),
            &TerraceParams::default(),
            &mut mesh,
        );
        assert!(matches!(
            result,
            Err(TerraceError::NonFiniteHeight { index: 1, .. })
        ));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_custom_color_applied() {
        let params = TerraceParams::default().with_color(Color::WHITE);
        let mut mesh = TerraceMesh::new();
        build_tile(&unit_square([0.0, 1.0, 2.0, 1.0]), &params, &mut mesh).expect("build");
        assert!(mesh.vertices.iter().all(|v| v.color == Color::WHITE));
    }
}
