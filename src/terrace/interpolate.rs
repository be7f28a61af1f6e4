use godot::prelude::*;

/// Where the slice plane crosses an edge, on the cap plane and one riser below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCrossing {
    pub cap: Vector3,
    pub sub: Vector3,
}

/// Fraction along the edge `a -> b` where height `h` is reached.
///
/// Edges whose endpoints share a height never straddle a slice, so the
/// classifier must not ask for them.
#[must_use]
#[inline]
pub fn edge_parameter(a: f32, b: f32, h: f32) -> f32 {
    debug_assert!(a != b, "interpolating a flat edge ({a} == {b}) at h={h}");
    (a - h) / (a - b)
}

/// Exact at both ends: t = 0 gives `a`, t = 1 gives `b`.
#[must_use]
#[inline]
pub fn lerp_exact(a: Vector3, b: Vector3, t: f32) -> Vector3 {
    a * (1.0 - t) + b * t
}

/// Project a corner onto the horizontal plane at height `y`.
#[must_use]
#[inline]
pub fn on_plane(p: Vector3, y: f32) -> Vector3 {
    Vector3::new(p.x, y, p.z)
}

/// Crossing of the slice at `h` along the edge `from -> to`, with the matching
/// point on the plane `riser` below.
#[must_use]
pub fn interpolate_edge(from: Vector3, to: Vector3, h: f32, riser: f32) -> EdgeCrossing {
    let t = edge_parameter(from.y, to.y, h);
    let p = lerp_exact(from, to, t);
    EdgeCrossing {
        cap: on_plane(p, h),
        sub: on_plane(p, h - riser),
    }
}
