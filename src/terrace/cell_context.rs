use godot::prelude::*;

use super::interpolate::{interpolate_edge, on_plane, EdgeCrossing};
use super::table::Classification;
use super::types::CORNER_COUNT;

/// One cell cut by one slice, with corners already rotated into canonical slots.
#[derive(Clone, Debug)]
pub struct SliceContext {
    /// Canonical corners: `p[i]` is original corner `rotation[i]`.
    pub p: [Vector3; CORNER_COUNT],
    /// Slice (cap plane) height.
    pub height: f32,
    pub riser: f32,
    pub color: Color,
    pub classification: Classification,
}

// ================================
// ===== SliceContext Impl  =======
// ================================

impl SliceContext {
    pub fn new(
        corners: &[Vector3; CORNER_COUNT],
        classification: Classification,
        height: f32,
        riser: f32,
        color: Color,
    ) -> Self {
        let r = classification.case.rotation;
        Self {
            p: [corners[r[0]], corners[r[1]], corners[r[2]], corners[r[3]]],
            height,
            riser,
            color,
            classification,
        }
    }

    /// Canonical corner `slot` projected onto the cap plane.
    pub fn cap(&self, slot: usize) -> Vector3 {
        on_plane(self.p[slot], self.height)
    }

    /// Canonical corner `slot` projected onto the plane one riser below.
    pub fn sub(&self, slot: usize) -> Vector3 {
        on_plane(self.p[slot], self.height - self.riser)
    }

    /// Whether canonical slot `slot` is at or above the slice.
    pub fn is_above(&self, slot: usize) -> bool {
        self.classification
            .is_above(self.classification.case.rotation[slot])
    }

    /// Crossing on the edge between two canonical slots.
    /// The two slots must lie on opposite sides of the slice.
    pub fn crossing(&self, from: usize, to: usize) -> EdgeCrossing {
        debug_assert!(
            self.is_above(from) != self.is_above(to),
            "edge {from}->{to} does not straddle the slice (mask {:#06b})",
            self.classification.mask
        );
        interpolate_edge(self.p[from], self.p[to], self.height, self.riser)
    }
}
