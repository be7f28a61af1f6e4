//! Corner-mask classification for one cell against one slice plane.
//!
//! Bit `i` of the mask is set when corner `i` is at or above the slice
//! (`>=`, so a corner exactly on the plane counts as above). The 16 masks
//! collapse onto six templates by rotating the corner labels:
//!
//! ```text
//!   p1 ──── p2        canonical slots after rotation:
//!   │        │          outer corner   p1 above
//!   │        │          edge           p1, p2 above
//!   p0 ──── p3          saddle         p1, p3 above
//!                       inner corner   p0 below
//! ```
//!
//! The saddle rotations are fixed per mask and ignore corner magnitudes, so
//! two neighbouring saddle cells may disagree on connectivity.

use super::types::{Template, CORNER_COUNT};

/// `rotation[i]` is the original corner index that lands in canonical slot `i`.
pub type Rotation = [usize; CORNER_COUNT];

const IDENTITY: Rotation = [0, 1, 2, 3];
const TURN_1: Rotation = [1, 2, 3, 0];
const TURN_2: Rotation = [2, 3, 0, 1];
const TURN_3: Rotation = [3, 0, 1, 2];

/// Resolved case for one mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellCase {
    /// Number of corners at or above the slice.
    pub category: u8,
    pub saddle: bool,
    pub rotation: Rotation,
}

impl CellCase {
    const fn new(category: u8, saddle: bool, rotation: Rotation) -> Self {
        Self {
            category,
            saddle,
            rotation,
        }
    }

    #[must_use]
    pub fn template(self) -> Template {
        match (self.category, self.saddle) {
            (0, _) => Template::Empty,
            (1, _) => Template::OuterCorner,
            (2, false) => Template::Edge,
            (2, true) => Template::Saddle,
            (3, _) => Template::InnerCorner,
            _ => Template::Full,
        }
    }
}

/// Indexed by corner mask.
pub const CASE_TABLE: [CellCase; 16] = [
    CellCase::new(0, false, IDENTITY), // 0b0000
    CellCase::new(1, false, TURN_3),   // 0b0001
    CellCase::new(1, false, IDENTITY), // 0b0010
    CellCase::new(2, false, TURN_3),   // 0b0011
    CellCase::new(1, false, TURN_1),   // 0b0100
    CellCase::new(2, true, TURN_1),    // 0b0101
    CellCase::new(2, false, IDENTITY), // 0b0110
    CellCase::new(3, false, TURN_3),   // 0b0111
    CellCase::new(1, false, TURN_2),   // 0b1000
    CellCase::new(2, false, TURN_2),   // 0b1001
    CellCase::new(2, true, IDENTITY),  // 0b1010
    CellCase::new(3, false, TURN_2),   // 0b1011
    CellCase::new(2, false, TURN_1),   // 0b1100
    CellCase::new(3, false, TURN_1),   // 0b1101
    CellCase::new(3, false, IDENTITY), // 0b1110
    CellCase::new(4, false, IDENTITY), // 0b1111
];

#[must_use]
#[inline]
pub fn corner_mask(heights: [f32; CORNER_COUNT], h: f32) -> u8 {
    heights
        .iter()
        .enumerate()
        .fold(0u8, |mask, (i, &y)| if y >= h { mask | (1 << i) } else { mask })
}

/// Mask plus its resolved case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub mask: u8,
    pub case: CellCase,
}

impl Classification {
    /// Whether original corner `index` is at or above the slice.
    #[must_use]
    pub fn is_above(&self, index: usize) -> bool {
        self.mask & (1 << index) != 0
    }

    #[must_use]
    pub fn template(&self) -> Template {
        self.case.template()
    }
}

#[must_use]
pub fn classify(heights: [f32; CORNER_COUNT], h: f32) -> Classification {
    let mask = corner_mask(heights, h);
    Classification {
        mask,
        case: CASE_TABLE[mask as usize],
    }
}
