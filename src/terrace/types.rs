use std::ops::Add;

use godot::prelude::*;

// =====================
// ===== Constants =====
// =====================

pub const DEFAULT_RISER_INTERVAL: f32 = 0.5;
pub const DEFAULT_TERRACE_COLOR: Color = Color::from_rgba(1.0, 0.474_821_7, 0.0, 1.0);

/// Number of corners in a cell.
pub const CORNER_COUNT: usize = 4;

// =====================
// ===== Types  ========
// =====================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub color: Color,
}

impl Vertex {
    #[must_use]
    pub const fn new(position: Vector3, color: Color) -> Self {
        Self { position, color }
    }
}

/// Three indices into a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle(pub [u32; 3]);

impl Triangle {
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    #[must_use]
    pub fn max_index(self) -> u32 {
        self.0[0].max(self.0[1]).max(self.0[2])
    }
}

/// Rebase a locally numbered triangle onto a buffer offset.
impl Add<u32> for Triangle {
    type Output = Triangle;

    fn add(self, offset: u32) -> Triangle {
        Triangle([self.0[0] + offset, self.0[1] + offset, self.0[2] + offset])
    }
}

/// Geometric template a slice resolves to after canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Cell entirely below the slice.
    Empty,
    /// One corner above: riser quad + cap triangle.
    OuterCorner,
    /// Two adjacent corners above: riser quad + cap quad.
    Edge,
    /// Two diagonal corners above: two independent outer corners.
    Saddle,
    /// Three corners above: riser quad + cap pentagon.
    InnerCorner,
    /// All corners above: flat cap.
    Full,
}

impl Template {
    #[must_use]
    pub fn vertex_count(self) -> usize {
        match self {
            Template::Empty => 0,
            Template::OuterCorner => 7,
            Template::Edge => 8,
            Template::Saddle => 14,
            Template::InnerCorner => 9,
            Template::Full => 4,
        }
    }

    #[must_use]
    pub fn triangle_count(self) -> usize {
        match self {
            Template::Empty => 0,
            Template::OuterCorner => 3,
            Template::Edge => 4,
            Template::Saddle => 6,
            Template::InnerCorner => 5,
            Template::Full => 2,
        }
    }

    /// Index used by per-template counters.
    #[must_use]
    pub fn to_index(self) -> usize {
        match self {
            Template::Empty => 0,
            Template::OuterCorner => 1,
            Template::Edge => 2,
            Template::Saddle => 3,
            Template::InnerCorner => 4,
            Template::Full => 5,
        }
    }
}

/// What a single cell build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceStats {
    pub slices: usize,
    /// Slice count per template, indexed by `Template::to_index`.
    pub templates: [usize; 6],
}

impl SliceStats {
    pub fn record(&mut self, template: Template) {
        self.slices += 1;
        self.templates[template.to_index()] += 1;
    }

    #[must_use]
    pub fn count(&self, template: Template) -> usize {
        self.templates[template.to_index()]
    }

    pub fn merge(&mut self, other: &SliceStats) {
        self.slices += other.slices;
        for (acc, n) in self.templates.iter_mut().zip(other.templates) {
            *acc += n;
        }
    }
}
