//! Regular grid of height samples, addressed cell by cell.
//!
//! A field of `width x depth` samples has `(width - 1) x (depth - 1)` cells.
//! Sample (x, z) sits at world position (x * cell_size, h, z * cell_size).

use godot::prelude::*;

use crate::error::{TerraceError, TerraceResult};
use crate::noise_field::NoiseHeightField;
use crate::terrace::Square;

#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: usize,
    depth: usize,
    cell_size: f32,
    /// Row-major by z: sample (x, z) lives at `z * width + x`.
    heights: Vec<f32>,
}

impl HeightField {
    pub fn new(
        width: usize,
        depth: usize,
        cell_size: f32,
        heights: Vec<f32>,
    ) -> TerraceResult<Self> {
        if width < 2 || depth < 2 {
            return Err(TerraceError::InvalidDimensions { width, depth });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TerraceError::InvalidCellSize(cell_size));
        }
        let expected = width * depth;
        if heights.len() != expected {
            return Err(TerraceError::HeightCountMismatch {
                expected,
                found: heights.len(),
            });
        }
        if let Some((index, &value)) = heights.iter().enumerate().find(|(_, h)| !h.is_finite()) {
            return Err(TerraceError::NonFiniteHeight { index, value });
        }

        Ok(Self {
            width,
            depth,
            cell_size,
            heights,
        })
    }

    /// Build from a function of sample coordinates.
    pub fn from_fn(
        width: usize,
        depth: usize,
        cell_size: f32,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> TerraceResult<Self> {
        let mut heights = Vec::with_capacity(width * depth);
        for z in 0..depth {
            for x in 0..width {
                heights.push(f(x, z));
            }
        }
        Self::new(width, depth, cell_size, heights)
    }

    /// Sample `noise` at every grid point's world position.
    pub fn from_noise(
        noise: &NoiseHeightField,
        width: usize,
        depth: usize,
        cell_size: f32,
    ) -> TerraceResult<Self> {
        Self::from_fn(width, depth, cell_size, |x, z| {
            noise.sample(x as f32 * cell_size, z as f32 * cell_size)
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cells_x(&self) -> usize {
        self.width - 1
    }

    pub fn cells_z(&self) -> usize {
        self.depth - 1
    }

    pub fn cell_count(&self) -> usize {
        self.cells_x() * self.cells_z()
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height of sample (x, z), if inside the grid.
    pub fn height(&self, x: usize, z: usize) -> Option<f32> {
        if x < self.width && z < self.depth {
            Some(self.heights[z * self.width + x])
        } else {
            None
        }
    }

    fn point(&self, x: usize, z: usize) -> Vector3 {
        Vector3::new(
            x as f32 * self.cell_size,
            self.heights[z * self.width + x],
            z as f32 * self.cell_size,
        )
    }

    /// The cell whose bottom-left sample is (x, z).
    pub fn cell(&self, x: usize, z: usize) -> TerraceResult<Square> {
        if x >= self.cells_x() || z >= self.cells_z() {
            return Err(TerraceError::CellOutOfBounds {
                x,
                z,
                cells_x: self.cells_x(),
                cells_z: self.cells_z(),
            });
        }
        Ok(Square::new(
            self.point(x, z),
            self.point(x, z + 1),
            self.point(x + 1, z + 1),
            self.point(x + 1, z),
        ))
    }

    /// Lowest and highest sample, for sizing buffers and logging.
    pub fn height_range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }
}
