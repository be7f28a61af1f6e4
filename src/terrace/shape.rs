use godot::prelude::*;

use super::types::CORNER_COUNT;
use crate::error::{TerraceError, TerraceResult};

/// Anything that can be terraced: four ordered corners plus height bounds.
///
/// Corners are wound bottom-left, top-left, top-right, bottom-right.
/// Reversing that order flips every emitted triangle.
pub trait TerraceShape {
    fn min_height(&self) -> f32;
    fn max_height(&self) -> f32;
    fn corner(&self, index: usize) -> TerraceResult<Vector3>;

    /// All four corners in winding order.
    fn corners(&self) -> TerraceResult<[Vector3; CORNER_COUNT]> {
        Ok([
            self.corner(0)?,
            self.corner(1)?,
            self.corner(2)?,
            self.corner(3)?,
        ])
    }
}

/// A single quadrilateral cell of a height field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    /// Bottom left.
    pub p0: Vector3,
    /// Top left.
    pub p1: Vector3,
    /// Top right.
    pub p2: Vector3,
    /// Bottom right.
    pub p3: Vector3,
}

impl Square {
    #[must_use]
    pub const fn new(p0: Vector3, p1: Vector3, p2: Vector3, p3: Vector3) -> Self {
        Self { p0, p1, p2, p3 }
    }
}

impl TerraceShape for Square {
    fn min_height(&self) -> f32 {
        self.p0.y.min(self.p1.y.min(self.p2.y.min(self.p3.y)))
    }

    fn max_height(&self) -> f32 {
        self.p0.y.max(self.p1.y.max(self.p2.y.max(self.p3.y)))
    }

    fn corner(&self, index: usize) -> TerraceResult<Vector3> {
        match index {
            0 => Ok(self.p0),
            1 => Ok(self.p1),
            2 => Ok(self.p2),
            3 => Ok(self.p3),
            _ => Err(TerraceError::CornerIndexOutOfRange { index }),
        }
    }

    fn corners(&self) -> TerraceResult<[Vector3; CORNER_COUNT]> {
        Ok([self.p0, self.p1, self.p2, self.p3])
    }
}

/// Builds from the first four points; fewer than four is rejected.
impl TryFrom<&[Vector3]> for Square {
    type Error = TerraceError;

    fn try_from(points: &[Vector3]) -> Result<Self, Self::Error> {
        match points {
            [p0, p1, p2, p3, ..] => Ok(Self::new(*p0, *p1, *p2, *p3)),
            _ => Err(TerraceError::NotEnoughCorners {
                found: points.len(),
            }),
        }
    }
}

impl From<[Vector3; CORNER_COUNT]> for Square {
    fn from(p: [Vector3; CORNER_COUNT]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }
}
