/// Terracing parameters shared by the tile builder, extraction and the worker pool.
use godot::prelude::*;

use crate::error::{TerraceError, TerraceResult};
use crate::terrace::{DEFAULT_RISER_INTERVAL, DEFAULT_TERRACE_COLOR};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerraceParams {
    /// Height between consecutive plateaus. Always finite and > 0.
    riser_interval: f32,
    /// Color stamped on every generated vertex.
    pub color: Color,
}

impl TerraceParams {
    pub fn new(riser_interval: f32, color: Color) -> TerraceResult<Self> {
        if !riser_interval.is_finite() || riser_interval <= 0.0 {
            return Err(TerraceError::InvalidRiserInterval(riser_interval));
        }
        Ok(Self {
            riser_interval,
            color,
        })
    }

    pub fn riser_interval(&self) -> f32 {
        self.riser_interval
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for TerraceParams {
    fn default() -> Self {
        Self {
            riser_interval: DEFAULT_RISER_INTERVAL,
            color: DEFAULT_TERRACE_COLOR,
        }
    }
}
