/// Ordered slice heights for one cell.
///
/// Yields `floor(min) + k * interval` for k = 0, 1, … while the value stays
/// strictly below `max`. Computed by index, so non-dyadic intervals don't drift.
/// Clone to restart.
#[derive(Debug, Clone)]
pub struct HeightSlices {
    start: f32,
    max: f32,
    interval: f32,
    step: u32,
}

impl HeightSlices {
    /// `interval` must be finite and positive; `TerraceParams` guarantees that.
    #[must_use]
    pub fn new(min_height: f32, max_height: f32, interval: f32) -> Self {
        debug_assert!(interval.is_finite() && interval > 0.0);
        Self {
            start: min_height.floor(),
            max: max_height,
            interval,
            step: 0,
        }
    }

    fn height_at(&self, step: u32) -> f32 {
        self.start + step as f32 * self.interval
    }
}

impl Iterator for HeightSlices {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let h = self.height_at(self.step);
        if h < self.max {
            self.step += 1;
            Some(h)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = ((self.max - self.height_at(self.step)) / self.interval).ceil();
        let n = if remaining > 0.0 { remaining as usize } else { 0 };
        // Rounding can move the boundary by one slice either way.
        (n.saturating_sub(1), Some(n + 1))
    }
}

impl std::iter::FusedIterator for HeightSlices {}
