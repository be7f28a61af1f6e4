use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use std::sync::Arc;

/// Fractal Perlin height source for procedural terraces.
///
/// `sample(x, z)` = height_offset + fbm(x, z) * amplitude.
pub struct NoiseHeightField {
    fbm: Fbm<Perlin>,
    amplitude: f32,
    height_offset: f32,
}

impl NoiseHeightField {
    pub fn new(
        seed: u32,
        octaves: usize,
        frequency: f32,
        amplitude: f32,
        height_offset: f32,
    ) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves)
            .set_frequency(frequency as f64)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        Self {
            fbm,
            amplitude,
            height_offset,
        }
    }

    /// Height at world position (x, z).
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let noise_value = self.fbm.get([x as f64, z as f64]) as f32;
        self.height_offset + noise_value * self.amplitude
    }
}

/// Thread-safe shared noise source for parallel height field generation
pub type SharedNoiseField = Arc<NoiseHeightField>;
