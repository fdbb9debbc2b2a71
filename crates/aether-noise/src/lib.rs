//! Deterministic 3D gradient noise and time-drifting fractal Brownian motion.
//!
//! [`NoiseField`] wraps a seeded Perlin lattice and guarantees output in
//! `[-1, 1]`. [`NoiseField::fbm`] composites a few octaves, each doubling
//! frequency and halving amplitude, with every octave sliding slowly through
//! the field as the frame clock advances so the surface drifts instead of
//! jittering.

use glam::Vec3;
use noise::{NoiseFn, Perlin};

/// Seed used when no other seed is configured.
pub const DEFAULT_SEED: u32 = 1337;

/// Configuration for the time-drifting fBm sum.
#[derive(Clone, Debug, PartialEq)]
pub struct FbmParams {
    /// Number of octaves. Default: 3.
    pub octaves: u32,
    /// Frequency of the first octave, in cycles per unit of normalized object space.
    pub base_frequency: f32,
    /// Frequency multiplier between octaves. Default: 2.0.
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves. Default: 0.5.
    pub persistence: f32,
    /// Per-octave drift speed (field units per second). Octaves beyond the
    /// end of the list reuse the last entry.
    pub drift: Vec<f32>,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 3,
            base_frequency: 1.6,
            lacunarity: 2.0,
            persistence: 0.5,
            drift: vec![0.01, 0.02, 0.03],
        }
    }
}

impl FbmParams {
    /// Drift speed for the given octave.
    pub fn drift_for(&self, octave: usize) -> f32 {
        self.drift
            .get(octave)
            .or_else(|| self.drift.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of all octave amplitudes, used to normalize the fBm back into `[-1, 1]`.
    pub fn amplitude_sum(&self) -> f32 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..self.octaves {
            sum += amp;
            amp *= self.persistence;
        }
        sum
    }
}

/// Fixed, non-axis-aligned drift directions so octaves do not slide in lockstep.
const DRIFT_DIRECTIONS: [Vec3; 3] = [
    Vec3::new(1.0, 0.31, -0.47),
    Vec3::new(-0.62, 1.0, 0.23),
    Vec3::new(0.18, -0.54, 1.0),
];

/// Deterministic, range-bounded 3D gradient-noise field.
#[derive(Clone)]
pub struct NoiseField {
    seed: u32,
    perlin: Perlin,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl NoiseField {
    /// Create a field for the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    /// Seed this field was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the raw field. Always in `[-1, 1]`.
    pub fn noise3(&self, p: Vec3) -> f32 {
        let v = self.perlin.get([p.x as f64, p.y as f64, p.z as f64]) as f32;
        v.clamp(-1.0, 1.0)
    }

    /// Time-drifting fBm at `p`, normalized and re-clamped to `[-1, 1]`.
    pub fn fbm(&self, p: Vec3, time: f32, params: &FbmParams) -> f32 {
        let mut total = 0.0;
        let mut frequency = params.base_frequency;
        let mut amplitude = 1.0;

        for octave in 0..params.octaves as usize {
            let dir = DRIFT_DIRECTIONS[octave % DRIFT_DIRECTIONS.len()];
            let offset = dir * (params.drift_for(octave) * time);
            total += self.noise3(p * frequency + offset) * amplitude;

            frequency *= params.lacunarity;
            amplitude *= params.persistence;
        }

        let norm = params.amplitude_sum();
        if norm <= f32::EPSILON {
            return 0.0;
        }
        (total / norm).clamp(-1.0, 1.0)
    }

    /// Central-difference gradient of [`Self::fbm`] with step `epsilon`.
    pub fn fbm_gradient(&self, p: Vec3, time: f32, params: &FbmParams, epsilon: f32) -> Vec3 {
        let eps = epsilon.max(1e-6);
        let dx = Vec3::new(eps, 0.0, 0.0);
        let dy = Vec3::new(0.0, eps, 0.0);
        let dz = Vec3::new(0.0, 0.0, eps);
        let inv = 1.0 / (2.0 * eps);
        Vec3::new(
            self.fbm(p + dx, time, params) - self.fbm(p - dx, time, params),
            self.fbm(p + dy, time, params) - self.fbm(p - dy, time, params),
            self.fbm(p + dz, time, params) - self.fbm(p - dz, time, params),
        ) * inv
    }
}
