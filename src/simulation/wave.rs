use std::f64::consts::PI;

use ndarray::Array2;

use crate::config::{POND_RADIUS, WAVE_AMPLITUDE, WAVE_LENGTH, WAVE_SPEED};
use crate::simulation::grid::PondGrid;

/// Parameters of the closed-form ripple.
///
/// The field is an analytic approximation, not a solution of the wave
/// equation: a travelling sinusoid attenuated exponentially with distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    /// Waves are cut off beyond this distance (m)
    pub pond_radius: f64,
    /// Peak height (m)
    pub amplitude: f64,
    /// Phase speed (m/s)
    pub wave_speed: f64,
    /// Spatial period (m)
    pub wave_length: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            pond_radius: POND_RADIUS,
            amplitude: WAVE_AMPLITUDE,
            wave_speed: WAVE_SPEED,
            wave_length: WAVE_LENGTH,
        }
    }
}

impl WaveParams {
    /// Exponential attenuation with distance from the impact point
    pub fn damping(&self, r: f64) -> f64 {
        (-r / self.pond_radius).exp()
    }

    /// Surface height (m) at distance `r` from the impact point at time `t`
    pub fn height(&self, r: f64, t: f64) -> f64 {
        if r > self.pond_radius {
            return 0.0;
        }
        let phase = 2.0 * PI * (r - self.wave_speed * t) / self.wave_length;
        self.amplitude * phase.sin() * self.damping(r)
    }

    /// Time for the pattern to repeat at a fixed point (s)
    pub fn period(&self) -> f64 {
        self.wave_length / self.wave_speed
    }
}

/// Evaluate the height field over the whole grid at time `t`
pub fn wave_function(grid: &PondGrid, params: &WaveParams, t: f64) -> Array2<f64> {
    grid.r.mapv(|r| params.height(r, t))
}

/// Value range of a field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
}

impl FieldStats {
    pub fn of(field: &Array2<f64>) -> Self {
        let (min, max) = field
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if min > max {
            // Empty field
            return Self { min: 0.0, max: 0.0 };
        }
        Self { min, max }
    }
}
