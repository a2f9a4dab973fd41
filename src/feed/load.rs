use rand::{SeedableRng, rngs::StdRng};

use super::{Profile, gaussian_noise, to_wh};

/// Phase of the consumption sinusoid, placing the evening peak after sunset.
const LOAD_PHASE_RAD: f64 = 1.2;

/// Household consumption with a sinusoidal daily swing.
#[derive(Debug, Clone)]
pub struct DailyLoad {
    /// Mean consumption (Wh per step).
    pub base_wh: f64,
    /// Amplitude of the daily swing (Wh per step).
    pub swing_wh: f64,
    /// Relative noise standard deviation.
    pub noise_std: f64,
    steps_per_day: usize,
    rng: StdRng,
}

impl DailyLoad {
    pub fn new(
        base_wh: f64,
        swing_wh: f64,
        noise_std: f64,
        steps_per_day: usize,
        seed: u64,
    ) -> Self {
        Self {
            base_wh: base_wh.max(0.0),
            swing_wh: swing_wh.max(0.0),
            noise_std: noise_std.max(0.0),
            steps_per_day: steps_per_day.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Profile for DailyLoad {
    fn energy_wh(&mut self, step: usize) -> u64 {
        let day_pos = (step % self.steps_per_day) as f64 / self.steps_per_day as f64;
        let angle = 2.0 * std::f64::consts::PI * day_pos + LOAD_PHASE_RAD;
        let mean = self.base_wh + self.swing_wh * angle.sin();
        let noise_mult = 1.0 + gaussian_noise(&mut self.rng, self.noise_std);
        to_wh(mean * noise_mult)
    }

    fn kind(&self) -> &'static str {
        "DailyLoad"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trough_is_clamped_when_swing_exceeds_base() {
        let mut load = DailyLoad::new(100.0, 500.0, 0.2, 24, 3);
        let total: u64 = (0..48).map(|t| load.energy_wh(t)).sum();
        assert!(total > 0);
    }

    #[test]
    fn flat_profile_without_swing_or_noise() {
        let mut load = DailyLoad::new(750.0, 0.0, 0.0, 24, 0);
        assert!((0..24).all(|t| load.energy_wh(t) == 750));
    }

    #[test]
    fn deterministic_for_seed() {
        let mut a = DailyLoad::new(800.0, 700.0, 0.05, 24, 9);
        let mut b = DailyLoad::new(800.0, 700.0, 0.05, 24, 9);
        let xs: Vec<u64> = (0..24).map(|t| a.energy_wh(t)).collect();
        let ys: Vec<u64> = (0..24).map(|t| b.energy_wh(t)).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.kind(), "DailyLoad");
    }
}
