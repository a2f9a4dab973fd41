use rand::{SeedableRng, rngs::StdRng};

use super::{Profile, gaussian_noise, to_wh};

/// A rooftop solar array with a half-sine daylight production curve.
///
/// Production is zero outside `[sunrise_step, sunset_step)` and peaks at
/// midday. Multiplicative Gaussian noise models passing clouds.
///
/// # Examples
///
/// ```
/// use energy_ledger::feed::{Profile, SolarArray};
///
/// let mut pv = SolarArray::new(4000.0, 6, 18, 0.0, 24, 42);
/// assert_eq!(pv.energy_wh(2), 0);
/// assert!(pv.energy_wh(12) > 3900);
/// ```
#[derive(Debug, Clone)]
pub struct SolarArray {
    /// Production at the peak of the curve (Wh per step).
    pub peak_wh: f64,

    /// First daylight step (inclusive).
    pub sunrise_step: usize,

    /// Last daylight step (exclusive).
    pub sunset_step: usize,

    /// Relative noise standard deviation (0.05 = +/-5%).
    pub noise_std: f64,

    steps_per_day: usize,

    rng: StdRng,
}

impl SolarArray {
    /// Creates a solar array.
    ///
    /// Negative `peak_wh` and `noise_std` are clamped to zero, and a zero
    /// `steps_per_day` is treated as one.
    pub fn new(
        peak_wh: f64,
        sunrise_step: usize,
        sunset_step: usize,
        noise_std: f64,
        steps_per_day: usize,
        seed: u64,
    ) -> Self {
        Self {
            peak_wh: peak_wh.max(0.0),
            sunrise_step,
            sunset_step,
            noise_std: noise_std.max(0.0),
            steps_per_day: steps_per_day.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Position on the daylight curve in `[0, 1]`, 0 at night.
    fn daylight_frac(&self, step: usize) -> f64 {
        let t = step % self.steps_per_day;
        if t < self.sunrise_step || t >= self.sunset_step {
            return 0.0;
        }
        let span = (self.sunset_step - self.sunrise_step) as f64;
        let x = (t - self.sunrise_step) as f64 + 0.5;
        (std::f64::consts::PI * x / span).sin().max(0.0)
    }
}

impl Profile for SolarArray {
    fn energy_wh(&mut self, step: usize) -> u64 {
        let frac = self.daylight_frac(step);
        if frac <= 0.0 {
            return 0;
        }
        let noise_mult = 1.0 + gaussian_noise(&mut self.rng, self.noise_std);
        to_wh(self.peak_wh * frac * noise_mult)
    }

    fn kind(&self) -> &'static str {
        "SolarArray"
    }
}
