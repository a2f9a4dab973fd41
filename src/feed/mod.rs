//! Synthetic readings: households with rooftop solar and a daily load curve.

pub mod load;
pub mod solar;

use rand::{Rng, rngs::StdRng};
use tracing::info;

pub use load::DailyLoad;
pub use solar::SolarArray;

use crate::config::FeedConfig;
use crate::ledger::{AccountId, AccountIdError, EnergyLedger, LedgerError};
use crate::store::LedgerStore;

/// Seed offset between households so their noise streams are uncorrelated.
const HOUSEHOLD_SEED_STRIDE: u64 = 1_000;
/// Seed offset of the load profile relative to its household's solar array.
const LOAD_SEED_OFFSET: u64 = 57;

/// A per-step energy profile.
pub trait Profile {
    /// Energy in whole watt-hours for the given step.
    fn energy_wh(&mut self, step: usize) -> u64;

    /// Human-readable profile name.
    fn kind(&self) -> &'static str;
}

/// One ledger account with a production and a consumption profile.
#[derive(Debug, Clone)]
pub struct Household {
    pub account: AccountId,
    pub solar: SolarArray,
    pub load: DailyLoad,
}

/// Drives a ledger with one reading per household per step.
#[derive(Debug, Clone)]
pub struct Feed {
    steps: usize,
    households: Vec<Household>,
}

impl Feed {
    pub fn new(steps: usize, households: Vec<Household>) -> Self {
        Self { steps, households }
    }

    /// Builds a feed from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an `AccountIdError` if a household account is not a valid id.
    pub fn from_config(cfg: &FeedConfig) -> Result<Self, AccountIdError> {
        let households = cfg
            .households
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let seed = cfg
                    .seed
                    .wrapping_add((i as u64).wrapping_mul(HOUSEHOLD_SEED_STRIDE));
                Ok(Household {
                    account: AccountId::new(h.account.as_str())?,
                    solar: SolarArray::new(
                        h.peak_wh,
                        h.sunrise_step,
                        h.sunset_step,
                        h.noise_std,
                        cfg.steps_per_day,
                        seed,
                    ),
                    load: DailyLoad::new(
                        h.base_wh,
                        h.swing_wh,
                        h.noise_std,
                        cfg.steps_per_day,
                        seed.wrapping_add(LOAD_SEED_OFFSET),
                    ),
                })
            })
            .collect::<Result<Vec<_>, AccountIdError>>()?;
        Ok(Self::new(cfg.steps, households))
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    /// Records every household's reading for every step, step by step.
    ///
    /// Returns the number of readings recorded.
    ///
    /// # Errors
    ///
    /// Stops at the first reading the ledger rejects and returns its error.
    pub fn run<S: LedgerStore>(&mut self, ledger: &EnergyLedger<S>) -> Result<usize, LedgerError> {
        let mut recorded = 0;
        for step in 0..self.steps {
            for h in &mut self.households {
                let produced = h.solar.energy_wh(step);
                let consumed = h.load.energy_wh(step);
                ledger.record_energy(&h.account, produced, consumed)?;
                recorded += 1;
            }
        }
        info!(
            households = self.households.len(),
            steps = self.steps,
            recorded,
            "feed complete"
        );
        Ok(recorded)
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Rounds a non-negative energy figure to whole watt-hours.
pub(crate) fn to_wh(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::config::LedgerConfig;

    #[test]
    fn noise_is_zero_without_std() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(gaussian_noise(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn to_wh_clamps_and_rounds() {
        assert_eq!(to_wh(-3.0), 0);
        assert_eq!(to_wh(f64::NAN), 0);
        assert_eq!(to_wh(2.5), 3);
        assert_eq!(to_wh(1234.4), 1234);
    }

    #[test]
    fn run_records_steps_times_households() {
        let cfg = LedgerConfig::neighbourhood();
        let mut feed = Feed::from_config(&cfg.feed).unwrap();
        let ledger = EnergyLedger::new();
        let recorded = feed.run(&ledger).unwrap();

        assert_eq!(recorded, cfg.feed.steps * cfg.feed.households.len());
        for h in feed.households() {
            assert_eq!(ledger.records(&h.account).len(), cfg.feed.steps);
        }
    }

    #[test]
    fn household_without_panels_produces_nothing() {
        let cfg = LedgerConfig::neighbourhood();
        let mut feed = Feed::from_config(&cfg.feed).unwrap();
        let ledger = EnergyLedger::new();
        feed.run(&ledger).unwrap();

        let house3 = AccountId::new("house-3").unwrap();
        assert_eq!(ledger.total_production(&house3), 0);
        assert!(ledger.total_consumption(&house3) > 0);
    }

    #[test]
    fn same_seed_same_ledger() {
        let cfg = LedgerConfig::neighbourhood();
        let a = EnergyLedger::new();
        let b = EnergyLedger::new();
        Feed::from_config(&cfg.feed).unwrap().run(&a).unwrap();
        Feed::from_config(&cfg.feed).unwrap().run(&b).unwrap();
        assert_eq!(a.snapshots(), b.snapshots());
    }
}
