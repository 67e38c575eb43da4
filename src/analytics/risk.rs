//! Monte Carlo profitability outlook.
//!
//! Each trial perturbs price and cost independently by a uniform multiplier in
//! `[1 - band, 1 + band]` and counts the trial as profitable when the
//! simulated margin is strictly positive. A zero margin is a loss.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Uniform;
use tracing::debug;

use crate::domain::{RiskConfig, RiskResult};
use crate::error::DssError;

/// Simulate with the default settings (1000 trials, ±15%) and a fresh,
/// entropy-seeded generator.
pub fn simulate_risk(base_price: f64, base_cost: f64) -> Result<RiskResult, DssError> {
    RiskSimulator::default().simulate(base_price, base_cost)
}

/// Simulate with a caller-supplied random source.
///
/// Inputs are validated before any trial runs.
pub fn simulate_risk_with<R: Rng + ?Sized>(
    rng: &mut R,
    base_price: f64,
    base_cost: f64,
    config: &RiskConfig,
) -> Result<RiskResult, DssError> {
    validate_amount("price", base_price)?;
    validate_amount("cost", base_cost)?;
    validate_config(config)?;

    let band = config.perturbation;
    let multiplier = Uniform::new_inclusive(1.0 - band, 1.0 + band);

    let mut profitable_scenarios = 0usize;
    for _ in 0..config.iterations {
        let simulated_price = base_price * multiplier.sample(rng);
        let simulated_cost = base_cost * multiplier.sample(rng);
        if simulated_price - simulated_cost > 0.0 {
            profitable_scenarios += 1;
        }
    }

    let result = RiskResult {
        profitable_scenarios,
        loss_scenarios: config.iterations - profitable_scenarios,
        total_simulations: config.iterations,
    };
    debug!(
        base_price,
        base_cost,
        profitable = result.profitable_scenarios,
        loss = result.loss_scenarios,
        "risk simulation finished"
    );
    Ok(result)
}

/// Owns a [`RiskConfig`] and picks the random source for each run.
#[derive(Debug, Clone, Default)]
pub struct RiskSimulator {
    config: RiskConfig,
}

impl RiskSimulator {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Run one simulation. Seeded runs are reproducible.
    pub fn simulate(&self, base_price: f64, base_cost: f64) -> Result<RiskResult, DssError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        simulate_risk_with(&mut rng, base_price, base_cost, &self.config)
    }
}

fn validate_amount(name: &str, value: f64) -> Result<(), DssError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(DssError::invalid_input(format!(
            "base {name} must be finite and non-negative (got {value})"
        )));
    }
    Ok(())
}

fn validate_config(config: &RiskConfig) -> Result<(), DssError> {
    if config.iterations == 0 {
        return Err(DssError::invalid_input("risk iterations must be > 0"));
    }
    let band = config.perturbation;
    if !(band.is_finite() && (0.0..1.0).contains(&band)) {
        return Err(DssError::invalid_input(format!(
            "perturbation band must be in [0, 1) (got {band})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_RISK_ITERATIONS;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn wide_margin_is_always_profitable() {
        let result = simulate_risk(100.0, 10.0).unwrap();
        assert_eq!(result.total_simulations, 1000);
        assert_eq!(result.profitable_scenarios, 1000);
        assert_eq!(result.loss_scenarios, 0);
    }

    #[test]
    fn zero_margin_splits_roughly_even() {
        let config = RiskConfig::default();
        let mut total_profitable = 0;
        for seed in 0..20 {
            let result = simulate_risk_with(&mut seeded(seed), 10.0, 10.0, &config).unwrap();
            assert_eq!(
                result.profitable_scenarios + result.loss_scenarios,
                DEFAULT_RISK_ITERATIONS
            );
            assert!(
                (350..=650).contains(&result.profitable_scenarios),
                "seed {seed}: {result:?}"
            );
            total_profitable += result.profitable_scenarios;
        }
        let share = total_profitable as f64 / (20 * DEFAULT_RISK_ITERATIONS) as f64;
        assert!((share - 0.5).abs() < 0.05, "share={share}");
    }

    #[test]
    fn zero_band_makes_equal_price_and_cost_a_loss() {
        let config = RiskConfig {
            perturbation: 0.0,
            ..RiskConfig::default()
        };
        let result = simulate_risk_with(&mut seeded(1), 10.0, 10.0, &config).unwrap();
        assert_eq!(result.loss_scenarios, result.total_simulations);
    }

    #[test]
    fn seeded_simulator_is_reproducible() {
        let sim = RiskSimulator::new(RiskConfig {
            seed: Some(7),
            iterations: 250,
            ..RiskConfig::default()
        });
        let a = sim.simulate(10.0, 9.5).unwrap();
        let b = sim.simulate(10.0, 9.5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_simulations, 250);
    }

    #[test]
    fn invalid_amounts_fail_fast() {
        for (price, cost) in [(-1.0, 5.0), (5.0, f64::NAN), (f64::INFINITY, 1.0)] {
            assert!(matches!(
                simulate_risk(price, cost),
                Err(DssError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let zero_iters = RiskConfig {
            iterations: 0,
            ..RiskConfig::default()
        };
        assert!(simulate_risk_with(&mut seeded(0), 10.0, 5.0, &zero_iters).is_err());

        let wide = RiskConfig {
            perturbation: 1.0,
            ..RiskConfig::default()
        };
        assert!(simulate_risk_with(&mut seeded(0), 10.0, 5.0, &wide).is_err());
    }
}
