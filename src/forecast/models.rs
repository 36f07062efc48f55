use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::types::{BlockSchedule, Series};

use super::{ForecastError, ForecastModel, ForecastParams};

/// Generates a forecast series aligned to the block schedule.
///
/// Output length always equals the schedule length, and values are clamped
/// to be non-negative.
pub fn forecast(
    name: &str,
    params: &ForecastParams,
    schedule: &BlockSchedule,
) -> Result<Series, ForecastError> {
    let n = schedule.len();
    let values = match params.model {
        ForecastModel::Constant => vec![params.initial.max(0.0); n],
        ForecastModel::Cgr => cgr(params.initial, params.mean, n),
        ForecastModel::Gbm => gbm(params.initial, params.mean, params.volatility, params.seed, n),
    };
    Ok(Series::new(name, values))
}

/// Deterministic compounding at `rate` per period.
fn cgr(initial: f64, rate: f64, n: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(n);
    let mut current = initial;
    for _ in 0..n {
        values.push(current.max(0.0));
        current *= 1.0 + rate;
    }
    values
}

/// Geometric Brownian motion with per-period drift and volatility, seeded
/// for reproducibility.
fn gbm(initial: f64, drift: f64, volatility: f64, seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).expect("unit normal is well formed");

    let mut values = Vec::with_capacity(n);
    let mut current = initial;
    for _ in 0..n {
        values.push(current.max(0.0));
        let shock: f64 = normal.sample(&mut rng);
        current *= (drift - volatility * volatility / 2.0 + volatility * shock).exp();
    }
    values
}
