use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod environment;
pub mod models;

pub use environment::{Environment, EnvironmentForecast};
pub use models::forecast;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Unknown forecast model: {0}")]
    InvalidModel(String),
    #[error("Series '{name}' has {len} values but the schedule has {expected} periods")]
    LengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },
}

/// Forecast model for a single environment series.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ForecastModel {
    /// Every period equals the initial value.
    Constant,
    /// Compound growth at a fixed per-period rate.
    #[serde(rename = "CGR")]
    Cgr,
    /// Geometric Brownian motion with drift and volatility.
    #[serde(rename = "GBM")]
    Gbm,
}

impl FromStr for ForecastModel {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Constant" => Ok(ForecastModel::Constant),
            "CGR" => Ok(ForecastModel::Cgr),
            "GBM" => Ok(ForecastModel::Gbm),
            other => Err(ForecastError::InvalidModel(other.to_string())),
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastModel::Constant => write!(f, "Constant"),
            ForecastModel::Cgr => write!(f, "CGR"),
            ForecastModel::Gbm => write!(f, "GBM"),
        }
    }
}

/// Parameters of one forecast series. `seed` makes stochastic models
/// reproducible; deterministic models ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    pub model: ForecastModel,
    pub initial: f64,
    pub mean: f64,
    pub volatility: f64,
    #[serde(default)]
    pub seed: u64,
}

impl ForecastParams {
    pub fn constant(initial: f64) -> Self {
        Self {
            model: ForecastModel::Constant,
            initial,
            mean: 0.0,
            volatility: 0.0,
            seed: 0,
        }
    }
}
