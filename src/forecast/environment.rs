use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{BlockSchedule, Series};

use super::ForecastError;

/// The three forecast series of an environment, each aligned 1:1 with the
/// block schedule: bitcoin price (USD), transaction fees (BTC per block) and
/// network hash rate (M TH/s on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentForecast {
    pub price: Series,
    pub fees: Series,
    pub hash_rate: Series,
}

impl EnvironmentForecast {
    /// Bundles the three series, enforcing the alignment invariant.
    pub fn new(
        schedule: &BlockSchedule,
        price: Series,
        fees: Series,
        hash_rate: Series,
    ) -> Result<Self, ForecastError> {
        for series in [&price, &fees, &hash_rate] {
            if series.len() != schedule.len() {
                return Err(ForecastError::LengthMismatch {
                    name: series.name.clone(),
                    len: series.len(),
                    expected: schedule.len(),
                });
            }
        }
        Ok(Self {
            price,
            fees,
            hash_rate,
        })
    }
}

/// An environment: a block schedule plus the forecasts running on it.
/// Immutable once created; environments are deduplicated by parameter
/// fingerprint in the store.
#[derive(Debug, Clone)]
pub struct Environment {
    pub name: String,
    pub schedule: Arc<BlockSchedule>,
    pub forecast: EnvironmentForecast,
}

impl Environment {
    pub fn new(name: impl Into<String>, schedule: Arc<BlockSchedule>, forecast: EnvironmentForecast) -> Self {
        Self {
            name: name.into(),
            schedule,
            forecast,
        }
    }
}
