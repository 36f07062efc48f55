use serde::{Deserialize, Serialize};

use super::ProductError;

/// A mining rig SKU. Hash rate is in TH/s, power in watts; `buffer` is the
/// excess power draw versus spec, as a fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub generation: Option<String>,
    pub manufacturer: String,
    pub hash_rate: f64,
    pub power: f64,
    pub buffer: f64,
    #[serde(default)]
    pub price: f64,
}

impl Rig {
    /// Display name. Single-letter or non-alphabetic generations attach
    /// directly to the model, others get a space.
    pub fn name(&self) -> String {
        let mut name = format!("{} {}", self.make, self.model);
        if let Some(generation) = &self.generation {
            if !generation.chars().all(|c| c.is_alphabetic()) || generation.len() == 1 {
                name.push_str(generation);
            } else {
                name.push(' ');
                name.push_str(generation);
            }
        }
        name
    }

    /// Power per unit of hash rate (W per TH/s); lower is better.
    pub fn efficiency(&self) -> Result<f64, ProductError> {
        if self.hash_rate == 0.0 {
            return Err(ProductError::ZeroHashRate(self.name()));
        }
        Ok(self.power / self.hash_rate)
    }
}
