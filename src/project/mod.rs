use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::{Infrastructure, Rig};
use crate::types::constants::TERAHASH;

pub mod instance;
pub mod temperature;

pub use instance::ProjectInstance;
pub use temperature::TempProfile;

#[cfg(test)]
mod tests;

/// Default amortization horizon for rigs and infrastructure, in months.
pub const DEFAULT_AMORTIZATION_MONTHS: f64 = 60.0;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project '{0}' has no rig fleet")]
    NoRig(String),
    #[error("Hourly temperature profile must have 8760 values, got {0}")]
    InvalidTempProfile(usize),
}

/// A rig SKU deployed at some quantity with a uniform overclock factor.
/// Overclocking scales hash rate and power linearly; the power buffer is
/// excess draw versus spec and applies to power only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigFleet {
    pub rig: Rig,
    pub quantity: f64,
    pub overclocking: f64,
    pub amortization: f64,
}

impl RigFleet {
    pub fn new(rig: Rig, quantity: f64, overclocking: f64) -> Self {
        Self {
            rig,
            quantity,
            overclocking,
            amortization: DEFAULT_AMORTIZATION_MONTHS,
        }
    }

    /// Effective hash rate of one unit, in H/s.
    pub fn unit_hash_rate(&self) -> f64 {
        self.rig.hash_rate * self.overclocking * TERAHASH
    }

    /// Power draw of one unit at the wall, in watts.
    pub fn unit_power_draw(&self) -> f64 {
        self.rig.power * self.overclocking * (1.0 + self.rig.buffer)
    }

    pub fn total_hash_rate(&self) -> f64 {
        self.quantity * self.unit_hash_rate()
    }

    pub fn total_power_draw(&self) -> f64 {
        self.quantity * self.unit_power_draw()
    }

    pub fn total_cost(&self) -> f64 {
        self.quantity * self.rig.price
    }
}

/// An infrastructure product deployed at some quantity. The price can be
/// overridden per project (negotiated pricing); the product list price is
/// used otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfraUnit {
    pub infrastructure: Infrastructure,
    pub quantity: f64,
    #[serde(default)]
    pub price: Option<f64>,
    pub amortization: f64,
}

impl InfraUnit {
    pub fn new(infrastructure: Infrastructure, quantity: f64) -> Self {
        Self {
            infrastructure,
            quantity,
            price: None,
            amortization: DEFAULT_AMORTIZATION_MONTHS,
        }
    }

    pub fn unit_price(&self) -> f64 {
        self.price.unwrap_or_else(|| self.infrastructure.price())
    }

    pub fn total_cost(&self) -> f64 {
        self.quantity * self.unit_price()
    }
}

/// One line of a project cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub product: String,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    pub total_cost: f64,
}

/// A mining project: one rig fleet, supporting infrastructure, site
/// parameters and cost assumptions. Mutable; every mutation bumps `version`
/// so derived statement sets for an older configuration are never served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Site power capacity in watts.
    pub capacity: f64,
    pub target_ambient_temp: TempProfile,
    pub target_overclocking: f64,
    /// Energy price in USD per kWh.
    pub energy_price: f64,
    /// Pool fee as a fraction of mined BTC.
    pub pool_fees: f64,
    pub tax_rate: f64,
    /// Monthly operating expenses, USD.
    pub opex: f64,
    /// Monthly property taxes, USD.
    pub property_taxes: f64,
    rigs: Option<RigFleet>,
    infrastructure: Vec<InfraUnit>,
    #[serde(default)]
    version: u64,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        capacity: f64,
        target_ambient_temp: TempProfile,
        target_overclocking: f64,
        energy_price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            capacity,
            target_ambient_temp,
            target_overclocking,
            energy_price,
            pool_fees: 0.0,
            tax_rate: 0.0,
            opex: 0.0,
            property_taxes: 0.0,
            rigs: None,
            infrastructure: Vec::new(),
            version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn fleet(&self) -> Result<&RigFleet, ProjectError> {
        self.rigs
            .as_ref()
            .ok_or_else(|| ProjectError::NoRig(self.name.clone()))
    }

    pub fn infrastructure(&self) -> &[InfraUnit] {
        &self.infrastructure
    }

    /// Sets the project's rig fleet. The project's target overclock factor
    /// applies to the whole fleet.
    pub fn add_rig(&mut self, rig: Rig, quantity: f64) {
        self.rigs = Some(RigFleet::new(rig, quantity, self.target_overclocking));
        self.version += 1;
    }

    pub fn add_infra(&mut self, infrastructure: Infrastructure, quantity: f64) {
        self.infrastructure
            .push(InfraUnit::new(infrastructure, quantity));
        self.version += 1;
    }

    pub fn remove_infra(&mut self, name: &str) {
        self.infrastructure
            .retain(|unit| unit.infrastructure.name() != name);
        self.version += 1;
    }

    /// Compound power usage effectiveness across all infrastructure.
    pub fn pue(&self) -> f64 {
        self.infrastructure
            .iter()
            .map(|unit| unit.infrastructure.pue())
            .product()
    }

    /// Rebalances quantities in place: the rig count fills the site power
    /// capacity (rounded down to whole units), and each infrastructure kind
    /// is sized to carry the resulting load (rounded up to whole units).
    pub fn scale(&mut self) -> Result<(), ProjectError> {
        let pue = self.pue();
        let fleet = self
            .rigs
            .as_mut()
            .ok_or_else(|| ProjectError::NoRig(self.name.clone()))?;

        let facility_draw_per_rig = fleet.unit_power_draw() * pue;
        if facility_draw_per_rig > 0.0 {
            fleet.quantity = (self.capacity / facility_draw_per_rig).floor();
        }

        let compute_load = fleet.total_power_draw();
        let cooling_pue: f64 = self
            .infrastructure
            .iter()
            .filter(|u| matches!(u.infrastructure, Infrastructure::Cooling(_)))
            .map(|u| u.infrastructure.pue())
            .product();

        for unit in &mut self.infrastructure {
            let demand = match &unit.infrastructure {
                Infrastructure::Cooling(_) => compute_load,
                // Heat rejected includes the cooling system's own overhead,
                // and the unit is sized at its design dry-bulb capacity.
                Infrastructure::HeatRejection(_) => compute_load * cooling_pue,
                Infrastructure::Electrical(_) => compute_load * pue,
            };
            let unit_capacity = match &unit.infrastructure {
                Infrastructure::HeatRejection(h) => h.capacity_at(h.design_dry_bulb),
                other => other.capacity(),
            };
            if unit_capacity > 0.0 {
                unit.quantity = (demand / unit_capacity).ceil();
            }
        }

        self.version += 1;
        Ok(())
    }

    /// Per-product cost lines plus rigs, in catalog order.
    pub fn cost_breakdown(&self) -> Vec<CostLine> {
        let mut lines = Vec::new();
        if let Some(fleet) = &self.rigs {
            lines.push(CostLine {
                product: "rigs".to_string(),
                name: fleet.rig.name(),
                price: fleet.rig.price,
                quantity: fleet.quantity,
                total_cost: fleet.total_cost(),
            });
        }
        for unit in &self.infrastructure {
            lines.push(CostLine {
                product: "infrastructure".to_string(),
                name: unit.infrastructure.name().to_string(),
                price: unit.unit_price(),
                quantity: unit.quantity,
                total_cost: unit.total_cost(),
            });
        }
        lines
    }

    /// Total capital cost of rigs and infrastructure.
    pub fn capital_cost(&self) -> f64 {
        self.cost_breakdown().iter().map(|line| line.total_cost).sum()
    }
}
