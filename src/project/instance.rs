use crate::products::Infrastructure;
use crate::types::BlockSchedule;
use crate::utils::logging;

use super::{Project, ProjectError};

/// A project resolved against a block schedule: the ambient temperature
/// profile has been expanded to one value per period, and the cooling chain
/// reduced to a per-period utilization factor.
///
/// Utilization is the fraction of the fleet that can run in a period given
/// the infrastructure capacity actually available at that period's ambient
/// temperature; it derates both hash rate and power draw.
#[derive(Debug, Clone)]
pub struct ProjectInstance {
    pub name: String,
    /// Number of rigs deployed.
    pub quantity: f64,
    /// Fleet hash rate at full utilization, H/s.
    pub hash_rate: f64,
    /// Fleet power draw at full utilization, watts at the wall.
    pub power_draw: f64,
    /// Compound power usage effectiveness of the facility.
    pub pue: f64,
    pub energy_price: f64,
    pub pool_fees: f64,
    pub tax_rate: f64,
    pub opex: f64,
    pub property_taxes: f64,
    pub capital_cost: f64,
    /// Per-period fraction of the fleet that can run, in [0, 1].
    pub utilization: Vec<f64>,
}

impl Project {
    /// Resolves the project against a schedule, producing the flat inputs
    /// the statement engine works from.
    pub fn implement(&self, schedule: &BlockSchedule) -> Result<ProjectInstance, ProjectError> {
        let fleet = self.fleet()?;
        let temps = self.target_ambient_temp.resolve(schedule)?;

        let compute_load = fleet.total_power_draw();
        let pue = self.pue();
        let cooling_pue: f64 = self
            .infrastructure()
            .iter()
            .filter(|u| matches!(u.infrastructure, Infrastructure::Cooling(_)))
            .map(|u| u.infrastructure.pue())
            .product();

        // Capacity constraints that do not move with the weather.
        let mut static_ratio = f64::INFINITY;
        for unit in self.infrastructure() {
            let (capacity, demand) = match &unit.infrastructure {
                Infrastructure::Cooling(c) => (unit.quantity * c.capacity, compute_load),
                Infrastructure::Electrical(e) => (unit.quantity * e.capacity, compute_load * pue),
                Infrastructure::HeatRejection(_) => continue,
            };
            if demand > 0.0 {
                static_ratio = static_ratio.min(capacity / demand);
            }
        }

        let rejection_units: Vec<_> = self
            .infrastructure()
            .iter()
            .filter_map(|unit| match &unit.infrastructure {
                Infrastructure::HeatRejection(h) => Some((h.clone(), unit.quantity)),
                _ => None,
            })
            .collect();
        let rejection_demand = compute_load * cooling_pue;

        let utilization = temps
            .iter()
            .map(|temp| {
                let mut ratio = static_ratio;
                if rejection_demand > 0.0 {
                    for (unit, quantity) in &rejection_units {
                        ratio = ratio.min(quantity * unit.capacity_at(*temp) / rejection_demand);
                    }
                }
                ratio.clamp(0.0, 1.0)
            })
            .collect();

        logging::log(
            "PROJECT",
            &format!(
                "Implemented '{}': {} rigs, {:.0} W compute load, PUE {:.3}",
                self.name, fleet.quantity, compute_load, pue
            ),
        );

        Ok(ProjectInstance {
            name: self.name.clone(),
            quantity: fleet.quantity,
            hash_rate: fleet.total_hash_rate(),
            power_draw: compute_load,
            pue,
            energy_price: self.energy_price,
            pool_fees: self.pool_fees,
            tax_rate: self.tax_rate,
            opex: self.opex,
            property_taxes: self.property_taxes,
            capital_cost: self.capital_cost(),
            utilization,
        })
    }
}
