//! Shared fixtures for statement tests: a constant-model environment over
//! epoch 0 and a small fleet with no infrastructure constraints.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::forecast::{forecast, Environment, EnvironmentForecast, ForecastParams};
use crate::products::Rig;
use crate::project::{Project, ProjectInstance, TempProfile};
use crate::schedule::generate_block_schedule;
use crate::types::BlockSchedule;

/// Network hash rate on the wire, in M TH/s: 200 EH/s.
pub const NETWORK_HASH_RATE_WIRE: f64 = 200.0;
pub const BITCOIN_PRICE: f64 = 30_000.0;
pub const FEES_PER_BLOCK: f64 = 0.1;

pub fn schedule() -> Arc<BlockSchedule> {
    let start = NaiveDate::from_ymd_opt(2009, 1, 3).unwrap();
    Arc::new(generate_block_schedule(start, 0).unwrap())
}

pub fn environment() -> Environment {
    let schedule = schedule();
    let price = forecast(
        "Bitcoin Price",
        &ForecastParams::constant(BITCOIN_PRICE),
        &schedule,
    )
    .unwrap();
    let fees = forecast(
        "Transaction Fees",
        &ForecastParams::constant(FEES_PER_BLOCK),
        &schedule,
    )
    .unwrap();
    let hash_rate = forecast(
        "Network Hash Rate",
        &ForecastParams::constant(NETWORK_HASH_RATE_WIRE),
        &schedule,
    )
    .unwrap();
    let forecast = EnvironmentForecast::new(&schedule, price, fees, hash_rate).unwrap();
    Environment::new("Steady State", schedule, forecast)
}

pub fn rig() -> Rig {
    Rig {
        make: "Bitmain".to_string(),
        model: "S19".to_string(),
        generation: Some("XP".to_string()),
        manufacturer: "Bitmain".to_string(),
        hash_rate: 140.0,
        power: 3010.0,
        buffer: 0.05,
        price: 4000.0,
    }
}

pub fn project() -> Project {
    let mut project = Project::new(
        "West Texas",
        1_000_000.0,
        TempProfile::Single(75.0),
        1.0,
        0.05,
    );
    project.pool_fees = 0.02;
    project.tax_rate = 0.21;
    project.opex = 20_000.0;
    project.property_taxes = 5_000.0;
    project.add_rig(rig(), 300.0);
    project
}

pub fn instance(environment: &Environment) -> ProjectInstance {
    project().implement(&environment.schedule).unwrap()
}
