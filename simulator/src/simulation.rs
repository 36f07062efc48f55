//! Runs one scenario end to end: resolve the schedule and environment
//! through the process-wide stores, build the project, compute the base
//! statement set and fan the derived frequencies out across workers.

use std::sync::Arc;

use thiserror::Error;

use hashplan::forecast::ForecastError;
use hashplan::project::{Project, ProjectError};
use hashplan::schedule::ScheduleError;
use hashplan::statements::{StatementError, StatementSet};
use hashplan::store::{self, EnvironmentParams, EnvironmentStore, Fingerprint};
use hashplan::types::Frequency;
use hashplan::utils::logging;

use crate::config::{Config, ConfigError};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Statement(#[from] StatementError),
    #[error("Worker for frequency {0} was cancelled")]
    WorkerCancelled(Frequency),
}

/// Everything one scenario run produces: the base set plus one derived set
/// per configured frequency.
#[derive(Debug)]
pub struct SimulationOutput {
    pub environment_id: Fingerprint,
    pub base: Arc<StatementSet>,
    pub derived: Vec<Arc<StatementSet>>,
}

/// Runs the scenario. Statement generation per derived frequency is
/// dispatched as an independent blocking task; each task goes through the
/// statement store's get-or-create path, so reruns of the same scenario are
/// cache hits.
pub async fn run_simulation(config: &Config) -> Result<SimulationOutput, SimulationError> {
    let start_date = config.start_date()?;

    let (schedule, created) = store::schedules().get_or_create(start_date, config.schedule.last_epoch)?;
    logging::log(
        "SIMULATOR",
        &format!(
            "Schedule {} -> epoch {}: {} periods ({})",
            start_date,
            config.schedule.last_epoch,
            schedule.len(),
            if created { "created" } else { "cached" }
        ),
    );

    let params = EnvironmentParams {
        name: config.environment.name.clone(),
        price: config.environment.price.to_params()?,
        fees: config.environment.fees.to_params()?,
        hash_rate: config.environment.hash_rate.to_params()?,
    };
    let environment_id = EnvironmentStore::fingerprint(&schedule, &params);
    let (environment, created) = store::environments().get_or_create(schedule.clone(), &params)?;
    logging::log(
        "SIMULATOR",
        &format!(
            "Environment '{}' [{}] ({})",
            environment.name,
            environment_id.to_hex(),
            if created { "created" } else { "cached" }
        ),
    );

    let mut project = config.project.to_project();
    if config.project.scale_to_capacity {
        project.scale()?;
        let fleet = project.fleet()?;
        logging::log(
            "SIMULATOR",
            &format!(
                "Scaled '{}' to {} rigs within {:.0} W site capacity",
                project.name, fleet.quantity, project.capacity
            ),
        );
    }

    let (base, created) =
        store::statements().get_or_create_base(environment_id, &environment, &project)?;
    logging::log(
        "SIMULATOR",
        &format!(
            "Base statement set for '{}' ({})",
            project.name,
            if created { "created" } else { "cached" }
        ),
    );

    // One worker per derived frequency, mirroring how the surrounding system
    // queues statement generation; the store guarantees at most one set per
    // key even if workers race.
    let mut handles = Vec::new();
    for frequency in config.frequencies()? {
        let project = project.clone();
        handles.push((
            frequency,
            tokio::task::spawn_blocking(move || {
                derive_one(environment_id, &project, frequency)
            }),
        ));
    }

    let mut derived = Vec::new();
    for (frequency, handle) in handles {
        let set = handle
            .await
            .map_err(|_| SimulationError::WorkerCancelled(frequency))??;
        derived.push(set);
    }

    Ok(SimulationOutput {
        environment_id,
        base,
        derived,
    })
}

fn derive_one(
    environment_id: Fingerprint,
    project: &Project,
    frequency: Frequency,
) -> Result<Arc<StatementSet>, SimulationError> {
    let (set, created) = store::statements().get_or_create_derived(environment_id, project, frequency)?;
    logging::log(
        "SIMULATOR",
        &format!(
            "Statement set at {} for '{}' ({})",
            frequency,
            project.name,
            if created { "created" } else { "cached" }
        ),
    );
    Ok(set)
}
