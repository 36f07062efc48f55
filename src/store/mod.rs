//! Content-addressed get-or-create stores. Creation parameters are reduced
//! to a canonical fingerprint; identical inputs always resolve to the same
//! stored object, and concurrent duplicate attempts resolve to whichever
//! insert landed first.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::forecast::{forecast, Environment, EnvironmentForecast, ForecastError, ForecastParams};
use crate::project::Project;
use crate::schedule::{generate_block_schedule, ScheduleError};
use crate::statements::{base_statement_set, derived_statement_set, StatementError, StatementSet};
use crate::types::{BlockSchedule, Frequency};
use crate::utils::logging;


/// Canonical hash of normalized creation parameters.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

/// Accumulates normalized inputs into a fingerprint. Floats are hashed by
/// bit pattern with negative zero folded onto zero.
pub struct FingerprintBuilder {
    hasher: DefaultHasher,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        Self {
            hasher: DefaultHasher::new(),
        }
    }

    pub fn write_str(mut self, value: &str) -> Self {
        value.hash(&mut self.hasher);
        self
    }

    pub fn write_u64(mut self, value: u64) -> Self {
        value.hash(&mut self.hasher);
        self
    }

    pub fn write_f64(mut self, value: f64) -> Self {
        let normalized = if value == 0.0 { 0.0 } else { value };
        normalized.to_bits().hash(&mut self.hasher);
        self
    }

    pub fn finish(self) -> Fingerprint {
        Fingerprint(self.hasher.finish())
    }
}

impl Default for FingerprintBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn forecast_fingerprint(builder: FingerprintBuilder, params: &ForecastParams) -> FingerprintBuilder {
    builder
        .write_str(&params.model.to_string())
        .write_f64(params.initial)
        .write_f64(params.mean)
        .write_f64(params.volatility)
        .write_u64(params.seed)
}

/// Deduplicates block schedules by (start_date, last_epoch).
#[derive(Default)]
pub struct ScheduleStore {
    inner: Mutex<HashMap<Fingerprint, Arc<BlockSchedule>>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(start_date: NaiveDate, last_epoch: u32) -> Fingerprint {
        FingerprintBuilder::new()
            .write_str(&start_date.to_string())
            .write_u64(last_epoch as u64)
            .finish()
    }

    /// Returns the schedule for the pair, generating it on first request.
    /// The boolean reports whether this call created it.
    pub fn get_or_create(
        &self,
        start_date: NaiveDate,
        last_epoch: u32,
    ) -> Result<(Arc<BlockSchedule>, bool), ScheduleError> {
        let key = Self::fingerprint(start_date, last_epoch);
        if let Some(existing) = self.inner.lock().expect("schedule store poisoned").get(&key) {
            return Ok((existing.clone(), false));
        }

        // Generate outside the lock; a concurrent creator may win the insert.
        let schedule = Arc::new(generate_block_schedule(start_date, last_epoch)?);
        let mut inner = self.inner.lock().expect("schedule store poisoned");
        match inner.get(&key) {
            Some(existing) => Ok((existing.clone(), false)),
            None => {
                inner.insert(key, schedule.clone());
                Ok((schedule, true))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("schedule store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creation parameters of an environment: a name plus one forecast per
/// series.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentParams {
    pub name: String,
    pub price: ForecastParams,
    pub fees: ForecastParams,
    pub hash_rate: ForecastParams,
}

/// Deduplicates environments by (schedule, forecast parameters).
#[derive(Default)]
pub struct EnvironmentStore {
    inner: Mutex<HashMap<Fingerprint, Arc<Environment>>>,
}

impl EnvironmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(schedule: &BlockSchedule, params: &EnvironmentParams) -> Fingerprint {
        let mut builder = FingerprintBuilder::new()
            .write_str(&params.name)
            .write_str(&schedule.start_date.to_string())
            .write_u64(schedule.last_epoch as u64);
        for series in [&params.price, &params.fees, &params.hash_rate] {
            builder = forecast_fingerprint(builder, series);
        }
        builder.finish()
    }

    pub fn get_or_create(
        &self,
        schedule: Arc<BlockSchedule>,
        params: &EnvironmentParams,
    ) -> Result<(Arc<Environment>, bool), ForecastError> {
        let key = Self::fingerprint(&schedule, params);
        if let Some(existing) = self.inner.lock().expect("environment store poisoned").get(&key) {
            return Ok((existing.clone(), false));
        }

        let price = forecast("Bitcoin Price", &params.price, &schedule)?;
        let fees = forecast("Transaction Fees", &params.fees, &schedule)?;
        let hash_rate = forecast("Network Hash Rate", &params.hash_rate, &schedule)?;
        let environment = Arc::new(Environment::new(
            params.name.clone(),
            schedule.clone(),
            EnvironmentForecast::new(&schedule, price, fees, hash_rate)?,
        ));

        let mut inner = self.inner.lock().expect("environment store poisoned");
        match inner.get(&key) {
            Some(existing) => Ok((existing.clone(), false)),
            None => {
                inner.insert(key, environment.clone());
                logging::log("STORE", &format!("Created environment '{}'", params.name));
                Ok((environment, true))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("environment store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Key of one statement set: environment fingerprint, project identity and
/// version, and frequency. The version ties a set to the exact project
/// configuration it was computed from, so a mutated project never serves a
/// stale set.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct StatementKey {
    pub environment: Fingerprint,
    pub project: String,
    pub project_version: u64,
    pub frequency: Frequency,
}

impl StatementKey {
    pub fn new(environment: Fingerprint, project: &Project, frequency: Frequency) -> Self {
        Self {
            environment,
            project: project.name.clone(),
            project_version: project.version(),
            frequency,
        }
    }
}

/// Statement sets per (environment, project, frequency) key. The base
/// 10-minute set must exist before any derived frequency can be requested.
/// Sets are inserted whole (statements plus summary), so a failed or
/// abandoned computation leaves no partial state behind.
#[derive(Default)]
pub struct StatementStore {
    inner: Mutex<HashMap<StatementKey, Arc<StatementSet>>>,
}

impl StatementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &StatementKey) -> Option<Arc<StatementSet>> {
        self.inner
            .lock()
            .expect("statement store poisoned")
            .get(key)
            .cloned()
    }

    /// Looks up or computes the base (10-minute) set for the key.
    pub fn get_or_create_base(
        &self,
        environment_id: Fingerprint,
        environment: &Environment,
        project: &Project,
    ) -> Result<(Arc<StatementSet>, bool), StatementError> {
        let key = StatementKey::new(environment_id, project, Frequency::TenMinute);
        if let Some(existing) = self.get(&key) {
            return Ok((existing, false));
        }

        let instance = project.implement(&environment.schedule)?;
        let set = Arc::new(base_statement_set(environment, &instance)?);
        Ok(self.insert_if_absent(key, set))
    }

    /// Looks up or derives a coarser-frequency set. Fails with
    /// [`StatementError::PrerequisiteMissing`] when the base set has not
    /// been created for this key yet.
    pub fn get_or_create_derived(
        &self,
        environment_id: Fingerprint,
        project: &Project,
        frequency: Frequency,
    ) -> Result<(Arc<StatementSet>, bool), StatementError> {
        if frequency == Frequency::TenMinute {
            let key = StatementKey::new(environment_id, project, frequency);
            return self.get(&key).map(|set| (set, false)).ok_or(StatementError::PrerequisiteMissing);
        }

        let key = StatementKey::new(environment_id, project, frequency);
        if let Some(existing) = self.get(&key) {
            return Ok((existing, false));
        }

        let base_key = StatementKey::new(environment_id, project, Frequency::TenMinute);
        let base = self.get(&base_key).ok_or(StatementError::PrerequisiteMissing)?;
        let set = Arc::new(derived_statement_set(&base, frequency)?);
        Ok(self.insert_if_absent(key, set))
    }

    fn insert_if_absent(
        &self,
        key: StatementKey,
        set: Arc<StatementSet>,
    ) -> (Arc<StatementSet>, bool) {
        let mut inner = self.inner.lock().expect("statement store poisoned");
        match inner.get(&key) {
            Some(existing) => (existing.clone(), false),
            None => {
                inner.insert(key, set.clone());
                (set, true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("statement store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static SCHEDULES: Lazy<ScheduleStore> = Lazy::new(ScheduleStore::new);
static ENVIRONMENTS: Lazy<EnvironmentStore> = Lazy::new(EnvironmentStore::new);
static STATEMENTS: Lazy<StatementStore> = Lazy::new(StatementStore::new);

/// Process-wide schedule store.
pub fn schedules() -> &'static ScheduleStore {
    &SCHEDULES
}

/// Process-wide environment store.
pub fn environments() -> &'static EnvironmentStore {
    &ENVIRONMENTS
}

/// Process-wide statement store.
pub fn statements() -> &'static StatementStore {
    &STATEMENTS
}
