//! Configuration loader and validator for the hashplan simulator.
//! Handles parsing, validation, and access to scenario configuration files.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use hashplan::forecast::{ForecastModel, ForecastParams};
use hashplan::products::{Infrastructure, Rig};
use hashplan::project::{Project, TempProfile};
use hashplan::types::Frequency;

// ------------------------------------------------------------------------------------------------
// Main Configuration Structs
// ------------------------------------------------------------------------------------------------

/// Main configuration struct for a simulation scenario.
///
/// A scenario pins down everything a statement run needs: the block schedule
/// parameters, the three environment forecasts, the project configuration and
/// the output settings.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Block schedule parameters (start date and final halving epoch)
    pub schedule: ScheduleConfig,
    /// Environment forecasts for price, fees and network hash rate
    pub environment: EnvironmentConfig,
    /// Project configuration including the rig fleet and infrastructure
    pub project: ProjectConfig,
    /// Output settings (results directory and derived frequencies)
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration of the block schedule underlying all forecasts.
#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// First day of the projection, ISO formatted (YYYY-MM-DD)
    pub start_date: String,
    /// Last halving epoch covered by the projection
    pub last_epoch: u32,
}

/// Configuration of the three environment forecast series.
#[derive(Debug, Deserialize, Clone)]
pub struct EnvironmentConfig {
    /// Name of the environment; part of its identity in the store
    pub name: String,
    /// Bitcoin price forecast, USD
    pub price: SeriesConfig,
    /// Transaction fee forecast, BTC per block
    pub fees: SeriesConfig,
    /// Network hash rate forecast, M TH/s
    pub hash_rate: SeriesConfig,
}

/// Configuration of one forecast series.
#[derive(Debug, Deserialize, Clone)]
pub struct SeriesConfig {
    /// Forecast model: "Constant", "CGR" or "GBM"
    pub model: String,
    /// Initial value of the series
    pub initial: f64,
    /// Drift or growth rate per period (ignored by Constant)
    #[serde(default)]
    pub mean: f64,
    /// Volatility per period (GBM only)
    #[serde(default)]
    pub volatility: f64,
    /// RNG seed for stochastic models
    #[serde(default)]
    pub seed: u64,
}

/// Configuration of the project: one rig fleet plus infrastructure.
#[derive(Debug, Deserialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Site power capacity in watts
    pub capacity: f64,
    /// Single design temperature or an 8760-hour profile
    pub target_ambient_temp: TempProfile,
    #[serde(default = "default_overclocking")]
    pub target_overclocking: f64,
    /// Energy price in USD per kWh
    pub energy_price: f64,
    #[serde(default)]
    pub pool_fees: f64,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub opex: f64,
    #[serde(default)]
    pub property_taxes: f64,
    pub rig: RigConfig,
    #[serde(default)]
    pub infrastructure: Vec<InfraConfig>,
    /// Rebalance rig and infrastructure quantities to the site capacity
    /// before running
    #[serde(default)]
    pub scale_to_capacity: bool,
}

/// A rig SKU and how many of it to deploy.
#[derive(Debug, Deserialize, Clone)]
pub struct RigConfig {
    #[serde(flatten)]
    pub rig: Rig,
    pub quantity: f64,
}

/// An infrastructure product and how many of it to deploy.
#[derive(Debug, Deserialize, Clone)]
pub struct InfraConfig {
    #[serde(flatten)]
    pub infrastructure: Infrastructure,
    pub quantity: f64,
}

/// Output settings.
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    /// Derived frequencies to precompute, by wire code
    #[serde(default = "default_frequencies")]
    pub frequencies: Vec<String>,
}

fn default_overclocking() -> f64 {
    1.0
}

fn default_results_dir() -> String {
    "simulator/results".to_string()
}

fn default_frequencies() -> Vec<String> {
    vec!["H", "D", "M", "Q", "A"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            frequencies: default_frequencies(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Error Types and Validation
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// Common validation logic
pub fn validate_common_fields(
    schedule: &ScheduleConfig,
    environment: &EnvironmentConfig,
    project: &ProjectConfig,
    output: &OutputConfig,
) -> Result<(), ConfigError> {
    if NaiveDate::from_str(&schedule.start_date).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "Start date '{}' is not an ISO date",
            schedule.start_date
        )));
    }
    for series in [&environment.price, &environment.fees, &environment.hash_rate] {
        if ForecastModel::from_str(&series.model).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Unknown forecast model '{}'",
                series.model
            )));
        }
        if series.initial < 0.0 {
            return Err(ConfigError::ValidationError(
                "Forecast initial values must be non-negative".into(),
            ));
        }
    }
    if project.capacity <= 0.0 {
        return Err(ConfigError::ValidationError("Site capacity must be positive".into()));
    }
    if project.energy_price < 0.0 {
        return Err(ConfigError::ValidationError("Energy price must be non-negative".into()));
    }
    if !(0.0..=1.0).contains(&project.pool_fees) {
        return Err(ConfigError::ValidationError("Pool fees must be between 0 and 1".into()));
    }
    if !(0.0..=1.0).contains(&project.tax_rate) {
        return Err(ConfigError::ValidationError("Tax rate must be between 0 and 1".into()));
    }
    if project.target_overclocking <= 0.0 {
        return Err(ConfigError::ValidationError("Overclock factor must be positive".into()));
    }
    if project.rig.rig.hash_rate <= 0.0 {
        return Err(ConfigError::ValidationError("Rig hash rate must be positive".into()));
    }
    if project.rig.quantity < 0.0 {
        return Err(ConfigError::ValidationError("Rig quantity must be non-negative".into()));
    }
    for frequency in &output.frequencies {
        match Frequency::from_str(frequency) {
            Ok(Frequency::TenMinute) => {
                return Err(ConfigError::ValidationError(
                    "The 10T base frequency is always computed; list only derived frequencies".into(),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(ConfigError::ValidationError(e)),
        }
    }
    Ok(())
}

// ------------------------------------------------------------------------------------------------
// Configuration Implementation Methods
// ------------------------------------------------------------------------------------------------

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_common_fields(&self.schedule, &self.environment, &self.project, &self.output)
    }

    pub fn start_date(&self) -> Result<NaiveDate, ConfigError> {
        NaiveDate::from_str(&self.schedule.start_date)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Derived frequencies to precompute, parsed from their wire codes.
    pub fn frequencies(&self) -> Result<Vec<Frequency>, ConfigError> {
        self.output
            .frequencies
            .iter()
            .map(|code| Frequency::from_str(code).map_err(ConfigError::ValidationError))
            .collect()
    }
}

impl SeriesConfig {
    pub fn to_params(&self) -> Result<ForecastParams, ConfigError> {
        let model = ForecastModel::from_str(&self.model)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        Ok(ForecastParams {
            model,
            initial: self.initial,
            mean: self.mean,
            volatility: self.volatility,
            seed: self.seed,
        })
    }
}

impl ProjectConfig {
    /// Builds the domain project from the configuration.
    pub fn to_project(&self) -> Project {
        let mut project = Project::new(
            self.name.clone(),
            self.capacity,
            self.target_ambient_temp.clone(),
            self.target_overclocking,
            self.energy_price,
        );
        project.description = self.description.clone();
        project.pool_fees = self.pool_fees;
        project.tax_rate = self.tax_rate;
        project.opex = self.opex;
        project.property_taxes = self.property_taxes;
        project.add_rig(self.rig.rig.clone(), self.rig.quantity);
        for infra in &self.infrastructure {
            project.add_infra(infra.infrastructure.clone(), infra.quantity);
        }
        project
    }
}
