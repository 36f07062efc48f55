use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::project::ProjectError;
use crate::summary::ProfitabilitySummary;
use crate::types::Frequency;

pub mod engine;
pub mod rows;

pub use engine::{base_statement_set, derived_statement_set, environment_statement, income_statement, roi_statement};

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("Frequency {requested} is finer than the minimum {minimum} supported here")]
    UnsupportedFrequency {
        requested: Frequency,
        minimum: Frequency,
    },
    #[error("You must save the block level statements first")]
    PrerequisiteMissing,
    #[error("Statement has no row named '{0}'")]
    MissingRow(String),
    #[error("Cannot parse column label '{0}'")]
    InvalidLabel(String),
    #[error("Project instance covers {len} periods but the schedule has {expected}")]
    Misaligned { len: usize, expected: usize },
    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// How a row aggregates when resampled to a coarser frequency.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Flow quantities (revenue, costs, BTC earned): add up within the bucket.
    Sum,
    /// Rate quantities (hash rate, hash share): plain arithmetic mean. A
    /// known approximation; buckets are not weighted by active seconds.
    Mean,
    /// Point-in-time quantities (rig count, cumulative positions): take the
    /// bucket's closing value.
    Last,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Environment,
    Income,
    Roi,
}

/// A named line item and its values, one per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub name: String,
    pub aggregation: Aggregation,
    pub values: Vec<f64>,
}

/// A time-indexed financial statement: an ordered set of line items against
/// period columns at a single frequency. Column labels are the formatted
/// bucket-end timestamps of the frequency, and every row carries a value for
/// every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub frequency: Frequency,
    pub columns: Vec<String>,
    pub rows: Vec<StatementRow>,
}

impl Statement {
    pub fn new(kind: StatementKind, frequency: Frequency, columns: Vec<String>) -> Self {
        Self {
            kind,
            frequency,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, name: &str, aggregation: Aggregation, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(StatementRow {
            name: name.to_string(),
            aggregation,
            values,
        });
    }

    pub fn row(&self, name: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn values(&self, name: &str) -> Result<&[f64], StatementError> {
        self.row(name)
            .map(|row| row.values.as_slice())
            .ok_or_else(|| StatementError::MissingRow(name.to_string()))
    }

    /// Serializes the statement as a row-major JSON table.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restores a statement from its JSON table form. `from_json` and
    /// [`to_json`](Self::to_json) round-trip exactly.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// The three statements of one (environment, project, frequency) key, plus
/// the scalar profitability summary. Stored and returned as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSet {
    pub environment: String,
    pub project: String,
    pub frequency: Frequency,
    pub env: Statement,
    pub income: Statement,
    pub roi: Statement,
    pub summary: ProfitabilitySummary,
}
