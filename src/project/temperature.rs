use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::BlockSchedule;

use super::ProjectError;

/// Hours in a non-leap year; the hourly profile length.
pub const HOURS_PER_YEAR: usize = 8760;

/// Target ambient temperature for a project: either a single design value or
/// a full hour-of-year profile (8760 values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TempProfile {
    Single(f64),
    HourOfYear(Vec<f64>),
}

impl TempProfile {
    /// Resolves the profile against a block schedule, forward-filling each
    /// 10-minute period from its containing hour. The hour-of-year index
    /// wraps across multi-year schedules; in leap years Feb 29 reuses
    /// Feb 28's profile so later days keep their usual hours.
    pub fn resolve(&self, schedule: &BlockSchedule) -> Result<Vec<f64>, ProjectError> {
        match self {
            TempProfile::Single(value) => Ok(vec![*value; schedule.len()]),
            TempProfile::HourOfYear(profile) => {
                if profile.len() != HOURS_PER_YEAR {
                    return Err(ProjectError::InvalidTempProfile(profile.len()));
                }
                Ok(schedule
                    .periods()
                    .iter()
                    .map(|p| profile[hour_of_year(p.timestamp)])
                    .collect())
            }
        }
    }
}

/// Index into an 8760-hour profile for a timestamp.
fn hour_of_year(ts: NaiveDateTime) -> usize {
    let mut day = ts.ordinal0() as usize;
    if is_leap_year(ts.year()) && ts.ordinal0() >= 59 {
        // Feb 29 is ordinal 59 (0-based) in a leap year; collapse it onto
        // Feb 28 and shift the rest of the year back into the 365-day frame.
        day -= 1;
    }
    day.min(364) * 24 + ts.hour() as usize
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
