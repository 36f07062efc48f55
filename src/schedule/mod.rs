use chrono::NaiveDate;
use thiserror::Error;

pub mod oracle;
pub use oracle::{block_subsidy, generate_block_schedule};

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid start date: {0}")]
    InvalidStartDate(String),
    #[error("Last epoch {last_epoch} ends before the schedule start {start_date} (epoch {start_epoch})")]
    InvalidEpoch {
        start_date: NaiveDate,
        start_epoch: u32,
        last_epoch: u32,
    },
}
