use chrono::{Duration, NaiveDate};

use crate::types::constants::{genesis_date, BLOCKS_PER_EPOCH, BLOCK_INTERVAL_SECS, INITIAL_SUBSIDY};
use crate::types::{BlockSchedule, Period};
use crate::utils::logging;

use super::ScheduleError;

/// Generates the block schedule from `start_date` through the final block of
/// `last_epoch`.
///
/// The period index extrapolates the 10-minute block cadence from the genesis
/// date, so a given calendar date always maps to the same index and epoch.
pub fn generate_block_schedule(
    start_date: NaiveDate,
    last_epoch: u32,
) -> Result<BlockSchedule, ScheduleError> {
    let genesis = genesis_date()
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ScheduleError::InvalidStartDate("genesis".into()))?;
    let start = start_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ScheduleError::InvalidStartDate(start_date.to_string()))?;

    if start < genesis {
        return Err(ScheduleError::InvalidStartDate(format!(
            "{} precedes the genesis block",
            start_date
        )));
    }

    let first_index = ((start - genesis).num_seconds() / BLOCK_INTERVAL_SECS) as u64;
    let start_epoch = BlockSchedule::epoch_of(first_index);
    if last_epoch < start_epoch {
        return Err(ScheduleError::InvalidEpoch {
            start_date,
            start_epoch,
            last_epoch,
        });
    }

    let last_index = BLOCKS_PER_EPOCH * (last_epoch as u64 + 1) - 1;
    let mut periods = Vec::with_capacity((last_index - first_index + 1) as usize);
    for index in first_index..=last_index {
        periods.push(Period {
            index,
            timestamp: genesis + Duration::seconds(index as i64 * BLOCK_INTERVAL_SECS),
            epoch: BlockSchedule::epoch_of(index),
        });
    }

    logging::log(
        "SCHEDULE",
        &format!(
            "Generated {} periods from {} (epoch {}) through epoch {}",
            periods.len(),
            start_date,
            start_epoch,
            last_epoch
        ),
    );

    Ok(BlockSchedule::new(start_date, last_epoch, periods))
}

/// Block subsidy for a halving epoch, in BTC. Zero once the subsidy has
/// halved away entirely.
pub fn block_subsidy(epoch: u32) -> f64 {
    if epoch >= 64 {
        return 0.0;
    }
    INITIAL_SUBSIDY / (1u64 << epoch) as f64
}
