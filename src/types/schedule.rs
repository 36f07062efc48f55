use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::constants::BLOCKS_PER_EPOCH;

/// One 10-minute slot of the block schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Block index since genesis at the 10-minute cadence.
    pub index: u64,
    /// Wall-clock timestamp of the period.
    pub timestamp: NaiveDateTime,
    /// Halving epoch the period belongs to.
    pub epoch: u32,
}

/// The base time axis: an ordered, contiguous sequence of 10-minute periods
/// running from a start date through the end of a halving epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSchedule {
    pub start_date: NaiveDate,
    pub last_epoch: u32,
    periods: Vec<Period>,
}

impl BlockSchedule {
    /// Builds a schedule from periods. Callers are expected to hand over a
    /// strictly increasing, gap-free sequence; this is checked in debug builds.
    pub(crate) fn new(start_date: NaiveDate, last_epoch: u32, periods: Vec<Period>) -> Self {
        debug_assert!(periods.windows(2).all(|w| w[1].index == w[0].index + 1));
        Self {
            start_date,
            last_epoch,
            periods,
        }
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Epoch a block index falls in.
    pub fn epoch_of(index: u64) -> u32 {
        (index / BLOCKS_PER_EPOCH) as u32
    }
}
