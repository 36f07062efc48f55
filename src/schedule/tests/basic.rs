use chrono::NaiveDate;

use crate::schedule::{block_subsidy, generate_block_schedule, ScheduleError};
use crate::types::constants::BLOCKS_PER_EPOCH;
use crate::types::BlockSchedule;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_schedule_is_contiguous_and_ends_at_epoch_boundary() {
    let schedule = generate_block_schedule(date(2024, 1, 1), 4).unwrap();
    let periods = schedule.periods();

    assert!(!periods.is_empty());
    for w in periods.windows(2) {
        assert_eq!(w[1].index, w[0].index + 1, "schedule must have no gaps");
        assert_eq!(
            (w[1].timestamp - w[0].timestamp).num_seconds(),
            600,
            "periods must be 10 minutes apart"
        );
    }

    let last = periods.last().unwrap();
    assert_eq!(last.index, BLOCKS_PER_EPOCH * 5 - 1);
    assert_eq!(last.epoch, 4);
}

#[test]
fn test_period_index_extrapolates_from_genesis() {
    // One day past genesis is 144 blocks in.
    let schedule = generate_block_schedule(date(2009, 1, 4), 0).unwrap();
    assert_eq!(schedule.periods()[0].index, 144);
    assert_eq!(schedule.periods()[0].epoch, 0);
}

#[test]
fn test_identical_inputs_yield_identical_schedules() {
    let a = generate_block_schedule(date(2024, 1, 1), 4).unwrap();
    let b = generate_block_schedule(date(2024, 1, 1), 4).unwrap();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.periods()[0], b.periods()[0]);
    assert_eq!(a.periods().last(), b.periods().last());
}

#[test]
fn test_epoch_before_start_is_rejected() {
    // 2024 is several epochs past genesis; epoch 0 ended long before.
    match generate_block_schedule(date(2024, 1, 1), 0) {
        Err(ScheduleError::InvalidEpoch { last_epoch, .. }) => assert_eq!(last_epoch, 0),
        other => panic!("expected InvalidEpoch, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn test_pre_genesis_start_is_rejected() {
    assert!(matches!(
        generate_block_schedule(date(2008, 1, 1), 0),
        Err(ScheduleError::InvalidStartDate(_))
    ));
}

#[test]
fn test_epoch_of_block_index() {
    assert_eq!(BlockSchedule::epoch_of(0), 0);
    assert_eq!(BlockSchedule::epoch_of(BLOCKS_PER_EPOCH - 1), 0);
    assert_eq!(BlockSchedule::epoch_of(BLOCKS_PER_EPOCH), 1);
}

#[test]
fn test_subsidy_halves_per_epoch() {
    assert_eq!(block_subsidy(0), 50.0);
    assert_eq!(block_subsidy(1), 25.0);
    assert_eq!(block_subsidy(3), 6.25);
    assert_eq!(block_subsidy(64), 0.0);
}
