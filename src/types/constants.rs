use chrono::NaiveDate;

/// Blocks per halving epoch.
pub const BLOCKS_PER_EPOCH: u64 = 210_000;

/// Target block interval in seconds.
pub const BLOCK_INTERVAL_SECS: i64 = 600;

/// Block subsidy of the first epoch, in BTC.
pub const INITIAL_SUBSIDY: f64 = 50.0;

/// Expected hashes per unit of difficulty.
pub const HASHES_PER_DIFFICULTY: f64 = 4_294_967_296.0; // 2^32

/// Conversion factor from the hash-rate forecast's wire unit (M TH/s) to H/s.
pub const HASH_RATE_WIRE_TO_HS: f64 = 1e6 * 1e12;

/// Hashes per terahash.
pub const TERAHASH: f64 = 1e12;

/// Number of 10-minute periods in an hour.
pub const PERIODS_PER_HOUR: u32 = 6;

/// Date of the genesis block, the origin of the period index.
pub fn genesis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2009, 1, 3).expect("static date")
}
