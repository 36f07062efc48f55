use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

/// Statement frequency. `TenMinute` is the native resolution of the block
/// schedule; all other frequencies are derived from it by resampling over
/// calendar buckets.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "10T")]
    TenMinute,
    #[serde(rename = "H")]
    Hourly,
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "M")]
    Monthly,
    #[serde(rename = "Q")]
    Quarterly,
    #[serde(rename = "A")]
    Annual,
}

impl Frequency {
    /// Frequencies precomputed for a project on top of the base resolution.
    pub const DERIVED: [Frequency; 5] = [
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annual,
    ];

    /// The wire code used in persisted keys and file names.
    pub fn code(&self) -> &'static str {
        match self {
            Frequency::TenMinute => "10T",
            Frequency::Hourly => "H",
            Frequency::Daily => "D",
            Frequency::Monthly => "M",
            Frequency::Quarterly => "Q",
            Frequency::Annual => "A",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Frequency::TenMinute => 0,
            Frequency::Hourly => 1,
            Frequency::Daily => 2,
            Frequency::Monthly => 3,
            Frequency::Quarterly => 4,
            Frequency::Annual => 5,
        }
    }

    /// Whether `self` is a finer granularity than `other`.
    pub fn is_finer_than(&self, other: Frequency) -> bool {
        self.rank() < other.rank()
    }

    /// Format a column label for a bucket ending at `ts`.
    /// Hourly and finer keep the time component; daily and coarser are date-only.
    pub fn format_label(&self, ts: NaiveDateTime) -> String {
        match self {
            Frequency::TenMinute => ts.format("%Y-%m-%d %H:%M").to_string(),
            Frequency::Hourly => ts.format("%Y-%m-%d %H:00").to_string(),
            _ => ts.format("%Y-%m-%d").to_string(),
        }
    }

    /// Parse a column label produced by [`format_label`](Self::format_label).
    pub fn parse_label(&self, label: &str) -> Option<NaiveDateTime> {
        match self {
            Frequency::TenMinute | Frequency::Hourly => {
                NaiveDateTime::parse_from_str(label, "%Y-%m-%d %H:%M").ok()
            }
            _ => chrono::NaiveDate::parse_from_str(label, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10T" => Ok(Frequency::TenMinute),
            "H" => Ok(Frequency::Hourly),
            "D" => Ok(Frequency::Daily),
            "M" => Ok(Frequency::Monthly),
            "Q" => Ok(Frequency::Quarterly),
            "A" => Ok(Frequency::Annual),
            other => Err(format!("unknown frequency code: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_codes_round_trip() {
        for code in ["10T", "H", "D", "M", "Q", "A"] {
            let frequency: Frequency = code.parse().unwrap();
            assert_eq!(frequency.code(), code);
            let json = serde_json::to_string(&frequency).unwrap();
            assert_eq!(json, format!("\"{}\"", code));
        }
        assert!("W".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_granularity_ordering() {
        assert!(Frequency::TenMinute.is_finer_than(Frequency::Hourly));
        assert!(Frequency::Daily.is_finer_than(Frequency::Monthly));
        assert!(!Frequency::Annual.is_finer_than(Frequency::Monthly));
        assert!(!Frequency::Monthly.is_finer_than(Frequency::Monthly));
    }

    #[test]
    fn test_labels_round_trip_through_parse() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(15, 40, 0)
            .unwrap();

        let label = Frequency::TenMinute.format_label(ts);
        assert_eq!(label, "2024-03-31 15:40");
        assert_eq!(Frequency::TenMinute.parse_label(&label), Some(ts));

        let label = Frequency::Monthly.format_label(ts);
        assert_eq!(label, "2024-03-31");
        let midnight = ts.date().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(Frequency::Monthly.parse_label(&label), Some(midnight));
    }
}
