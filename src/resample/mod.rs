//! Re-aggregates a statement to a coarser frequency over calendar buckets.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::statements::{Aggregation, Statement, StatementError};
use crate::types::Frequency;

#[cfg(test)]
mod tests;

/// Resamples a statement to a coarser frequency. Buckets follow the
/// calendar (months are calendar months, not rolling windows); each row
/// aggregates by its own policy; output columns are labeled with bucket-end
/// timestamps. Requesting a finer frequency than the source fails.
pub fn resample(statement: &Statement, target: Frequency) -> Result<Statement, StatementError> {
    if target == statement.frequency {
        return Ok(statement.clone());
    }
    if target.is_finer_than(statement.frequency) {
        return Err(StatementError::UnsupportedFrequency {
            requested: target,
            minimum: statement.frequency,
        });
    }

    let timestamps = statement
        .columns
        .iter()
        .map(|label| {
            statement
                .frequency
                .parse_label(label)
                .ok_or_else(|| StatementError::InvalidLabel(label.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Columns are chronological, so buckets are runs of consecutive periods
    // sharing a bucket end.
    let mut ends: Vec<NaiveDateTime> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for (i, ts) in timestamps.iter().enumerate() {
        let end = bucket_end(*ts, target);
        match ends.last() {
            Some(last) if *last == end => {
                if let Some(span) = spans.last_mut() {
                    span.1 = i + 1;
                }
            }
            _ => {
                ends.push(end);
                spans.push((i, i + 1));
            }
        }
    }

    let columns = ends.iter().map(|end| target.format_label(*end)).collect();
    let mut resampled = Statement::new(statement.kind, target, columns);
    for row in &statement.rows {
        let values = spans
            .iter()
            .map(|&(start, end)| {
                let bucket = &row.values[start..end];
                match row.aggregation {
                    Aggregation::Sum => bucket.iter().sum(),
                    Aggregation::Mean => bucket.iter().sum::<f64>() / bucket.len() as f64,
                    Aggregation::Last => *bucket.last().unwrap_or(&0.0),
                }
            })
            .collect();
        resampled.push_row(&row.name, row.aggregation, values);
    }

    Ok(resampled)
}

/// The closing timestamp of the bucket containing `ts` at `freq`.
/// Hours and days close on themselves; months, quarters and years close on
/// their final day.
pub fn bucket_end(ts: NaiveDateTime, freq: Frequency) -> NaiveDateTime {
    let midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0).expect("midnight is valid");
    match freq {
        Frequency::TenMinute => ts,
        Frequency::Hourly => ts
            .date()
            .and_hms_opt(ts.hour(), 0, 0)
            .expect("whole hour is valid"),
        Frequency::Daily => midnight(ts.date()),
        Frequency::Monthly => midnight(month_end(ts.year(), ts.month())),
        Frequency::Quarterly => {
            let quarter_close = 3 * ((ts.month() - 1) / 3 + 1);
            midnight(month_end(ts.year(), quarter_close))
        }
        Frequency::Annual => midnight(month_end(ts.year(), 12)),
    }
}

/// Last day of a calendar month.
pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is valid")
        .pred_opt()
        .expect("month end is valid")
}

/// Days in a calendar month.
pub fn days_in_month(year: i32, month: u32) -> f64 {
    month_end(year, month).day() as f64
}
