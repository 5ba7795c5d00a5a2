use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use shiftbook_types::models::{Bucket, ShiftWithComputed, Totals};

use crate::pay::round2;

/// `YYYY-MM-DD` of the instant in UTC.
pub fn day_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM` of the instant in UTC.
pub fn month_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m").to_string()
}

/// Sum hours and pay per key of each shift's start time, then round each
/// bucket. Shifts without a start time belong to no bucket.
pub fn aggregate<F>(shifts: &[ShiftWithComputed], key_fn: F) -> BTreeMap<String, Bucket>
where
    F: Fn(DateTime<Utc>) -> String,
{
    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

    for item in shifts {
        let Some(start) = item.shift.start_time else {
            continue;
        };
        let bucket = buckets.entry(key_fn(start)).or_default();
        bucket.hours += item.hours;
        bucket.pay += item.pay;
    }

    for bucket in buckets.values_mut() {
        bucket.hours = round2(bucket.hours);
        bucket.pay = round2(bucket.pay);
    }

    buckets
}

pub fn compute_totals(shifts: &[ShiftWithComputed]) -> Totals {
    Totals {
        by_day: aggregate(shifts, day_key),
        by_month: aggregate(shifts, month_key),
    }
}
