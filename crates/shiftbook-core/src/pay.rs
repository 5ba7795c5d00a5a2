use chrono::{DateTime, Utc};
use shiftbook_types::models::{Shift, ShiftPay};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Round to two decimals, halves toward positive infinity
/// (`-0.125` → `-0.12`, `0.125` → `0.13`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Signed length of `start..end` in hours, unrounded.
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Hours and pay of one shift at `hourly_rate`.
///
/// Pay is derived from the already-rounded hours. An end before the start
/// gives negative figures; a missing instant gives `NaN` for both.
pub fn compute_pay(shift: &Shift, hourly_rate: f64) -> ShiftPay {
    let (Some(start), Some(end)) = (shift.start_time, shift.end_time) else {
        return ShiftPay {
            hours: f64::NAN,
            pay: f64::NAN,
        };
    };

    let hours = round2(duration_hours(start, end));
    let pay = round2(hours * hourly_rate + shift.tips.unwrap_or(0.0));

    ShiftPay { hours, pay }
}
