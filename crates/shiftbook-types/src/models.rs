use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Employers --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employer {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub hourly_rate: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewEmployer {
    pub name: String,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EmployerPatch {
    pub name: Option<String>,
    pub hourly_rate: Option<f64>,
}

// -- Shifts --

/// A shift as read back from the store.
///
/// Instants are optional because stored records are not re-validated on
/// read; a record with a missing or unreadable timestamp still lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub owner_user_id: String,
    pub employer_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewShift {
    pub employer_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tips: Option<f64>,
}

/// Partial shift update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ShiftPatch {
    pub employer_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub tips: Option<f64>,
}

/// Derived pay figures for one shift. `NaN` when the shift lacks an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftPay {
    pub hours: f64,
    pub pay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWithComputed {
    #[serde(flatten)]
    pub shift: Shift,
    pub hours: f64,
    pub pay: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub hours: f64,
    pub pay: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub by_day: BTreeMap<String, Bucket>,
    pub by_month: BTreeMap<String, Bucket>,
}

#[derive(Debug, Clone, Default)]
pub struct ShiftFilter {
    pub employer_id: Option<String>,
    pub include_totals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftListing {
    pub items: Vec<ShiftWithComputed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
}

// -- Adjustments --

/// A bonus (positive amount) or deduction (negative amount).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: String,
    pub owner_user_id: String,
    pub date: Option<DateTime<Utc>>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewAdjustment {
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub employer_id: Option<String>,
    pub shift_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdjustmentPatch {
    pub date: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    pub employer_id: Option<String>,
    pub shift_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdjustmentFilter {
    pub employer_id: Option<String>,
    pub shift_id: Option<String>,
}

// -- Users --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}
