//! Stored documents → domain entities.
//!
//! Records are validated when written, so nothing here rejects input:
//! a missing id becomes an empty string, a missing instant or number
//! becomes `None` (or `NaN` where the entity field is not optional).

use chrono::{DateTime, Utc};
use serde_json::Value;
use shiftbook_db::{Document, InstantAdapter};
use shiftbook_types::models::{Adjustment, Employer, Shift};

use crate::rate::rate_from_document;
use crate::repository::OwnedEntity;

/// Field names as persisted.
pub mod fields {
    pub const OWNER_USER_ID: &str = "ownerUserId";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";

    pub const NAME: &str = "name";
    pub const HOURLY_RATE: &str = "hourlyRate";
    /// Older employer records carry the rate under this name.
    pub const LEGACY_RATE: &str = "rate";

    pub const EMPLOYER_ID: &str = "employerId";
    pub const START_TIME: &str = "startTime";
    pub const END_TIME: &str = "endTime";
    pub const TIPS: &str = "tips";

    pub const DATE: &str = "date";
    pub const AMOUNT: &str = "amount";
    pub const SHIFT_ID: &str = "shiftId";
    pub const NOTE: &str = "note";
}

impl OwnedEntity for Shift {
    const COLLECTION: &'static str = "shifts";
    const LABEL: &'static str = "Shift";

    fn from_document<A: InstantAdapter + ?Sized>(adapter: &A, doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            owner_user_id: string_field(doc, fields::OWNER_USER_ID),
            employer_id: string_field(doc, fields::EMPLOYER_ID),
            start_time: instant_field(adapter, doc, fields::START_TIME),
            end_time: instant_field(adapter, doc, fields::END_TIME),
            tips: number_field(doc, fields::TIPS),
            created_at: instant_field(adapter, doc, fields::CREATED_AT),
            updated_at: instant_field(adapter, doc, fields::UPDATED_AT),
        }
    }

    fn owner_user_id(&self) -> &str {
        &self.owner_user_id
    }
}

impl OwnedEntity for Employer {
    const COLLECTION: &'static str = "employers";
    const LABEL: &'static str = "Employer";

    fn from_document<A: InstantAdapter + ?Sized>(adapter: &A, doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            owner_user_id: string_field(doc, fields::OWNER_USER_ID),
            name: string_field(doc, fields::NAME),
            hourly_rate: rate_from_document(doc),
            created_at: instant_field(adapter, doc, fields::CREATED_AT),
            updated_at: instant_field(adapter, doc, fields::UPDATED_AT),
        }
    }

    fn owner_user_id(&self) -> &str {
        &self.owner_user_id
    }
}

impl OwnedEntity for Adjustment {
    const COLLECTION: &'static str = "adjustments";
    const LABEL: &'static str = "Adjustment";

    fn from_document<A: InstantAdapter + ?Sized>(adapter: &A, doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            owner_user_id: string_field(doc, fields::OWNER_USER_ID),
            date: instant_field(adapter, doc, fields::DATE),
            amount: number_field(doc, fields::AMOUNT).unwrap_or(f64::NAN),
            employer_id: optional_string_field(doc, fields::EMPLOYER_ID),
            shift_id: optional_string_field(doc, fields::SHIFT_ID),
            note: optional_string_field(doc, fields::NOTE),
            created_at: instant_field(adapter, doc, fields::CREATED_AT),
            updated_at: instant_field(adapter, doc, fields::UPDATED_AT),
        }
    }

    fn owner_user_id(&self) -> &str {
        &self.owner_user_id
    }
}

fn string_field(doc: &Document, key: &str) -> String {
    optional_string_field(doc, key).unwrap_or_default()
}

fn optional_string_field(doc: &Document, key: &str) -> Option<String> {
    doc.field(key).and_then(Value::as_str).map(str::to_string)
}

fn number_field(doc: &Document, key: &str) -> Option<f64> {
    doc.field(key).and_then(Value::as_f64)
}

fn instant_field<A: InstantAdapter + ?Sized>(
    adapter: &A,
    doc: &Document,
    key: &str,
) -> Option<DateTime<Utc>> {
    doc.field(key).and_then(|v| adapter.coerce_instant(v))
}
