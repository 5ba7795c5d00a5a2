//! Employer hourly-rate lookup.

use std::collections::HashMap;

use serde_json::Value;
use shiftbook_db::{Document, DocumentStore};
use shiftbook_types::models::Employer;

use crate::error::CoreResult;
use crate::normalize::fields;
use crate::repository::OwnedEntity;

/// Rates already resolved during one listing call, keyed by employer id.
/// Created per call and dropped with it.
pub type RateCache = HashMap<String, f64>;

const RATE_FIELDS: [&str; 2] = [fields::HOURLY_RATE, fields::LEGACY_RATE];

/// The hourly rate of `employer_id`, or `0.0` when the employer is gone or
/// carries no usable rate. Store failures still propagate.
///
/// Ownership of the employer is not checked: a shift's `employerId` is a
/// reference, not a grant.
pub fn resolve_hourly_rate<S: DocumentStore + ?Sized>(
    store: &S,
    employer_id: &str,
    cache: &mut RateCache,
) -> CoreResult<f64> {
    if let Some(rate) = cache.get(employer_id) {
        return Ok(*rate);
    }

    let rate = store
        .get_document_by_id(Employer::COLLECTION, employer_id)?
        .as_ref()
        .map_or(0.0, rate_from_document);

    cache.insert(employer_id.to_string(), rate);
    Ok(rate)
}

/// First strictly positive finite rate among `hourlyRate` and the legacy
/// `rate` field; `0.0` if neither qualifies.
pub fn rate_from_document(doc: &Document) -> f64 {
    RATE_FIELDS
        .iter()
        .filter_map(|key| doc.field(key))
        .find_map(usable_rate)
        .unwrap_or(0.0)
}

fn usable_rate(value: &Value) -> Option<f64> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use serde_json::json;

    fn rate_of(data: Value) -> f64 {
        rate_from_document(&Document {
            id: "e".into(),
            data,
        })
    }

    #[test]
    fn prefers_hourly_rate() {
        assert_eq!(rate_of(json!({ "hourlyRate": 20, "rate": 15 })), 20.0);
    }

    #[test]
    fn falls_back_to_legacy_field() {
        assert_eq!(rate_of(json!({ "rate": 15.5 })), 15.5);
        assert_eq!(rate_of(json!({ "hourlyRate": null, "rate": 15.5 })), 15.5);
        assert_eq!(rate_of(json!({ "hourlyRate": 0, "rate": 12 })), 12.0);
    }

    #[test]
    fn numeric_strings_count() {
        assert_eq!(rate_of(json!({ "hourlyRate": " 18.50 " })), 18.5);
    }

    #[test]
    fn unusable_values_are_zero() {
        assert_eq!(rate_of(json!({})), 0.0);
        assert_eq!(rate_of(json!({ "hourlyRate": -4 })), 0.0);
        assert_eq!(rate_of(json!({ "hourlyRate": "abc", "rate": true })), 0.0);
        assert_eq!(rate_of(json!({ "hourlyRate": "NaN" })), 0.0);
    }

    #[test]
    fn missing_employer_resolves_to_zero() {
        let store = MemoryStore::new();
        let mut cache = RateCache::new();
        assert_eq!(resolve_hourly_rate(&store, "ghost", &mut cache).unwrap(), 0.0);
        assert_eq!(cache.get("ghost"), Some(&0.0));
    }

    #[test]
    fn cache_hits_skip_the_store() {
        let store = MemoryStore::new();
        store.seed("employers", "e1", json!({ "hourlyRate": 20 }));
        let mut cache = RateCache::new();

        for _ in 0..3 {
            assert_eq!(resolve_hourly_rate(&store, "e1", &mut cache).unwrap(), 20.0);
        }
        assert_eq!(store.count("get:employers/e1"), 1);
    }

    #[test]
    fn store_failures_propagate() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let mut cache = RateCache::new();
        assert!(resolve_hourly_rate(&store, "e1", &mut cache).is_err());
        assert!(cache.is_empty());
    }
}
