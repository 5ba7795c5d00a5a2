use serde_json::{Map, Value};
use shiftbook_db::DocumentStore;
use shiftbook_types::models::{Adjustment, AdjustmentFilter, AdjustmentPatch, NewAdjustment};

use crate::error::CoreResult;
use crate::normalize::fields;
use crate::repository::OwnedRepository;

pub struct AdjustmentService<'a, S: ?Sized> {
    store: &'a S,
    repo: OwnedRepository<'a, S, Adjustment>,
}

impl<'a, S: DocumentStore + ?Sized> AdjustmentService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            repo: OwnedRepository::new(store),
        }
    }

    /// The owner's adjustments; each filter that is set must match.
    pub fn list_adjustments(&self, owner: &str, filter: &AdjustmentFilter) -> CoreResult<Vec<Adjustment>> {
        let matches = |wanted: &Option<String>, actual: &Option<String>| {
            wanted.is_none() || wanted == actual
        };

        Ok(self
            .repo
            .list(owner)?
            .into_iter()
            .filter(|a| matches(&filter.employer_id, &a.employer_id))
            .filter(|a| matches(&filter.shift_id, &a.shift_id))
            .collect())
    }

    pub fn get_adjustment_by_id(&self, owner: &str, id: &str) -> CoreResult<Adjustment> {
        self.repo.get(owner, id)
    }

    pub fn create_adjustment(&self, owner: &str, input: NewAdjustment) -> CoreResult<Adjustment> {
        let mut data = Map::new();
        data.insert(fields::DATE.into(), self.store.encode_instant(input.date));
        data.insert(fields::AMOUNT.into(), Value::from(input.amount));
        insert_opt(&mut data, fields::EMPLOYER_ID, input.employer_id);
        insert_opt(&mut data, fields::SHIFT_ID, input.shift_id);
        insert_opt(&mut data, fields::NOTE, input.note);
        self.repo.insert(owner, data)
    }

    pub fn update_adjustment(&self, owner: &str, id: &str, patch: AdjustmentPatch) -> CoreResult<Adjustment> {
        let mut data = Map::new();
        if let Some(date) = patch.date {
            data.insert(fields::DATE.into(), self.store.encode_instant(date));
        }
        if let Some(amount) = patch.amount {
            data.insert(fields::AMOUNT.into(), Value::from(amount));
        }
        insert_opt(&mut data, fields::EMPLOYER_ID, patch.employer_id);
        insert_opt(&mut data, fields::SHIFT_ID, patch.shift_id);
        insert_opt(&mut data, fields::NOTE, patch.note);
        self.repo.update(owner, id, data)
    }

    pub fn delete_adjustment(&self, owner: &str, id: &str) -> CoreResult<()> {
        self.repo.delete(owner, id)
    }
}

fn insert_opt(data: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        data.insert(key.into(), Value::String(value));
    }
}
