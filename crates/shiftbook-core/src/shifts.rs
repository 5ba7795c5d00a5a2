//! Shift listing with pay and totals, plus owner-gated shift CRUD.

use serde_json::{Map, Value};
use shiftbook_db::DocumentStore;
use shiftbook_types::models::{
    NewShift, Shift, ShiftFilter, ShiftListing, ShiftPatch, ShiftPay, ShiftWithComputed,
};

use crate::error::CoreResult;
use crate::normalize::fields;
use crate::pay::compute_pay;
use crate::rate::{RateCache, resolve_hourly_rate};
use crate::repository::OwnedRepository;
use crate::totals::compute_totals;

pub struct ShiftService<'a, S: ?Sized> {
    store: &'a S,
    repo: OwnedRepository<'a, S, Shift>,
}

impl<'a, S: DocumentStore + ?Sized> ShiftService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            repo: OwnedRepository::new(store),
        }
    }

    /// The owner's shifts with hours and pay attached, optionally narrowed
    /// to one employer and optionally with day/month totals.
    ///
    /// Each distinct employer's rate is read from the store at most once
    /// per call.
    pub fn get_all_shifts(&self, owner: &str, filter: &ShiftFilter) -> CoreResult<ShiftListing> {
        let mut rates = RateCache::new();
        let mut items = Vec::new();

        let shifts = self.repo.list(owner)?.into_iter().filter(|shift| {
            filter
                .employer_id
                .as_deref()
                .is_none_or(|employer_id| shift.employer_id == employer_id)
        });

        for shift in shifts {
            let rate = resolve_hourly_rate(self.store, &shift.employer_id, &mut rates)?;
            let ShiftPay { hours, pay } = compute_pay(&shift, rate);
            items.push(ShiftWithComputed { shift, hours, pay });
        }

        let totals = filter.include_totals.then(|| compute_totals(&items));

        Ok(ShiftListing { items, totals })
    }

    pub fn get_shift_by_id(&self, owner: &str, id: &str) -> CoreResult<Shift> {
        self.repo.get(owner, id)
    }

    pub fn create_shift(&self, owner: &str, input: NewShift) -> CoreResult<Shift> {
        let mut data = Map::new();
        data.insert(fields::EMPLOYER_ID.into(), Value::String(input.employer_id));
        data.insert(
            fields::START_TIME.into(),
            self.store.encode_instant(input.start_time),
        );
        data.insert(
            fields::END_TIME.into(),
            self.store.encode_instant(input.end_time),
        );
        if let Some(tips) = input.tips {
            data.insert(fields::TIPS.into(), Value::from(tips));
        }

        self.repo.insert(owner, data)
    }

    pub fn update_shift(&self, owner: &str, id: &str, patch: ShiftPatch) -> CoreResult<Shift> {
        let mut data = Map::new();
        if let Some(employer_id) = patch.employer_id {
            data.insert(fields::EMPLOYER_ID.into(), Value::String(employer_id));
        }
        if let Some(start_time) = patch.start_time {
            data.insert(fields::START_TIME.into(), self.store.encode_instant(start_time));
        }
        if let Some(end_time) = patch.end_time {
            data.insert(fields::END_TIME.into(), self.store.encode_instant(end_time));
        }
        if let Some(tips) = patch.tips {
            data.insert(fields::TIPS.into(), Value::from(tips));
        }

        self.repo.update(owner, id, data)
    }

    pub fn delete_shift(&self, owner: &str, id: &str) -> CoreResult<()> {
        self.repo.delete(owner, id)
    }
}
