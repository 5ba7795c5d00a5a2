use serde_json::{Map, Value};
use shiftbook_db::DocumentStore;
use shiftbook_types::models::{Employer, EmployerPatch, NewEmployer};

use crate::error::CoreResult;
use crate::normalize::fields;
use crate::repository::OwnedRepository;

/// Employer CRUD. Deleting an employer leaves shifts and adjustments that
/// reference it in place.
pub struct EmployerService<'a, S: ?Sized> {
    repo: OwnedRepository<'a, S, Employer>,
}

impl<'a, S: DocumentStore + ?Sized> EmployerService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            repo: OwnedRepository::new(store),
        }
    }

    pub fn list_employers(&self, owner: &str) -> CoreResult<Vec<Employer>> {
        self.repo.list(owner)
    }

    pub fn get_employer_by_id(&self, owner: &str, id: &str) -> CoreResult<Employer> {
        self.repo.get(owner, id)
    }

    pub fn create_employer(&self, owner: &str, input: NewEmployer) -> CoreResult<Employer> {
        let mut data = Map::new();
        data.insert(fields::NAME.into(), Value::String(input.name));
        data.insert(fields::HOURLY_RATE.into(), Value::from(input.hourly_rate));
        self.repo.insert(owner, data)
    }

    pub fn update_employer(&self, owner: &str, id: &str, patch: EmployerPatch) -> CoreResult<Employer> {
        let mut data = Map::new();
        if let Some(name) = patch.name {
            data.insert(fields::NAME.into(), Value::String(name));
        }
        if let Some(rate) = patch.hourly_rate {
            data.insert(fields::HOURLY_RATE.into(), Value::from(rate));
        }
        self.repo.update(owner, id, data)
    }

    pub fn delete_employer(&self, owner: &str, id: &str) -> CoreResult<()> {
        self.repo.delete(owner, id)
    }
}
