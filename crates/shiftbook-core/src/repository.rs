//! Owner-scoped CRUD shared by employers, shifts and adjustments.

use std::marker::PhantomData;

use chrono::Utc;
use serde_json::{Map, Value};
use shiftbook_db::{Document, DocumentStore, InstantAdapter};

use crate::error::{CoreError, CoreResult};
use crate::normalize::fields;

/// An entity stored one-per-document in its own collection and owned by
/// exactly one user.
pub trait OwnedEntity: Sized {
    const COLLECTION: &'static str;
    /// Name used in error messages, e.g. `"Shift"`.
    const LABEL: &'static str;

    fn from_document<A: InstantAdapter + ?Sized>(adapter: &A, doc: &Document) -> Self;

    fn owner_user_id(&self) -> &str;
}

/// CRUD over `E::COLLECTION` where every read, update and delete is gated
/// on the caller owning the record.
pub struct OwnedRepository<'a, S: ?Sized, E> {
    store: &'a S,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, S, E> OwnedRepository<'a, S, E>
where
    S: DocumentStore + ?Sized,
    E: OwnedEntity,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// All of the owner's records, in store order.
    pub fn list(&self, owner: &str) -> CoreResult<Vec<E>> {
        Ok(self
            .store
            .get_documents(E::COLLECTION)?
            .iter()
            .map(|doc| E::from_document(self.store, doc))
            .filter(|entity| entity.owner_user_id() == owner)
            .collect())
    }

    pub fn get(&self, owner: &str, id: &str) -> CoreResult<E> {
        let (_, entity) = self.fetch_owned(owner, id)?;
        Ok(entity)
    }

    /// Store `fields` as a new record of `owner`, stamping ownership and
    /// both timestamps.
    pub fn insert(&self, owner: &str, mut fields: Map<String, Value>) -> CoreResult<E> {
        let now = self.store.encode_instant(Utc::now());
        fields.insert(fields::OWNER_USER_ID.into(), Value::String(owner.to_string()));
        fields.insert(fields::CREATED_AT.into(), now.clone());
        fields.insert(fields::UPDATED_AT.into(), now);

        let data = Value::Object(fields);
        let id = self.store.create_document(E::COLLECTION, data.clone(), None)?;

        Ok(E::from_document(self.store, &Document { id, data }))
    }

    /// Merge `patch` into the owner's record and refresh `updatedAt`.
    ///
    /// Returns the merged entity as written, without reading it back.
    pub fn update(&self, owner: &str, id: &str, mut patch: Map<String, Value>) -> CoreResult<E> {
        let (mut doc, _) = self.fetch_owned(owner, id)?;

        patch.insert(
            fields::UPDATED_AT.into(),
            self.store.encode_instant(Utc::now()),
        );
        self.store
            .update_document(E::COLLECTION, id, Value::Object(patch.clone()))?;

        match doc.data.as_object_mut() {
            Some(stored) => stored.extend(patch),
            None => doc.data = Value::Object(patch),
        }
        Ok(E::from_document(self.store, &doc))
    }

    pub fn delete(&self, owner: &str, id: &str) -> CoreResult<()> {
        self.fetch_owned(owner, id)?;
        self.store.delete_document(E::COLLECTION, id)?;
        Ok(())
    }

    /// The raw document and its entity, or `NotFound` when it is missing or
    /// owned by someone else.
    fn fetch_owned(&self, owner: &str, id: &str) -> CoreResult<(Document, E)> {
        let doc = self
            .store
            .get_document_by_id(E::COLLECTION, id)?
            .ok_or_else(|| CoreError::not_found(E::LABEL, id))?;

        let entity = E::from_document(self.store, &doc);
        if entity.owner_user_id() != owner {
            return Err(CoreError::not_found(E::LABEL, id));
        }

        Ok((doc, entity))
    }
}
