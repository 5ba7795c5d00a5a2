use crate::{Database, Document, DocumentStore, InstantAdapter};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, Row};
use serde_json::Value;
use uuid::Uuid;

impl InstantAdapter for Database {}

impl DocumentStore for Database {
    fn create_document(&self, collection: &str, data: Value, id: Option<&str>) -> Result<String> {
        let id = id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let body = serde_json::to_string(&data)?;

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)",
                (collection, &id, &body),
            )
            .with_context(|| format!("insert {}/{}", collection, id))?;
            Ok(())
        })?;

        Ok(id)
    }

    fn get_documents(&self, collection: &str) -> Result<Vec<Document>> {
        self.with_conn(|conn| query_documents(conn, collection))
    }

    fn get_document_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.with_conn(|conn| query_document(conn, collection, id))
    }

    fn update_document(&self, collection: &str, id: &str, partial: Value) -> Result<()> {
        let Value::Object(fields) = partial else {
            return Err(anyhow!("Partial update for {}/{} must be an object", collection, id));
        };

        // Read and write under the writer lock so a concurrent reader pool
        // never sees a half-merged row.
        self.with_conn_mut(|conn| {
            let mut doc = query_document(conn, collection, id)?
                .ok_or_else(|| anyhow!("Document {}/{} not found", collection, id))?;

            match doc.data.as_object_mut() {
                Some(stored) => stored.extend(fields),
                None => doc.data = Value::Object(fields),
            }

            conn.execute(
                "UPDATE documents SET data = ?1 WHERE collection = ?2 AND id = ?3",
                (serde_json::to_string(&doc.data)?, collection, id),
            )
            .with_context(|| format!("update {}/{}", collection, id))?;
            Ok(())
        })
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                (collection, id),
            )
            .with_context(|| format!("delete {}/{}", collection, id))?;
            Ok(())
        })
    }
}

impl Database {
    /// First document in `collection` whose `username` field equals `username`.
    pub fn find_by_username(&self, collection: &str, username: &str) -> Result<Option<Document>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, data FROM documents
                 WHERE collection = ?1 AND json_extract(data, '$.username') = ?2
                 ORDER BY seq
                 LIMIT 1",
            )?;

            let doc = stmt
                .query_row((collection, username), read_row)
                .optional()?
                .map(decode)
                .transpose()?;

            Ok(doc)
        })
    }
}

/// True when `err` comes from a UNIQUE constraint, e.g. a second user
/// registering a taken username.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<rusqlite::Error>(),
            Some(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    })
}

fn query_documents(conn: &Connection, collection: &str) -> Result<Vec<Document>> {
    let mut stmt =
        conn.prepare("SELECT id, data FROM documents WHERE collection = ?1 ORDER BY seq")?;

    let rows = stmt
        .query_map([collection], read_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(decode).collect()
}

fn query_document(conn: &Connection, collection: &str, id: &str) -> Result<Option<Document>> {
    let mut stmt =
        conn.prepare("SELECT id, data FROM documents WHERE collection = ?1 AND id = ?2")?;

    stmt.query_row((collection, id), read_row)
        .optional()?
        .map(decode)
        .transpose()
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn decode((id, body): (String, String)) -> Result<Document> {
    let data = serde_json::from_str(&body)
        .with_context(|| format!("corrupt document body for id {}", id))?;
    Ok(Document { id, data })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
