use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Database: running migration v1 (documents)");
        conn.execute_batch(
            "
            -- seq keeps insertion order for collection scans
            CREATE TABLE documents (
                seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                collection  TEXT NOT NULL,
                id          TEXT NOT NULL,
                data        TEXT NOT NULL,
                UNIQUE(collection, id)
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Database: running migration v2 (username index)");
        conn.execute_batch(
            "
            CREATE INDEX idx_documents_username
                ON documents(collection, json_extract(data, '$.username'));

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    if version < 3 {
        info!("Database: running migration v3 (unique usernames)");
        conn.execute_batch(
            "
            DROP INDEX IF EXISTS idx_documents_username;

            -- documents without a username extract to NULL and never collide
            CREATE UNIQUE INDEX idx_documents_username
                ON documents(collection, json_extract(data, '$.username'));

            INSERT INTO schema_version (version) VALUES (3);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
