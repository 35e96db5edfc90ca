//! Schema versioning for the session database.
//!
//! The version lives in `metadata`. Step `n` of [`STEPS`] brings a database
//! at version `n - 1` to `n`; each step commits together with its version
//! bump.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema;

/// Ordered schema steps.
const STEPS: &[&str] = &[schema::CREATE_PREFERENCES_TABLE];

/// The schema version this build writes.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Bring `conn` up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if a step fails, or if the file was written by a newer
/// build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(schema::CREATE_METADATA_TABLE)?;

    let found = stored_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "session database is version {found}, this build understands up to {CURRENT_VERSION}"
            ),
        });
    }

    for (index, sql) in STEPS.iter().enumerate().skip(usize::try_from(found).unwrap_or(0)) {
        let version = i32::try_from(index + 1).map_err(|_| Error::DatabaseMigration {
            message: "too many schema steps".to_string(),
        })?;
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (VERSION_KEY, version.to_string()),
        )?;
        tx.commit()?;
        debug!("Session schema now at version {}", version);
    }

    Ok(())
}

/// Version recorded in `metadata`; 0 when none is.
fn stored_version(conn: &Connection) -> Result<i32> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn has_table(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_steps_match_current_version() {
        assert_eq!(STEPS.len(), usize::try_from(CURRENT_VERSION).unwrap());
    }

    #[test]
    fn test_fresh_database_reaches_current_version() {
        let conn = fresh();
        // No metadata table yet.
        assert!(stored_version(&conn).is_err());

        initialize_schema(&conn).unwrap();

        assert!(has_table(&conn, "metadata"));
        assert!(has_table(&conn, "preferences"));
        assert_eq!(stored_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_reinitialize_keeps_rows() {
        let conn = fresh();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES ('token', 'abc')",
            [],
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        let token: String = conn
            .query_row("SELECT value FROM preferences WHERE key = 'token'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn test_newer_database_is_rejected() {
        let conn = fresh();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = ?1 WHERE key = ?2",
            ((CURRENT_VERSION + 1).to_string(), VERSION_KEY),
        )
        .unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("understands up to"));
    }

    #[test]
    fn test_garbage_version_is_rejected() {
        let conn = fresh();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = 'abc' WHERE key = ?1",
            [VERSION_KEY],
        )
        .unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }
}
