//! Database schema migrations for stillwater.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{debug, warn};

/// Ordered list of `(version, sql)`. Append only.
const MIGRATIONS: &[(i32, &str)] = &[
    (
        1,
        "CREATE TABLE IF NOT EXISTS sessions (
            id           TEXT PRIMARY KEY,
            preset_id    TEXT NOT NULL,
            preset_name  TEXT NOT NULL,
            preset_type  TEXT NOT NULL,
            duration     INTEGER NOT NULL,
            completed_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS custom_presets (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            description TEXT NOT NULL,
            type        TEXT NOT NULL,
            duration    INTEGER NOT NULL,
            intervals   TEXT,
            cycles      INTEGER,
            created_at  TEXT NOT NULL
        );",
    ),
    (
        2,
        "CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
         CREATE INDEX IF NOT EXISTS idx_custom_presets_created_at ON custom_presets(created_at);",
    ),
];

/// Latest schema version known to this build.
pub fn latest_version() -> i32 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;
    let current_version = schema_version(conn);

    for &(version, sql) in MIGRATIONS {
        if current_version < version {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(sql)?;
            set_schema_version(&tx, version)?;
            tx.commit()?;
            debug!(version, "applied migration");
        }
    }
    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}
