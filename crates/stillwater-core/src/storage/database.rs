//! SQLite-based session history and custom preset storage.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use super::{data_dir, migrations, SessionStore};
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::presets::{self, CustomPreset, NewCustomPreset, Preset, PresetType};
use crate::stats::{self, SessionStats};

/// A finished session about to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub preset_id: String,
    pub preset_name: String,
    pub preset_type: PresetType,
    /// Length of the session in seconds.
    pub duration_secs: u32,
    pub completed_at: DateTime<Utc>,
}

impl NewSession {
    pub fn for_preset(preset: &Preset, completed_at: DateTime<Utc>) -> Self {
        Self {
            preset_id: preset.id.clone(),
            preset_name: preset.name.clone(),
            preset_type: preset.preset_type,
            duration_secs: preset.duration_secs,
            completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub preset_id: String,
    pub preset_name: String,
    pub preset_type: PresetType,
    pub duration_secs: u32,
    pub completed_at: DateTime<Utc>,
}

/// SQLite database for session history and custom presets.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/stillwater.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("stillwater.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Statistics as seen on `today` (UTC).
    ///
    /// # Errors
    /// Returns an error if the query fails or a row is malformed.
    pub fn session_stats_on(&self, today: NaiveDate) -> Result<SessionStats> {
        let mut stmt = self
            .conn
            .prepare("SELECT duration, completed_at FROM sessions")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut total_sessions = 0u64;
        let mut total_minutes = 0u64;
        let mut dates = Vec::new();
        for row in rows {
            let (duration, completed_at) = row?;
            total_sessions += 1;
            total_minutes += u64::from(duration / 60);
            dates.push(parse_timestamp(&completed_at)?.date_naive());
        }

        let streaks = stats::streaks(dates, today);
        Ok(SessionStats {
            total_sessions,
            total_minutes,
            current_streak: streaks.current,
            longest_streak: streaks.longest,
        })
    }

    /// Fetch one custom preset.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored row is malformed.
    pub fn custom_preset(&self, id: &str) -> Result<Option<CustomPreset>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, name, description, type, duration, intervals, cycles, created_at
                 FROM custom_presets WHERE id = ?1",
                params![id],
                RawPreset::from_row,
            )
            .optional()?;
        raw.map(RawPreset::into_preset).transpose()
    }
}

impl SessionStore for Database {
    fn create_session(&self, session: &NewSession) -> Result<SessionRecord> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO sessions (id, preset_id, preset_name, preset_type, duration, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                session.preset_id,
                session.preset_name,
                session.preset_type.as_str(),
                session.duration_secs,
                format_timestamp(&session.completed_at),
            ],
        )?;
        debug!(%id, preset = %session.preset_id, "session recorded");
        Ok(SessionRecord {
            id,
            preset_id: session.preset_id.clone(),
            preset_name: session.preset_name.clone(),
            preset_type: session.preset_type,
            duration_secs: session.duration_secs,
            completed_at: session.completed_at,
        })
    }

    fn list_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "SELECT id, preset_id, preset_name, preset_type, duration, completed_at
             FROM sessions
             ORDER BY completed_at DESC, rowid DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, preset_id, preset_name, preset_type, duration_secs, completed_at) = row?;
            sessions.push(SessionRecord {
                id,
                preset_id,
                preset_name,
                preset_type: preset_type.parse()?,
                duration_secs,
                completed_at: parse_timestamp(&completed_at)?,
            });
        }
        Ok(sessions)
    }

    fn session_stats(&self) -> Result<SessionStats> {
        self.session_stats_on(Utc::now().date_naive())
    }

    fn create_custom_preset(&self, preset: &NewCustomPreset) -> Result<CustomPreset> {
        preset.validate()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO custom_presets
                (id, name, description, type, duration, intervals, cycles, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                preset.name,
                preset.description,
                preset.preset_type.as_str(),
                preset.duration_secs,
                presets::encode_phases(&preset.phases)?,
                preset.cycles,
                format_timestamp(&created_at),
            ],
        )?;
        debug!(%id, name = %preset.name, "custom preset created");
        Ok(CustomPreset {
            id,
            name: preset.name.clone(),
            description: preset.description.clone(),
            preset_type: preset.preset_type,
            duration_secs: preset.duration_secs,
            phases: preset.phases.clone(),
            cycles: preset.cycles,
            created_at,
        })
    }

    fn list_custom_presets(&self) -> Result<Vec<CustomPreset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, type, duration, intervals, cycles, created_at
             FROM custom_presets
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], RawPreset::from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_preset()?);
        }
        Ok(out)
    }

    fn delete_custom_preset(&self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM custom_presets WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound {
                kind: "custom preset",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Row of `custom_presets` before the text columns are decoded.
struct RawPreset {
    id: String,
    name: String,
    description: String,
    preset_type: String,
    duration: u32,
    intervals: Option<String>,
    cycles: Option<u32>,
    created_at: String,
}

impl RawPreset {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            preset_type: row.get(3)?,
            duration: row.get(4)?,
            intervals: row.get(5)?,
            cycles: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_preset(self) -> Result<CustomPreset> {
        Ok(CustomPreset {
            phases: presets::decode_phases(self.intervals.as_deref())?,
            preset_type: self.preset_type.parse()?,
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            name: self.name,
            description: self.description,
            duration_secs: self.duration,
            cycles: self.cycles,
        })
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    // Fixed width so text ordering matches time ordering.
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            CoreError::Validation(ValidationError::UnknownVariant {
                field: "timestamp",
                value: format!("{raw} ({e})"),
            })
        })
}
