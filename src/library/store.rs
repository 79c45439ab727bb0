//! Durable record storage.
//!
//! The library lives in a single SQLite table keyed by sound id, with a
//! secondary index on category.

use std::path::Path;
use std::sync::Arc;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::error::StoreError;

use super::model::{Sound, SoundId};

const SCHEMA_VERSION: i64 = 1;

const SELECT_COLUMNS: &str =
    "SELECT id, file_name, file, name, category, tags, duration, notes, created_at FROM sounds";

/// Key-value persistence for [`Sound`] records.
pub trait RecordStore {
    /// Persist a new record. Fails if the id is already taken.
    fn insert(&mut self, sound: &Sound) -> Result<SoundId, StoreError>;
    fn fetch_all(&self) -> Result<Vec<Sound>, StoreError>;
    fn fetch_one(&self, id: &SoundId) -> Result<Sound, StoreError>;
    /// Replace the stored record with the same id.
    fn update(&mut self, sound: &Sound) -> Result<SoundId, StoreError>;
    fn delete(&mut self, id: &SoundId) -> Result<(), StoreError>;
    /// Lookup through the category index, newest first.
    fn fetch_by_category(&self, category: &str) -> Result<Vec<Sound>, StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the library database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.initialize_schema()?;
        debug!(path = %path.display(), "opened sound library");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sounds (
                id TEXT PRIMARY KEY,
                file_name TEXT NOT NULL,
                file BLOB NOT NULL,
                name TEXT NOT NULL,
                category TEXT,
                tags TEXT NOT NULL,
                duration REAL NOT NULL,
                notes TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS sounds_by_category ON sounds(category);",
        )?;
        self.conn
            .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(())
    }

    fn parse_row(row: &Row) -> rusqlite::Result<Sound> {
        let id: String = row.get(0)?;
        let id = id
            .parse::<SoundId>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
        let file: Vec<u8> = row.get(2)?;
        let tags: String = row.get(5)?;
        let tags: Vec<String> = serde_json::from_str(&tags)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

        Ok(Sound {
            id,
            file_name: row.get(1)?,
            file: Arc::from(file),
            name: row.get(3)?,
            category: row.get(4)?,
            tags,
            duration: row.get(6)?,
            notes: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn query_sounds(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Sound>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, Self::parse_row)?;

        let mut sounds = Vec::new();
        for sound in rows {
            sounds.push(sound?);
        }
        Ok(sounds)
    }
}

impl RecordStore for SqliteStore {
    fn insert(&mut self, sound: &Sound) -> Result<SoundId, StoreError> {
        let tags = serde_json::to_string(&sound.tags)?;
        self.conn.execute(
            "INSERT INTO sounds (id, file_name, file, name, category, tags, duration, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                sound.id.to_string(),
                sound.file_name,
                &sound.file[..],
                sound.name,
                sound.category,
                tags,
                sound.duration,
                sound.notes,
                sound.created_at,
            ],
        )?;
        Ok(sound.id)
    }

    fn fetch_all(&self) -> Result<Vec<Sound>, StoreError> {
        self.query_sounds(SELECT_COLUMNS, &[])
    }

    fn fetch_one(&self, id: &SoundId) -> Result<Sound, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id.to_string()], Self::parse_row)
            .optional()?
            .ok_or(StoreError::NotFound(*id))
    }

    fn update(&mut self, sound: &Sound) -> Result<SoundId, StoreError> {
        let tags = serde_json::to_string(&sound.tags)?;
        let changed = self.conn.execute(
            "UPDATE sounds SET file_name = ?2, file = ?3, name = ?4, category = ?5, tags = ?6,
                    duration = ?7, notes = ?8, created_at = ?9
             WHERE id = ?1",
            params![
                sound.id.to_string(),
                sound.file_name,
                &sound.file[..],
                sound.name,
                sound.category,
                tags,
                sound.duration,
                sound.notes,
                sound.created_at,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(sound.id));
        }
        Ok(sound.id)
    }

    fn delete(&mut self, id: &SoundId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM sounds WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(*id));
        }
        Ok(())
    }

    fn fetch_by_category(&self, category: &str) -> Result<Vec<Sound>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE category = ?1 ORDER BY created_at DESC");
        self.query_sounds(&sql, &[&category])
    }
}
