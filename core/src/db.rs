use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Days, SecondsFormat, Utc};
use rusqlite::{Connection, params, types::Type};
use tracing::info;
use uuid::Uuid;

use crate::calendar::DateRange;
use crate::models::{NewSample, Sample};

pub struct Database {
    conn: Connection,
}

fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_db_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS samples (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uuid TEXT NOT NULL UNIQUE,
                    user_id TEXT NOT NULL,
                    weight_kg REAL NOT NULL CHECK (weight_kg > 0),
                    body_fat_pct REAL,
                    timestamp TEXT NOT NULL,
                    tags TEXT NOT NULL DEFAULT '[]',
                    notes TEXT NOT NULL DEFAULT '',
                    created_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_samples_user_timestamp
                    ON samples (user_id, timestamp);

                PRAGMA user_version = 1;",
            )?;
        }

        if version < 2 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS user_settings (
                    user_id TEXT NOT NULL,
                    key TEXT NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
                    PRIMARY KEY (user_id, key)
                );

                PRAGMA user_version = 2;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    fn sample_from_row(row: &rusqlite::Row) -> rusqlite::Result<Sample> {
        let timestamp: String = row.get(5)?;
        let tags: String = row.get(6)?;
        let created_at: String = row.get(8)?;
        Ok(Sample {
            id: row.get(0)?,
            uuid: row.get(1)?,
            user_id: row.get(2)?,
            weight_kg: row.get(3)?,
            body_fat_pct: row.get(4)?,
            timestamp: parse_db_timestamp(5, &timestamp)?,
            tags: serde_json::from_str(&tags)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?,
            notes: row.get(7)?,
            created_at: parse_db_timestamp(8, &created_at)?,
        })
    }

    // --- Samples ---

    pub fn insert_sample(&self, sample: &NewSample) -> Result<Sample> {
        sample.validate()?;
        let uuid = Uuid::new_v4().to_string();
        let now = to_db_timestamp(&Utc::now());
        let tags = serde_json::to_string(&sample.tags)?;
        self.conn.execute(
            "INSERT INTO samples (uuid, user_id, weight_kg, body_fat_pct, timestamp, tags, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                uuid,
                sample.user_id,
                sample.weight_kg,
                sample.body_fat_pct,
                to_db_timestamp(&sample.timestamp),
                tags,
                sample.notes,
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, user = %sample.user_id, weight_kg = sample.weight_kg, "sample logged");
        self.get_sample(id)
    }

    pub fn get_sample(&self, id: i64) -> Result<Sample> {
        self.conn
            .query_row(
                "SELECT id, uuid, user_id, weight_kg, body_fat_pct, timestamp, tags, notes, created_at
                 FROM samples WHERE id = ?1",
                params![id],
                Self::sample_from_row,
            )
            .with_context(|| format!("Sample {id} not found"))
    }

    /// Samples for a user, newest first.
    pub fn list_samples(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<Sample>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, uuid, user_id, weight_kg, body_fat_pct, timestamp, tags, notes, created_at
             FROM samples WHERE user_id = ?1
             ORDER BY timestamp DESC, id DESC
             LIMIT ?2",
        )?;
        let samples = stmt
            .query_map(params![user_id, limit.unwrap_or(-1)], Self::sample_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    /// Samples whose UTC timestamp lies within `range` widened by a day on each
    /// side, oldest entry first.
    ///
    /// The widening covers any local offset; callers bucket by local day
    /// themselves. Rows come back in `created_at` order so same-day
    /// deduplication sees insertion order.
    pub fn samples_in_range(&self, user_id: &str, range: DateRange) -> Result<Vec<Sample>> {
        let start = range
            .start
            .checked_sub_days(Days::new(1))
            .unwrap_or(range.start)
            .and_hms_opt(0, 0, 0)
            .context("Invalid range start")?
            .and_utc();
        let end = range
            .end
            .checked_add_days(Days::new(1))
            .unwrap_or(range.end)
            .and_hms_opt(0, 0, 0)
            .context("Invalid range end")?
            .and_utc();

        let mut stmt = self.conn.prepare(
            "SELECT id, uuid, user_id, weight_kg, body_fat_pct, timestamp, tags, notes, created_at
             FROM samples
             WHERE user_id = ?1 AND timestamp >= ?2 AND timestamp < ?3
             ORDER BY created_at, id",
        )?;
        let samples = stmt
            .query_map(
                params![user_id, to_db_timestamp(&start), to_db_timestamp(&end)],
                Self::sample_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    pub fn delete_sample(&self, id: i64) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM samples WHERE id = ?1", params![id])?;
        if rows == 0 {
            anyhow::bail!("Sample not found");
        }
        info!(id, "sample deleted");
        Ok(())
    }

    // --- User Settings ---

    pub fn set_setting(&self, user_id: &str, key: &str, value: &str) -> Result<()> {
        let now = to_db_timestamp(&Utc::now());
        self.conn.execute(
            "INSERT INTO user_settings (user_id, key, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![user_id, key, value, now],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, user_id: &str, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM user_settings WHERE user_id = ?1 AND key = ?2")?;
        let mut rows = stmt.query(params![user_id, key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM user_settings WHERE user_id = ?1 AND key = ?2",
            params![user_id, key],
        )?;
        Ok(rows > 0)
    }
}
