//! Durable engine state: the alarm list, the scheduled-trigger count, and
//! the playback options written by `configure`.
//!
//! Backed by a single SQLite key/value table; values are JSON-encoded.
//! The store is not internally synchronized — the engine serializes access
//! behind its own mutex.

use rusqlite::{Connection, OptionalExtension};
use tracing::warn;

use crate::error::Result;
use crate::types::{AlarmOptions, AlarmSpec};

const KEY_ALARMS: &str = "alarms";
const KEY_ALARMS_COUNT: &str = "alarms_count";
const KEY_STREAMING_URL: &str = "alarms_streaming_url";
const KEY_STREAMING_ONLY_WIFI: &str = "alarms_streaming_only_wifi";
const KEY_RINGTONE: &str = "alarms_ringtone";
const KEY_VOLUME: &str = "alarms_volume";
const KEY_STREAM_TYPE: &str = "alarms_stream_type";
const KEY_NOTIFICATION_TEXT: &str = "alarms_notification_text";

/// Initialise the engine schema in `conn` (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS wakeup_prefs (
            key    TEXT NOT NULL PRIMARY KEY,
            value  TEXT NOT NULL    -- JSON-encoded
        ) STRICT;
        ",
    )?;
    Ok(())
}

pub struct AlarmStore {
    conn: Connection,
}

impl AlarmStore {
    /// Wrap a connection, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// The persisted alarm list; empty on first run. An unreadable stored
    /// value is treated as empty rather than failing the whole pass.
    pub fn load_alarms(&self) -> Result<Vec<AlarmSpec>> {
        let Some(raw) = self.get_raw(KEY_ALARMS)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(alarms) => Ok(alarms),
            Err(e) => {
                warn!("stored alarm list is unreadable, treating as empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Replace the persisted alarm list.
    pub fn save_alarms(&self, alarms: &[AlarmSpec]) -> Result<()> {
        self.put_raw(KEY_ALARMS, &serde_json::to_string(alarms)?)
    }

    /// Number of sequential identifiers used by the most recent scheduling
    /// pass; zero on first run.
    pub fn scheduled_count(&self) -> Result<u32> {
        let Some(raw) = self.get_raw(KEY_ALARMS_COUNT)? else {
            return Ok(0);
        };
        Ok(serde_json::from_str(&raw).unwrap_or(0))
    }

    pub fn set_scheduled_count(&self, count: u32) -> Result<()> {
        self.put_raw(KEY_ALARMS_COUNT, &count.to_string())
    }

    /// Write `options` field by field: present fields replace the stored
    /// value, absent fields clear it.
    pub fn save_options(&self, options: &AlarmOptions) -> Result<()> {
        self.put_or_clear(KEY_STREAMING_URL, options.streaming_url.as_ref())?;
        self.put_or_clear(KEY_STREAMING_ONLY_WIFI, options.streaming_only_wifi.as_ref())?;
        self.put_or_clear(KEY_RINGTONE, options.ringtone.as_ref())?;
        self.put_or_clear(KEY_VOLUME, options.volume.as_ref())?;
        self.put_or_clear(KEY_STREAM_TYPE, options.stream_type.as_ref())?;
        self.put_or_clear(KEY_NOTIFICATION_TEXT, options.notification_text.as_ref())?;
        Ok(())
    }

    pub fn load_options(&self) -> Result<AlarmOptions> {
        Ok(AlarmOptions {
            streaming_url: self.get_value(KEY_STREAMING_URL)?,
            streaming_only_wifi: self.get_value(KEY_STREAMING_ONLY_WIFI)?,
            ringtone: self.get_value(KEY_RINGTONE)?,
            volume: self.get_value(KEY_VOLUME)?,
            stream_type: self.get_value(KEY_STREAM_TYPE)?,
            notification_text: self.get_value(KEY_NOTIFICATION_TEXT)?,
        })
    }

    // --- key/value plumbing ------------------------------------------------

    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM wakeup_prefs WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO wakeup_prefs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM wakeup_prefs WHERE key = ?1", [key])?;
        Ok(())
    }

    fn put_or_clear<T: serde::Serialize>(&self, key: &str, value: Option<&T>) -> Result<()> {
        match value {
            Some(v) => self.put_raw(key, &serde_json::to_string(v)?),
            None => self.delete_raw(key),
        }
    }

    fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
