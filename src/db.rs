// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::UserProfile;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendlog", "spendlog"));

/// Key the whole user record is stored under.
pub const USER_DATA_KEY: &str = "smartExpenseTrackerData";

pub fn db_path(data_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
                .context("Could not determine platform-specific data dir")?;
            proj.data_dir().to_path_buf()
        }
    };
    fs::create_dir_all(&dir).context("Failed to create data dir")?;
    Ok(dir.join("spendlog.sqlite"))
}

pub fn open_or_init(data_dir: Option<&Path>) -> Result<Connection> {
    let path = db_path(data_dir)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

fn stored_payload(conn: &Connection) -> Result<Option<String>> {
    let raw = conn
        .query_row(
            "SELECT value FROM kv WHERE key=?1",
            params![USER_DATA_KEY],
            |r| r.get(0),
        )
        .optional()?;
    Ok(raw)
}

/// `None` when nothing is stored, or when the stored payload can't be read.
pub fn load_profile(conn: &Connection) -> Option<UserProfile> {
    let raw = match stored_payload(conn) {
        Ok(v) => v,
        Err(err) => {
            warn!("Error reading stored user data: {}", err);
            return None;
        }
    };
    let raw = raw?;
    match serde_json::from_str::<UserProfile>(&raw) {
        Ok(mut profile) => {
            let assigned = profile.assign_missing_ids();
            if assigned > 0 {
                warn!(assigned, "assigned ids to stored records without one");
            }
            Some(profile)
        }
        Err(err) => {
            warn!("Stored user data is not readable: {}", err);
            None
        }
    }
}

/// Overwrites the stored record.
pub fn save_profile(conn: &Connection, profile: &UserProfile) -> Result<()> {
    let payload = serde_json::to_string(profile).context("Serialize user data")?;
    conn.execute(
        "INSERT INTO kv(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![USER_DATA_KEY, payload],
    )
    .context("Save user data")?;
    info!(
        expenses = profile.expenses.len(),
        income = profile.income.len(),
        "saved user data"
    );
    Ok(())
}

pub fn clear_profile(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM kv WHERE key=?1", params![USER_DATA_KEY])
        .context("Clear user data")?;
    Ok(())
}

pub fn is_setup_complete(conn: &Connection) -> bool {
    load_profile(conn).is_some_and(|p| p.is_setup_complete)
}

/// A record exists but does not load as a profile.
pub fn has_unreadable_data(conn: &Connection) -> bool {
    match stored_payload(conn) {
        Ok(Some(_)) => load_profile(conn).is_none(),
        Ok(None) => false,
        Err(_) => true,
    }
}
