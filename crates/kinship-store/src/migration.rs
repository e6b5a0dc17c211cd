//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Get current version
    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Apply migrations
    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            tracing::info!(version, "applying schema migration");
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Person versions: the append-only lineage record
        CREATE TABLE versions (
            person_hash BLOB NOT NULL,        -- 32 bytes
            version_index INTEGER NOT NULL,   -- 1-based within the person
            father_hash BLOB NOT NULL,        -- 32 bytes, zero = unknown
            father_index INTEGER NOT NULL,    -- 0 = no version pinned
            mother_hash BLOB NOT NULL,
            mother_index INTEGER NOT NULL,
            added_by BLOB NOT NULL,           -- 20 bytes
            timestamp INTEGER NOT NULL,       -- Unix ms
            tag TEXT NOT NULL,
            metadata_cid TEXT NOT NULL,
            claim_digest BLOB NOT NULL,       -- 32 bytes, duplicate suppression

            PRIMARY KEY (person_hash, version_index),
            UNIQUE (person_hash, claim_digest)
        );

        -- Reverse index: name hash -> person hashes
        CREATE TABLE name_index (
            name_hash BLOB NOT NULL,          -- 32 bytes
            person_hash BLOB NOT NULL,
            PRIMARY KEY (name_hash, person_hash)
        );

        -- Endorsements, one row per (version, endorser)
        CREATE TABLE endorsements (
            person_hash BLOB NOT NULL,
            version_index INTEGER NOT NULL,
            endorser BLOB NOT NULL,           -- 20 bytes
            endorsed_at INTEGER NOT NULL,
            PRIMARY KEY (person_hash, version_index, endorser)
        );

        -- Minted tokens; core_info is a CBOR blob
        CREATE TABLE tokens (
            token_id INTEGER PRIMARY KEY,
            person_hash BLOB NOT NULL,
            version_index INTEGER NOT NULL,
            owner BLOB NOT NULL,              -- 20 bytes
            minted_at INTEGER NOT NULL,
            core_info BLOB NOT NULL,
            token_uri TEXT NOT NULL,

            UNIQUE (person_hash, version_index)
        );

        -- Story bookkeeping, one row per token
        CREATE TABLE story_meta (
            token_id INTEGER PRIMARY KEY,
            total_chunks INTEGER NOT NULL DEFAULT 0,
            total_length INTEGER NOT NULL DEFAULT 0,
            is_sealed INTEGER NOT NULL DEFAULT 0,
            last_update_time INTEGER NOT NULL,
            full_story_hash BLOB              -- 32 bytes, set at seal time
        );

        -- Story chunks
        CREATE TABLE story_chunks (
            token_id INTEGER NOT NULL,
            chunk_index INTEGER NOT NULL,
            chunk_hash BLOB NOT NULL,         -- 32 bytes
            content TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            last_editor BLOB NOT NULL,        -- 20 bytes
            kind INTEGER NOT NULL,
            attachment_cid TEXT NOT NULL,
            PRIMARY KEY (token_id, chunk_index)
        );

        -- Indexes for common queries
        CREATE INDEX idx_versions_added_by ON versions(added_by);
        CREATE INDEX idx_tokens_owner ON tokens(owner);
        CREATE INDEX idx_endorsements_version ON endorsements(person_hash, version_index);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
