//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for the kinship ledger. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use kinship_core::{
    Address, ChunkKind, LineageClaim, MintedToken, NameHash, ParentLink, PersonCoreInfo,
    PersonHash, PersonVersion, StoryChunk, StoryHash, StoryMetadata, TokenId,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{EndorseInsert, MintInsert, NewToken, NewVersion, Store, VersionInsert};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection on the blocking pool.
    async fn on_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn blob32(index: usize, name: &str, bytes: Vec<u8>) -> rusqlite::Result<[u8; 32]> {
    bytes.try_into().map_err(|_| {
        rusqlite::Error::InvalidColumnType(index, name.into(), rusqlite::types::Type::Blob)
    })
}

fn blob20(index: usize, name: &str, bytes: Vec<u8>) -> rusqlite::Result<[u8; 20]> {
    bytes.try_into().map_err(|_| {
        rusqlite::Error::InvalidColumnType(index, name.into(), rusqlite::types::Type::Blob)
    })
}

// Helper to convert a row to PersonVersion
fn row_to_version(row: &rusqlite::Row<'_>) -> rusqlite::Result<PersonVersion> {
    let person_hash: Vec<u8> = row.get("person_hash")?;
    let father_hash: Vec<u8> = row.get("father_hash")?;
    let mother_hash: Vec<u8> = row.get("mother_hash")?;
    let added_by: Vec<u8> = row.get("added_by")?;

    Ok(PersonVersion {
        person_hash: PersonHash::from_bytes(blob32(0, "person_hash", person_hash)?),
        version_index: row.get("version_index")?,
        father: ParentLink {
            hash: PersonHash::from_bytes(blob32(2, "father_hash", father_hash)?),
            version_index: row.get("father_index")?,
        },
        mother: ParentLink {
            hash: PersonHash::from_bytes(blob32(4, "mother_hash", mother_hash)?),
            version_index: row.get("mother_index")?,
        },
        added_by: Address::from_bytes(blob20(6, "added_by", added_by)?),
        timestamp: row.get("timestamp")?,
        tag: row.get("tag")?,
        metadata_cid: row.get("metadata_cid")?,
    })
}

// Helper to convert a row to MintedToken
fn row_to_token(row: &rusqlite::Row<'_>) -> rusqlite::Result<MintedToken> {
    let person_hash: Vec<u8> = row.get("person_hash")?;
    let owner: Vec<u8> = row.get("owner")?;
    let core_info_cbor: Vec<u8> = row.get("core_info")?;

    let core_info: PersonCoreInfo =
        ciborium::from_reader(&core_info_cbor[..]).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Blob,
                Box::new(e),
            )
        })?;

    Ok(MintedToken {
        token_id: TokenId(row.get::<_, i64>("token_id")? as u64),
        person_hash: PersonHash::from_bytes(blob32(1, "person_hash", person_hash)?),
        version_index: row.get("version_index")?,
        owner: Address::from_bytes(blob20(3, "owner", owner)?),
        minted_at: row.get("minted_at")?,
        core_info,
        token_uri: row.get("token_uri")?,
    })
}

// Helper to convert a row to StoryChunk
fn row_to_chunk(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoryChunk> {
    let chunk_hash: Vec<u8> = row.get("chunk_hash")?;
    let last_editor: Vec<u8> = row.get("last_editor")?;
    let kind_raw: u8 = row.get("kind")?;
    let kind = ChunkKind::from_u8(kind_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Integer,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid chunk kind byte: {kind_raw}"),
            )),
        )
    })?;

    Ok(StoryChunk {
        token_id: TokenId(row.get::<_, i64>("token_id")? as u64),
        chunk_index: row.get("chunk_index")?,
        chunk_hash: StoryHash::from_bytes(blob32(2, "chunk_hash", chunk_hash)?),
        content: row.get("content")?,
        timestamp: row.get("timestamp")?,
        last_editor: Address::from_bytes(blob20(5, "last_editor", last_editor)?),
        kind,
        attachment_cid: row.get("attachment_cid")?,
    })
}

// Helper to convert a row to StoryMetadata
fn row_to_meta(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoryMetadata> {
    let full_story_hash: Option<Vec<u8>> = row.get("full_story_hash")?;
    let full_story_hash = match full_story_hash {
        Some(bytes) => Some(StoryHash::from_bytes(blob32(5, "full_story_hash", bytes)?)),
        None => None,
    };

    Ok(StoryMetadata {
        token_id: TokenId(row.get::<_, i64>("token_id")? as u64),
        total_chunks: row.get("total_chunks")?,
        total_length: row.get::<_, i64>("total_length")? as u64,
        is_sealed: row.get::<_, i64>("is_sealed")? != 0,
        last_update_time: row.get("last_update_time")?,
        full_story_hash,
    })
}

// Helper to encode PersonCoreInfo to CBOR
fn encode_core_info(info: &PersonCoreInfo) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(info, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn version_exists(conn: &Connection, person: &PersonHash, index: u32) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM versions WHERE person_hash = ?1 AND version_index = ?2",
            params![person.as_bytes().as_slice(), index],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_version(&self, version: &NewVersion) -> Result<VersionInsert> {
        let version = version.clone();

        self.on_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            // Pinned parents must resolve. Father first.
            for link in [&version.father, &version.mother] {
                if link.is_pinned() && !version_exists(&tx, &link.hash, link.version_index)? {
                    return Ok(VersionInsert::MissingParent { link: *link });
                }
            }

            let digest = LineageClaim {
                father: version.father,
                mother: version.mother,
                tag: version.tag.clone(),
            }
            .digest();

            let existing: Option<u32> = tx
                .query_row(
                    "SELECT version_index FROM versions
                     WHERE person_hash = ?1 AND claim_digest = ?2",
                    params![
                        version.person_hash.as_bytes().as_slice(),
                        digest.as_bytes().as_slice()
                    ],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(existing_index) = existing {
                return Ok(VersionInsert::Duplicate { existing_index });
            }

            let count: u32 = tx.query_row(
                "SELECT COUNT(*) FROM versions WHERE person_hash = ?1",
                params![version.person_hash.as_bytes().as_slice()],
                |row| row.get(0),
            )?;
            let index = count + 1;

            tx.execute(
                "INSERT INTO versions (
                    person_hash, version_index, father_hash, father_index,
                    mother_hash, mother_index, added_by, timestamp, tag,
                    metadata_cid, claim_digest
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    version.person_hash.as_bytes().as_slice(),
                    index,
                    version.father.hash.as_bytes().as_slice(),
                    version.father.version_index,
                    version.mother.hash.as_bytes().as_slice(),
                    version.mother.version_index,
                    version.added_by.as_bytes().as_slice(),
                    version.timestamp,
                    version.tag,
                    version.metadata_cid,
                    digest.as_bytes().as_slice(),
                ],
            )?;

            if let Some(name) = version.name_hash {
                tx.execute(
                    "INSERT OR IGNORE INTO name_index (name_hash, person_hash)
                     VALUES (?1, ?2)",
                    params![
                        name.as_bytes().as_slice(),
                        version.person_hash.as_bytes().as_slice()
                    ],
                )?;
            }

            tx.commit()?;
            Ok(VersionInsert::Inserted { index })
        })
        .await
    }

    async fn version_count(&self, person: &PersonHash) -> Result<u32> {
        let person = *person;
        self.on_conn(move |conn| {
            let count: u32 = conn.query_row(
                "SELECT COUNT(*) FROM versions WHERE person_hash = ?1",
                params![person.as_bytes().as_slice()],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
    }

    async fn get_version(&self, person: &PersonHash, index: u32) -> Result<Option<PersonVersion>> {
        let person = *person;
        self.on_conn(move |conn| {
            let version = conn
                .query_row(
                    "SELECT * FROM versions WHERE person_hash = ?1 AND version_index = ?2",
                    params![person.as_bytes().as_slice(), index],
                    row_to_version,
                )
                .optional()?;
            Ok(version)
        })
        .await
    }

    async fn list_versions(
        &self,
        person: &PersonHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PersonVersion>> {
        let person = *person;
        self.on_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM versions WHERE person_hash = ?1
                 ORDER BY version_index LIMIT ?2 OFFSET ?3",
            )?;
            let versions = stmt
                .query_map(
                    params![person.as_bytes().as_slice(), limit as i64, offset as i64],
                    row_to_version,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(versions)
        })
        .await
    }

    async fn persons_by_name(
        &self,
        name: &NameHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PersonHash>> {
        let name = *name;
        self.on_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT person_hash FROM name_index WHERE name_hash = ?1
                 ORDER BY person_hash LIMIT ?2 OFFSET ?3",
            )?;
            let persons = stmt
                .query_map(
                    params![name.as_bytes().as_slice(), limit as i64, offset as i64],
                    |row| {
                        let bytes: Vec<u8> = row.get(0)?;
                        Ok(PersonHash::from_bytes(blob32(0, "person_hash", bytes)?))
                    },
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(persons)
        })
        .await
    }

    async fn persons_by_name_count(&self, name: &NameHash) -> Result<u64> {
        let name = *name;
        self.on_conn(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM name_index WHERE name_hash = ?1",
                params![name.as_bytes().as_slice()],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
    }

    async fn insert_endorsement(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &Address,
        endorsed_at: i64,
    ) -> Result<EndorseInsert> {
        let person = *person;
        let endorser = *endorser;
        self.on_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !version_exists(&tx, &person, index)? {
                return Ok(EndorseInsert::VersionMissing);
            }

            let inserted = tx.execute(
                "INSERT OR IGNORE INTO endorsements
                 (person_hash, version_index, endorser, endorsed_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    person.as_bytes().as_slice(),
                    index,
                    endorser.as_bytes().as_slice(),
                    endorsed_at
                ],
            )?;

            if inserted == 0 {
                return Ok(EndorseInsert::AlreadyEndorsed);
            }

            let count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM endorsements
                 WHERE person_hash = ?1 AND version_index = ?2",
                params![person.as_bytes().as_slice(), index],
                |row| row.get(0),
            )?;

            tx.commit()?;
            Ok(EndorseInsert::Recorded {
                count: count as u64,
            })
        })
        .await
    }

    async fn endorsement_count(&self, person: &PersonHash, index: u32) -> Result<u64> {
        let person = *person;
        self.on_conn(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM endorsements
                 WHERE person_hash = ?1 AND version_index = ?2",
                params![person.as_bytes().as_slice(), index],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
    }

    async fn has_endorsed(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &Address,
    ) -> Result<bool> {
        let person = *person;
        let endorser = *endorser;
        self.on_conn(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM endorsements
                     WHERE person_hash = ?1 AND version_index = ?2 AND endorser = ?3",
                    params![
                        person.as_bytes().as_slice(),
                        index,
                        endorser.as_bytes().as_slice()
                    ],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    async fn list_endorsers(
        &self,
        person: &PersonHash,
        index: u32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Address>> {
        let person = *person;
        self.on_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT endorser FROM endorsements
                 WHERE person_hash = ?1 AND version_index = ?2
                 ORDER BY endorser LIMIT ?3 OFFSET ?4",
            )?;
            let endorsers = stmt
                .query_map(
                    params![
                        person.as_bytes().as_slice(),
                        index,
                        limit as i64,
                        offset as i64
                    ],
                    |row| {
                        let bytes: Vec<u8> = row.get(0)?;
                        Ok(Address::from_bytes(blob20(0, "endorser", bytes)?))
                    },
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(endorsers)
        })
        .await
    }

    async fn insert_token(&self, token: &NewToken) -> Result<MintInsert> {
        let token = token.clone();
        self.on_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !version_exists(&tx, &token.person_hash, token.version_index)? {
                return Ok(MintInsert::VersionMissing);
            }

            let existing: Option<i64> = tx
                .query_row(
                    "SELECT token_id FROM tokens
                     WHERE person_hash = ?1 AND version_index = ?2",
                    params![token.person_hash.as_bytes().as_slice(), token.version_index],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(id) = existing {
                return Ok(MintInsert::AlreadyMinted {
                    token_id: TokenId(id as u64),
                });
            }

            let max_id: i64 = tx.query_row(
                "SELECT COALESCE(MAX(token_id), 0) FROM tokens",
                [],
                |row| row.get(0),
            )?;
            let token_id = TokenId(max_id as u64 + 1);

            let core_info = encode_core_info(&token.core_info)?;

            tx.execute(
                "INSERT INTO tokens (
                    token_id, person_hash, version_index, owner,
                    minted_at, core_info, token_uri
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    token_id.value() as i64,
                    token.person_hash.as_bytes().as_slice(),
                    token.version_index,
                    token.owner.as_bytes().as_slice(),
                    token.minted_at,
                    core_info,
                    token.token_uri,
                ],
            )?;

            tx.execute(
                "INSERT INTO story_meta (token_id, last_update_time) VALUES (?1, ?2)",
                params![token_id.value() as i64, token.minted_at],
            )?;

            tx.commit()?;
            Ok(MintInsert::Minted { token_id })
        })
        .await
    }

    async fn get_token(&self, token_id: TokenId) -> Result<Option<MintedToken>> {
        self.on_conn(move |conn| {
            let token = conn
                .query_row(
                    "SELECT * FROM tokens WHERE token_id = ?1",
                    params![token_id.value() as i64],
                    row_to_token,
                )
                .optional()?;
            Ok(token)
        })
        .await
    }

    async fn token_for_version(&self, person: &PersonHash, index: u32) -> Result<Option<TokenId>> {
        let person = *person;
        self.on_conn(move |conn| {
            let id: Option<i64> = conn
                .query_row(
                    "SELECT token_id FROM tokens
                     WHERE person_hash = ?1 AND version_index = ?2",
                    params![person.as_bytes().as_slice(), index],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id.map(|i| TokenId(i as u64)))
        })
        .await
    }

    async fn token_count(&self) -> Result<u64> {
        self.on_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM tokens", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn set_token_owner(&self, token_id: TokenId, owner: &Address) -> Result<bool> {
        let owner = *owner;
        self.on_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE tokens SET owner = ?1 WHERE token_id = ?2",
                params![owner.as_bytes().as_slice(), token_id.value() as i64],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn set_token_uri(&self, token_id: TokenId, token_uri: &str) -> Result<bool> {
        let token_uri = token_uri.to_string();
        self.on_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE tokens SET token_uri = ?1 WHERE token_id = ?2",
                params![token_uri, token_id.value() as i64],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn tokens_by_owner(
        &self,
        owner: &Address,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TokenId>> {
        let owner = *owner;
        self.on_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT token_id FROM tokens WHERE owner = ?1
                 ORDER BY token_id LIMIT ?2 OFFSET ?3",
            )?;
            let ids = stmt
                .query_map(
                    params![owner.as_bytes().as_slice(), limit as i64, offset as i64],
                    |row| row.get::<_, i64>(0).map(|i| TokenId(i as u64)),
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(ids)
        })
        .await
    }

    async fn tokens_by_owner_count(&self, owner: &Address) -> Result<u64> {
        let owner = *owner;
        self.on_conn(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tokens WHERE owner = ?1",
                params![owner.as_bytes().as_slice()],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
    }

    async fn story_metadata(&self, token_id: TokenId) -> Result<Option<StoryMetadata>> {
        self.on_conn(move |conn| {
            let meta = conn
                .query_row(
                    "SELECT * FROM story_meta WHERE token_id = ?1",
                    params![token_id.value() as i64],
                    row_to_meta,
                )
                .optional()?;
            Ok(meta)
        })
        .await
    }

    async fn get_chunk(&self, token_id: TokenId, index: u32) -> Result<Option<StoryChunk>> {
        self.on_conn(move |conn| {
            let chunk = conn
                .query_row(
                    "SELECT * FROM story_chunks WHERE token_id = ?1 AND chunk_index = ?2",
                    params![token_id.value() as i64, index],
                    row_to_chunk,
                )
                .optional()?;
            Ok(chunk)
        })
        .await
    }

    async fn list_chunks(
        &self,
        token_id: TokenId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<StoryChunk>> {
        self.on_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM story_chunks WHERE token_id = ?1
                 ORDER BY chunk_index LIMIT ?2 OFFSET ?3",
            )?;
            let chunks = stmt
                .query_map(
                    params![token_id.value() as i64, limit as i64, offset as i64],
                    row_to_chunk,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(chunks)
        })
        .await
    }

    async fn put_chunk(&self, chunk: &StoryChunk, meta: &StoryMetadata) -> Result<()> {
        let chunk = chunk.clone();
        let meta = meta.clone();
        self.on_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            tx.execute(
                "INSERT OR REPLACE INTO story_chunks (
                    token_id, chunk_index, chunk_hash, content,
                    timestamp, last_editor, kind, attachment_cid
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    chunk.token_id.value() as i64,
                    chunk.chunk_index,
                    chunk.chunk_hash.as_bytes().as_slice(),
                    chunk.content,
                    chunk.timestamp,
                    chunk.last_editor.as_bytes().as_slice(),
                    chunk.kind.to_u8(),
                    chunk.attachment_cid,
                ],
            )?;

            write_meta(&tx, &meta)?;

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn put_story_metadata(&self, meta: &StoryMetadata) -> Result<()> {
        let meta = meta.clone();
        self.on_conn(move |conn| {
            write_meta(conn, &meta)?;
            Ok(())
        })
        .await
    }
}

fn write_meta(conn: &Connection, meta: &StoryMetadata) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO story_meta (
            token_id, total_chunks, total_length, is_sealed,
            last_update_time, full_story_hash
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            meta.token_id.value() as i64,
            meta.total_chunks,
            meta.total_length as i64,
            meta.is_sealed as i64,
            meta.last_update_time,
            meta.full_story_hash.as_ref().map(|h| h.as_bytes().as_slice()),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_core::{DateParts, Gender, ParentLink};

    fn new_version(person: PersonHash, tag: &str) -> NewVersion {
        NewVersion {
            person_hash: person,
            name_hash: Some(NameHash::derive("test person", None)),
            father: ParentLink::NONE,
            mother: ParentLink::NONE,
            added_by: Address::from_bytes([0x11; 20]),
            timestamp: 1_700_000_000_000,
            tag: tag.to_string(),
            metadata_cid: String::new(),
        }
    }

    fn core_info() -> PersonCoreInfo {
        PersonCoreInfo {
            full_name: "Ada Example".to_string(),
            gender: Gender::Female,
            birth: DateParts {
                is_bc: false,
                year: 1815,
                month: 12,
                day: 10,
            },
            birth_place: "London".to_string(),
            death: DateParts::default(),
            death_place: String::new(),
            story: "a short note".to_string(),
        }
    }

    #[tokio::test]
    async fn test_version_round_trip() {
        let store = SqliteStore::open_memory().unwrap();
        let person = PersonHash::from_bytes([1; 32]);

        let result = store.insert_version(&new_version(person, "first")).await.unwrap();
        assert_eq!(result, VersionInsert::Inserted { index: 1 });

        let fetched = store.get_version(&person, 1).await.unwrap().unwrap();
        assert_eq!(fetched.person_hash, person);
        assert_eq!(fetched.version_index, 1);
        assert_eq!(fetched.tag, "first");
        assert_eq!(fetched.father, ParentLink::NONE);
    }

    #[tokio::test]
    async fn test_duplicate_claim_rejected() {
        let store = SqliteStore::open_memory().unwrap();
        let person = PersonHash::from_bytes([1; 32]);

        store.insert_version(&new_version(person, "a")).await.unwrap();
        let replay = store.insert_version(&new_version(person, "a")).await.unwrap();
        assert_eq!(replay, VersionInsert::Duplicate { existing_index: 1 });
    }

    #[tokio::test]
    async fn test_pinned_parent_checked() {
        let store = SqliteStore::open_memory().unwrap();
        let person = PersonHash::from_bytes([1; 32]);
        let father = PersonHash::from_bytes([2; 32]);

        let mut version = new_version(person, "a");
        version.father = ParentLink::new(father, 2);
        let result = store.insert_version(&version).await.unwrap();
        assert_eq!(
            result,
            VersionInsert::MissingParent {
                link: ParentLink::new(father, 2)
            }
        );
    }

    #[tokio::test]
    async fn test_mint_and_story_meta_created() {
        let store = SqliteStore::open_memory().unwrap();
        let person = PersonHash::from_bytes([1; 32]);
        store.insert_version(&new_version(person, "a")).await.unwrap();

        let result = store
            .insert_token(&NewToken {
                person_hash: person,
                version_index: 1,
                owner: Address::from_bytes([0x11; 20]),
                minted_at: 42,
                core_info: core_info(),
                token_uri: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(result, MintInsert::Minted { token_id: TokenId(1) });

        let token = store.get_token(TokenId(1)).await.unwrap().unwrap();
        assert_eq!(token.core_info, core_info());

        let meta = store.story_metadata(TokenId(1)).await.unwrap().unwrap();
        assert_eq!(meta.total_chunks, 0);
        assert!(!meta.is_sealed);
    }

    #[tokio::test]
    async fn test_corrupt_chunk_kind_is_an_error() {
        let store = SqliteStore::open_memory().unwrap();
        let person = PersonHash::from_bytes([1; 32]);
        store.insert_version(&new_version(person, "a")).await.unwrap();
        store
            .insert_token(&NewToken {
                person_hash: person,
                version_index: 1,
                owner: Address::from_bytes([0x11; 20]),
                minted_at: 42,
                core_info: core_info(),
                token_uri: String::new(),
            })
            .await
            .unwrap();

        let chunk = StoryChunk {
            token_id: TokenId(1),
            chunk_index: 0,
            chunk_hash: StoryHash::of_content("text"),
            content: "text".to_string(),
            timestamp: 1,
            last_editor: Address::from_bytes([0x11; 20]),
            kind: ChunkKind::Text,
            attachment_cid: String::new(),
        };
        let meta = StoryMetadata {
            total_chunks: 1,
            total_length: 4,
            ..StoryMetadata::new(TokenId(1), 1)
        };
        store.put_chunk(&chunk, &meta).await.unwrap();

        store
            .conn
            .lock()
            .unwrap()
            .execute("UPDATE story_chunks SET kind = 9", [])
            .unwrap();

        assert!(store.get_chunk(TokenId(1), 0).await.is_err());
        assert!(store.list_chunks(TokenId(1), 0, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_persisted_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinship.db");
        let person = PersonHash::from_bytes([7; 32]);

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert_version(&new_version(person, "a")).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.version_count(&person).await.unwrap(), 1);
    }
}
