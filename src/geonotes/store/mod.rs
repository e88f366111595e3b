//! # Storage Layer
//!
//! This module defines the persistence and query abstraction for geonotes. The
//! [`Repository`] trait is the only thing use cases depend on; they never see a
//! concrete store.
//!
//! ## Snapshot Architecture
//!
//! [`SnapshotRepository`] keeps the whole dataset (notes, users, sessions) in
//! memory as a [`Snapshot`] and writes the complete snapshot through a
//! [`backend::StorageBackend`] after every mutation:
//!
//! 1. **Load**: on open, the snapshot is read from the backend, or starts empty
//!    when the backend has nothing stored yet. An explicit seed skips the load.
//! 2. **Read**: queries run against the in-memory copy only.
//! 3. **Write**: a mutation builds the next snapshot, persists it, and only
//!    then swaps it in. A failed write leaves the in-memory copy untouched.
//!
//! ## Single Writer
//!
//! Persistence is a read-modify-write of one whole file with no locking. Only
//! one process may hold a repository over a given data directory; two
//! processes sharing it silently lose each other's writes (last writer wins).
//! Inside a process, mutations take `&mut self`, so the borrow checker already
//! enforces a single writer.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production backend, `db.json` in a data dir,
//!   written atomically (temp file then rename).
//! - [`mem_backend::MemBackend`]: in-memory backend for tests, with write
//!   failure injection.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! └── db.json    # {"notes": [...], "users": [...], "sessions": [...]}
//! ```

use crate::error::Result;
use crate::model::{Note, NotePatch, Session, User, UserPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod snapshot_repo;

pub use snapshot_repo::SnapshotRepository;

/// The complete persisted dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// Equality filters for listing notes. Every set field must match (AND).
///
/// The default value has no predicates and matches every note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilters {
    pub code: Option<String>,
    pub url: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub creator: Option<String>,
    pub country: Option<String>,
    /// Matches notes whose tag list contains this value.
    pub tag: Option<String>,
}

impl NoteFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, note: &Note) -> bool {
        fn eq_opt(filter: &Option<String>, value: Option<&str>) -> bool {
            filter.as_deref().map_or(true, |f| value == Some(f))
        }

        eq_opt(&self.code, Some(note.code.as_str()))
            && eq_opt(&self.url, Some(note.url.as_str()))
            && eq_opt(&self.creator, note.creator.as_deref())
            && eq_opt(&self.country, note.country.as_deref())
            && self.lat.map_or(true, |lat| note.lat == lat)
            && self.long.map_or(true, |long| note.long == long)
            && self.tag.as_ref().map_or(true, |tag| note.tags.contains(tag))
    }
}

/// Abstract interface for the note, user and session collections.
///
/// Lookups return `Ok(None)` for absent entities and never fail for that
/// reason. `Err` is reserved for I/O and serialization problems, which
/// callers convert into system failures.
pub trait Repository {
    /// Filtered notes, newest `created` first, then `skip`/`limit` applied.
    /// A zero limit is no window.
    fn list(&self, filters: &NoteFilters, limit: Option<usize>, skip: usize) -> Result<Vec<Note>>;

    fn add(&mut self, note: &Note) -> Result<()>;

    fn get_by_code(&self, code: &str) -> Result<Option<Note>>;

    fn delete_by_code(&mut self, code: &str) -> Result<Option<Note>>;

    /// Merges `patch` into the stored note with `existing.code`.
    ///
    /// Returns `existing` unchanged if it is no longer stored.
    fn update(&mut self, existing: &Note, patch: &NotePatch) -> Result<Note>;

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    fn create_user(&mut self, user: &User) -> Result<User>;

    /// Merges `patch` into the stored user with `existing.email`.
    fn update_user(&mut self, existing: &User, patch: &UserPatch) -> Result<User>;

    fn delete_user(&mut self, email: &str) -> Result<Option<User>>;

    fn get_session_by_session_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Matches both the token and its owner; used for one-time activation tokens.
    fn get_session_by_session_id_and_email(
        &self,
        session_id: &str,
        email: &str,
    ) -> Result<Option<Session>>;

    fn create_session(&mut self, session: &Session) -> Result<Session>;

    /// Upsert keyed by owner: at most one session per user.
    fn create_or_update_session(
        &mut self,
        email: &str,
        session_id: &str,
        expire_time: DateTime<Utc>,
    ) -> Result<Session>;

    fn delete_session_by_session_id(&mut self, session_id: &str) -> Result<Option<Session>>;
}
