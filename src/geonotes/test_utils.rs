//! Shared fixtures for unit tests.

use crate::geo::NoCountry;
use crate::model::{Note, NoteDraft, User, UserPatch};
use crate::security::{Hasher, HasherConfig};
use crate::store::fs_backend::FsBackend;
use crate::store::mem_backend::MemBackend;
use crate::store::{Repository, Snapshot, SnapshotRepository};
use chrono::{Duration, Utc};
use std::path::PathBuf;
use tempfile::TempDir;

pub const PASSWORD: &str = "longenough1";

pub fn mem_repo() -> SnapshotRepository<MemBackend> {
    SnapshotRepository::with_seed(MemBackend::new(), Snapshot::default())
}

/// A note created `minutes_ago` minutes before now, with no owner.
pub fn note_at(url: &str, minutes_ago: i64) -> Note {
    let draft = NoteDraft::new(url, 10.0, 20.0)
        .with_created(Utc::now() - Duration::minutes(minutes_ago));
    Note::from_draft(draft, &NoCountry)
}

/// Argon2 with the cheapest legal parameters.
pub fn fast_hasher() -> Hasher {
    Hasher::new(&HasherConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

/// Stores a user whose password is [`PASSWORD`].
pub fn stored_user<R: Repository>(repo: &mut R, email: &str, username: &str, active: bool) -> User {
    let hash = fast_hasher().hash_password(PASSWORD).unwrap();
    let user = repo.create_user(&User::new(email, username, hash)).unwrap();
    if active {
        repo.update_user(&user, &UserPatch::activate()).unwrap()
    } else {
        user
    }
}

/// Stores a note created by `user`.
pub fn owned_note<R: Repository>(repo: &mut R, user: &User, url: &str) -> Note {
    let mut note = Note::from_draft(NoteDraft::new(url, 10.0, 20.0).with_text("B #tag"), &NoCountry);
    note.creator = Some(user.username.clone());
    note.creator_id = Some(user.email.clone());
    repo.add(&note).unwrap();
    note
}

/// A temporary data directory for file-backed repositories.
pub struct TestEnv {
    _dir: TempDir,
    pub data_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        Self {
            _dir: dir,
            data_dir,
        }
    }

    pub fn repo(&self) -> SnapshotRepository<FsBackend> {
        SnapshotRepository::open(FsBackend::new(self.data_dir.clone())).unwrap()
    }
}
