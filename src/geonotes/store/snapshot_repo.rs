use super::backend::StorageBackend;
use super::{NoteFilters, Repository, Snapshot};
use crate::error::Result;
use crate::model::{Note, NotePatch, Session, User, UserPatch};
use chrono::{DateTime, Utc};
use log::debug;

/// Repository over an in-memory snapshot, flushed whole after each mutation.
pub struct SnapshotRepository<B: StorageBackend> {
    backend: B,
    snapshot: Snapshot,
}

impl<B: StorageBackend> SnapshotRepository<B> {
    /// Loads the stored snapshot, or starts with empty collections.
    pub fn open(backend: B) -> Result<Self> {
        let snapshot = backend.load_snapshot()?.unwrap_or_default();
        debug!(
            "snapshot loaded: {} notes, {} users, {} sessions",
            snapshot.notes.len(),
            snapshot.users.len(),
            snapshot.sessions.len()
        );
        Ok(Self { backend, snapshot })
    }

    /// Starts from an explicit seed without reading the backend.
    pub fn with_seed(backend: B, seed: Snapshot) -> Self {
        Self {
            backend,
            snapshot: seed,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Applies `change` to a copy of the snapshot, persists it, then swaps it in.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut Snapshot) -> T) -> Result<T> {
        let mut next = self.snapshot.clone();
        let out = change(&mut next);
        self.backend.save_snapshot(&next)?;
        debug!(
            "snapshot flushed: {} notes, {} users, {} sessions",
            next.notes.len(),
            next.users.len(),
            next.sessions.len()
        );
        self.snapshot = next;
        Ok(out)
    }

    fn note_index(&self, code: &str) -> Option<usize> {
        self.snapshot.notes.iter().position(|n| n.code == code)
    }

    fn user_index(&self, email: &str) -> Option<usize> {
        self.snapshot.users.iter().position(|u| u.email == email)
    }

    fn session_index(&self, session_id: &str) -> Option<usize> {
        self.snapshot
            .sessions
            .iter()
            .position(|s| s.session_id == session_id)
    }
}

impl<B: StorageBackend> Repository for SnapshotRepository<B> {
    fn list(&self, filters: &NoteFilters, limit: Option<usize>, skip: usize) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .snapshot
            .notes
            .iter()
            .filter(|n| filters.matches(n))
            .cloned()
            .collect();

        notes.sort_by(|a, b| b.created.cmp(&a.created));

        let page = notes.into_iter().skip(skip);
        Ok(match limit {
            Some(limit) if limit > 0 => page.take(limit).collect(),
            _ => page.collect(),
        })
    }

    fn add(&mut self, note: &Note) -> Result<()> {
        self.mutate(|next| next.notes.push(note.clone()))
    }

    fn get_by_code(&self, code: &str) -> Result<Option<Note>> {
        Ok(self.note_index(code).map(|i| self.snapshot.notes[i].clone()))
    }

    fn delete_by_code(&mut self, code: &str) -> Result<Option<Note>> {
        let Some(index) = self.note_index(code) else {
            return Ok(None);
        };
        self.mutate(|next| Some(next.notes.remove(index)))
    }

    fn update(&mut self, existing: &Note, patch: &NotePatch) -> Result<Note> {
        let Some(index) = self.note_index(&existing.code) else {
            return Ok(existing.clone());
        };
        self.mutate(|next| {
            let note = &mut next.notes[index];
            patch.apply_to(note);
            note.clone()
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .snapshot
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.user_index(email).map(|i| self.snapshot.users[i].clone()))
    }

    fn create_user(&mut self, user: &User) -> Result<User> {
        self.mutate(|next| {
            next.users.push(user.clone());
            user.clone()
        })
    }

    fn update_user(&mut self, existing: &User, patch: &UserPatch) -> Result<User> {
        let Some(index) = self.user_index(&existing.email) else {
            return Ok(existing.clone());
        };
        self.mutate(|next| {
            let user = &mut next.users[index];
            patch.apply_to(user);
            user.clone()
        })
    }

    fn delete_user(&mut self, email: &str) -> Result<Option<User>> {
        let Some(index) = self.user_index(email) else {
            return Ok(None);
        };
        self.mutate(|next| Some(next.users.remove(index)))
    }

    fn get_session_by_session_id(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self
            .session_index(session_id)
            .map(|i| self.snapshot.sessions[i].clone()))
    }

    fn get_session_by_session_id_and_email(
        &self,
        session_id: &str,
        email: &str,
    ) -> Result<Option<Session>> {
        Ok(self
            .snapshot
            .sessions
            .iter()
            .find(|s| s.session_id == session_id && s.email == email)
            .cloned())
    }

    fn create_session(&mut self, session: &Session) -> Result<Session> {
        self.mutate(|next| {
            next.sessions.push(session.clone());
            session.clone()
        })
    }

    fn create_or_update_session(
        &mut self,
        email: &str,
        session_id: &str,
        expire_time: DateTime<Utc>,
    ) -> Result<Session> {
        self.mutate(|next| {
            if let Some(existing) = next.sessions.iter_mut().find(|s| s.email == email) {
                existing.session_id = session_id.to_string();
                existing.expire_time = expire_time;
                existing.clone()
            } else {
                let session = Session::new(session_id, email, expire_time);
                next.sessions.push(session.clone());
                session
            }
        })
    }

    fn delete_session_by_session_id(&mut self, session_id: &str) -> Result<Option<Session>> {
        let Some(index) = self.session_index(session_id) else {
            return Ok(None);
        };
        self.mutate(|next| Some(next.sessions.remove(index)))
    }
}
