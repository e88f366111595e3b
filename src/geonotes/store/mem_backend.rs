use super::backend::StorageBackend;
use super::Snapshot;
use crate::error::{GeonotesError, Result};
use std::cell::{Cell, RefCell};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the repository is
/// single-threaded. This keeps `StorageBackend` on `&self` like the file
/// backend.
#[derive(Default)]
pub struct MemBackend {
    stored: RefCell<Option<Snapshot>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
    fail_write_number: Cell<Option<usize>>,
    fail_after: Cell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds `snapshot`, as if written by an earlier run.
    pub fn with_stored(snapshot: Snapshot) -> Self {
        let backend = Self::default();
        *backend.stored.borrow_mut() = Some(snapshot);
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Fail only the `n`-th write from now (1-based); later writes succeed.
    pub fn fail_nth_write(&self, n: usize) {
        self.fail_write_number.set(Some(self.writes.get() + n));
    }

    /// Let the next `n` writes succeed, then fail every write after them.
    pub fn fail_writes_after(&self, n: usize) {
        self.fail_after.set(Some(self.writes.get() + n));
    }

    /// Number of attempted writes, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        Ok(self.stored.borrow().clone())
    }

    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let attempt = self.writes.get() + 1;
        self.writes.set(attempt);

        if self.simulate_write_error.get()
            || self.fail_write_number.get() == Some(attempt)
            || self.fail_after.get().is_some_and(|last_ok| attempt > last_ok)
        {
            return Err(GeonotesError::Store("Simulated write error".to_string()));
        }
        *self.stored.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let backend = MemBackend::new();
        assert!(backend.load_snapshot().unwrap().is_none());
    }

    #[test]
    fn fails_only_the_requested_write() {
        let backend = MemBackend::new();
        backend.fail_nth_write(2);

        assert!(backend.save_snapshot(&Snapshot::default()).is_ok());
        assert!(backend.save_snapshot(&Snapshot::default()).is_err());
        assert!(backend.save_snapshot(&Snapshot::default()).is_ok());
        assert_eq!(backend.write_count(), 3);
    }

    #[test]
    fn fails_everything_after_the_allowance() {
        let backend = MemBackend::new();
        backend.fail_writes_after(1);

        assert!(backend.save_snapshot(&Snapshot::default()).is_ok());
        assert!(backend.save_snapshot(&Snapshot::default()).is_err());
        assert!(backend.save_snapshot(&Snapshot::default()).is_err());
    }

    #[test]
    fn simulated_errors_keep_previous_snapshot() {
        let backend = MemBackend::with_stored(Snapshot::default());
        backend.set_simulate_write_error(true);

        let mut next = Snapshot::default();
        next.users.push(crate::model::User::new("a@a.com", "a", "h"));
        assert!(backend.save_snapshot(&next).is_err());
        assert_eq!(backend.load_snapshot().unwrap(), Some(Snapshot::default()));
    }
}
