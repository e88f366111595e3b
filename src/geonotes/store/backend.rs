use super::Snapshot;
use crate::error::Result;

/// Abstract interface for raw snapshot I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `SnapshotRepository` handles the "what" (queries, merges, upserts).
pub trait StorageBackend {
    /// Load the persisted snapshot.
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load_snapshot(&self) -> Result<Option<Snapshot>>;

    /// Replace the persisted snapshot with `snapshot`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()>;
}
