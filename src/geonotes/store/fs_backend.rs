use super::backend::StorageBackend;
use super::Snapshot;
use crate::error::{GeonotesError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DB_FILENAME: &str = "db.json";

/// File backend storing the whole snapshot as `<data_dir>/db.json`.
pub struct FsBackend {
    data_dir: PathBuf,
}

impl FsBackend {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(GeonotesError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        let db_file = self.db_path();
        if !db_file.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&db_file).map_err(GeonotesError::Io)?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(GeonotesError::Serialization)?;
        Ok(Some(snapshot))
    }

    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_dir()?;

        let content = serde_json::to_string(snapshot).map_err(GeonotesError::Serialization)?;

        // Atomic write
        let tmp_file = self.data_dir.join(format!(".db-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(GeonotesError::Io)?;
        if let Err(err) = fs::rename(&tmp_file, self.db_path()) {
            let _ = fs::remove_file(&tmp_file);
            return Err(GeonotesError::Io(err));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::store::Repository;
    use crate::test_utils::TestEnv;

    #[test]
    fn missing_data_dir_loads_nothing() {
        let env = TestEnv::new();
        let backend = FsBackend::new(env.data_dir.clone());

        assert!(backend.load_snapshot().unwrap().is_none());
        assert!(!env.data_dir.exists());
    }

    #[test]
    fn first_write_creates_the_data_dir() {
        let env = TestEnv::new();
        let mut repo = env.repo();

        repo.create_user(&User::new("a@a.com", "bob", "hash")).unwrap();

        assert_eq!(repo.backend().data_dir(), env.data_dir.as_path());
        assert!(repo.backend().db_path().is_file());
        let stored = repo.backend().load_snapshot().unwrap().unwrap();
        assert_eq!(stored.users[0].username, "bob");
    }
}
