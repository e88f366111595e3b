use chrono::{Duration, Utc};
use geonotes::geo::NoCountry;
use geonotes::model::{Note, NoteDraft, NotePatch, Session, User, UserPatch};
use geonotes::store::backend::StorageBackend;
use geonotes::store::fs_backend::FsBackend;
use geonotes::store::{NoteFilters, Repository, SnapshotRepository};
use std::fs;

fn open(dir: &std::path::Path) -> SnapshotRepository<FsBackend> {
    SnapshotRepository::open(FsBackend::new(dir.to_path_buf())).unwrap()
}

#[test]
fn empty_directory_opens_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = temp_dir.path().join("never-created");

    let repo = open(&data_dir);

    assert!(repo.list(&NoteFilters::default(), None, 0).unwrap().is_empty());
    assert!(!data_dir.exists(), "opening must not write");
}

#[test]
fn mutations_survive_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut repo = open(temp_dir.path());

    let note = Note::from_draft(
        NoteDraft::new("https://a.com", 35.7, 51.4).with_text("#tehran"),
        &NoCountry,
    );
    repo.add(&note).unwrap();
    let user = repo.create_user(&User::new("a@a.com", "bob", "hash")).unwrap();
    repo.update_user(&user, &UserPatch::activate()).unwrap();
    repo.create_session(&Session::new("sid", "a@a.com", Utc::now() + Duration::days(1)))
        .unwrap();
    drop(repo);

    let reopened = open(temp_dir.path());
    assert_eq!(reopened.get_by_code(&note.code).unwrap(), Some(note));
    assert!(reopened.get_user_by_username("bob").unwrap().unwrap().is_active);
    assert!(reopened.get_session_by_session_id("sid").unwrap().is_some());
}

#[test]
fn writes_leave_no_temp_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut repo = open(temp_dir.path());

    for i in 0..5 {
        let note = Note::from_draft(NoteDraft::new(format!("https://{}.com", i), 0.0, 0.0), &NoCountry);
        repo.add(&note).unwrap();
        repo.update(
            &note,
            &NotePatch {
                text: Some("edited".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    }

    let names: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["db.json".to_string()]);
}

#[test]
fn stored_file_has_three_collections() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut repo = open(temp_dir.path());
    repo.create_user(&User::new("a@a.com", "bob", "hash")).unwrap();

    let raw = fs::read_to_string(repo.backend().db_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(value["notes"].as_array().unwrap().is_empty());
    assert_eq!(value["users"][0]["username"], "bob");
    assert_eq!(value["users"][0]["is_active"], false);
    assert!(value["sessions"].as_array().unwrap().is_empty());
}

#[test]
fn partial_file_loads_missing_collections_as_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("db.json"),
        r#"{"users": [{"email": "a@a.com", "username": "bob", "password": "h"}]}"#,
    )
    .unwrap();

    let repo = open(temp_dir.path());
    let user = repo.get_user_by_email("a@a.com").unwrap().unwrap();
    assert!(!user.is_active);
    assert!(repo.snapshot().notes.is_empty());
}

#[test]
fn corrupt_file_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("db.json"), "{broken").unwrap();

    let err = FsBackend::new(temp_dir.path().to_path_buf())
        .load_snapshot()
        .unwrap_err();
    assert_eq!(err.kind(), "SerializationError");
}
