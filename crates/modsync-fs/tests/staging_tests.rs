use modsync_fs::{Error, StagedFile};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn leftover_parts(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".part"))
        .collect()
}

#[test]
fn commit_creates_target_file() {
    let dir = tempdir().unwrap();

    let mut staged = StagedFile::create(dir.path(), "blockcraft-castle.jar").unwrap();
    staged.write_all(b"castle bytes").unwrap();
    let installed = staged.commit().unwrap();

    assert_eq!(installed, dir.path().join("blockcraft-castle.jar"));
    assert_eq!(fs::read(&installed).unwrap(), b"castle bytes");
    assert!(leftover_parts(dir.path()).is_empty());
}

#[test]
fn commit_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("blockcraft-castle.jar");
    fs::write(&target, b"old").unwrap();

    let mut staged = StagedFile::create(dir.path(), "blockcraft-castle.jar").unwrap();
    staged.write_all(b"new").unwrap();
    staged.commit().unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"new");
}

#[test]
fn commit_creates_missing_directory() {
    let dir = tempdir().unwrap();
    let mods = dir.path().join(".minecraft").join("mods");

    let mut staged = StagedFile::create(&mods, "blockcraft-castle.jar").unwrap();
    staged.write_all(b"castle").unwrap();
    staged.commit().unwrap();

    assert!(mods.join("blockcraft-castle.jar").is_file());
}

#[test]
fn temp_file_lives_in_target_directory() {
    let dir = tempdir().unwrap();
    let staged = StagedFile::create(dir.path(), "blockcraft-castle.jar").unwrap();

    assert_eq!(staged.temp_path().parent(), Some(dir.path()));
    let temp_name = staged.temp_path().file_name().unwrap().to_string_lossy();
    assert!(temp_name.starts_with(".blockcraft-castle.jar."));
    assert!(temp_name.ends_with(".part"));
}

#[test]
fn dropping_uncommitted_file_leaves_target_untouched() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("blockcraft-castle.jar");
    fs::write(&target, b"original").unwrap();

    {
        let mut staged = StagedFile::create(dir.path(), "blockcraft-castle.jar").unwrap();
        staged.write_all(b"half a downl").unwrap();
    }

    assert_eq!(fs::read(&target).unwrap(), b"original");
    assert!(leftover_parts(dir.path()).is_empty());
}

#[test]
fn discard_removes_temp_file_and_creates_nothing() {
    let dir = tempdir().unwrap();

    let mut staged = StagedFile::create(dir.path(), "blockcraft-castle.jar").unwrap();
    staged.write_all(b"partial").unwrap();
    staged.discard().unwrap();

    assert!(!dir.path().join("blockcraft-castle.jar").exists());
    assert!(leftover_parts(dir.path()).is_empty());
}

#[test]
fn path_traversal_name_is_rejected() {
    let dir = tempdir().unwrap();
    let result = StagedFile::create(dir.path(), "../escape.jar");

    assert!(matches!(result, Err(Error::InvalidFileName { .. })));
    assert!(!dir.path().parent().unwrap().join("escape.jar").exists());
}

#[test]
fn long_file_name_can_be_staged_and_committed() {
    let dir = tempdir().unwrap();
    let name = format!("blockcraft-{}.jar", "x".repeat(250 - "blockcraft-.jar".len()));
    assert_eq!(name.len(), 250);

    let mut staged = StagedFile::create(dir.path(), &name).unwrap();
    let temp_name = staged.temp_path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(temp_name.len() < 100, "staging name too long: {}", temp_name.len());
    staged.write_all(b"long").unwrap();
    let installed = staged.commit().unwrap();

    assert_eq!(fs::read(&installed).unwrap(), b"long");
    assert!(leftover_parts(dir.path()).is_empty());
}
