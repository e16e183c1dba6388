use camino::Utf8Path;
use session_keeper_lib::core::linker::{clear_path, is_link, read_link_target, DirectoryLink, JunctionLink};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_directory_link() {
    let tmp = tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let profile = root.join("profiles").join("alice").join("Config");
    let live = root.join("live").join("Config");
    fs::create_dir_all(&profile).unwrap();
    fs::write(profile.join("settings.yaml"), "alice").unwrap();

    JunctionLink.create(&profile, &live).expect("Failed to link directory");

    assert!(is_link(&live));
    assert_eq!(fs::read_to_string(live.join("settings.yaml")).unwrap(), "alice");
    let target = read_link_target(&live).expect("Failed to read link");
    assert!(target.ends_with("Config"));
}

#[test]
fn test_occupied_link_location() {
    let tmp = tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let target = root.join("target");
    let live = root.join("live");
    fs::create_dir_all(&target).unwrap();
    fs::create_dir_all(&live).unwrap();

    let err = JunctionLink.create(&target, &live).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
}

#[test]
fn test_remove_keeps_target() {
    let tmp = tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let target = root.join("target");
    let live = root.join("live");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("keep.txt"), "keep me").unwrap();

    JunctionLink.create(&target, &live).unwrap();
    JunctionLink.remove(&live).expect("Failed to remove link");

    assert!(!live.exists() && !live.is_symlink());
    assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "keep me");

    // Removing again is a no-op.
    assert!(JunctionLink.remove(&live).is_ok());
}

#[test]
fn test_clear_path_handles_every_kind() {
    let tmp = tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let target = root.join("target");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("keep.txt"), "keep").unwrap();

    let link = root.join("link");
    JunctionLink.create(&target, &link).unwrap();
    assert!(clear_path(&JunctionLink, &link));
    assert!(target.join("keep.txt").exists());

    let dir = root.join("dir");
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("nested").join("f"), "x").unwrap();
    assert!(clear_path(&JunctionLink, &dir));
    assert!(!dir.exists());

    let file = root.join("file.txt");
    fs::write(&file, "x").unwrap();
    assert!(clear_path(&JunctionLink, &file));
    assert!(!file.exists());

    assert!(clear_path(&JunctionLink, &root.join("ghost")));
}
