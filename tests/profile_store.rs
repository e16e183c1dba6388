mod common;

use common::{default_registry, seed_live_session, setup_test_env};
use session_keeper_lib::core::archive::ZipProfileArchive;
use session_keeper_lib::models::error::SError;
use session_keeper_lib::models::profile::Affinity;
use std::fs;

#[test]
fn test_save_then_list_reports_affinity() {
    let env = setup_test_env();
    let h = default_registry(&env);
    seed_live_session(env.live_root(), "alice");

    h.registry.profiles.save("X", Affinity::Lol).unwrap();

    let listed = h.registry.profiles.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "X");
    assert_eq!(listed[0].affinity, Affinity::Lol);
    assert!(listed[0].icon.is_none());

    let stored = h.registry.profiles.profile_dir("X").join("Config").join("owner.txt");
    assert_eq!(fs::read_to_string(stored).unwrap(), "alice");
}

#[cfg(feature = "image-codec")]
#[test]
fn test_set_icon_is_reported_by_list() {
    let env = setup_test_env();
    let h = default_registry(&env);
    h.registry.profiles.save("X", Affinity::Valorant).unwrap();

    let source = env.paths.app.profiles.parent().unwrap().join("avatar.png");
    image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 30, 30, 255]))
        .save(&source)
        .unwrap();

    h.registry.profiles.set_icon("X", &source).unwrap();
    let icon = h.registry.profiles.get("X").unwrap().icon.expect("icon set");
    assert!(icon.ends_with("icon.png"));
    assert!(image::open(&icon).is_ok());

    h.registry.profiles.remove_icon("X").unwrap();
    assert!(h.registry.profiles.list().unwrap()[0].icon.is_none());
    assert!(matches!(
        h.registry.profiles.remove_icon("X"),
        Err(SError::IconMissing(_))
    ));
}

#[test]
fn test_set_icon_missing_source() {
    let env = setup_test_env();
    let h = default_registry(&env);
    h.registry.profiles.save("X", Affinity::Valorant).unwrap();

    let missing = env.paths.app.profiles.join("nope.png");
    assert!(matches!(
        h.registry.profiles.set_icon("X", &missing),
        Err(SError::IconSourceMissing(_))
    ));
}

#[test]
fn test_rename_onto_existing_fails_and_changes_nothing() {
    let env = setup_test_env();
    let h = default_registry(&env);
    let store = &h.registry.profiles;

    seed_live_session(env.live_root(), "one");
    store.save("n1", Affinity::Valorant).unwrap();
    seed_live_session(env.live_root(), "two");
    store.save("n2", Affinity::Lol).unwrap();

    assert!(matches!(store.rename("n1", "n2"), Err(SError::NameCollision(_))));
    // Case-folded collision is rejected too.
    assert!(matches!(store.rename("n1", "N2"), Err(SError::NameCollision(_))));

    assert_eq!(store.names().unwrap(), vec!["n1", "n2"]);
    assert_eq!(store.affinity("n1").unwrap(), Affinity::Valorant);
    assert_eq!(store.affinity("n2").unwrap(), Affinity::Lol);
    let owner = store.profile_dir("n1").join("Data").join("owner.txt");
    assert_eq!(fs::read_to_string(owner).unwrap(), "one");
}

#[test]
fn test_case_only_rename() {
    let env = setup_test_env();
    let h = default_registry(&env);
    let store = &h.registry.profiles;

    store.save("main", Affinity::Both).unwrap();
    store.rename("main", "Main").unwrap();

    assert_eq!(store.names().unwrap(), vec!["Main"]);
    assert_eq!(store.affinity("Main").unwrap(), Affinity::Both);
}

#[test]
fn test_save_rejects_differently_cased_duplicate() {
    let env = setup_test_env();
    let h = default_registry(&env);

    h.registry.profiles.save("Main", Affinity::Valorant).unwrap();
    let err = h.registry.profiles.save("MAIN", Affinity::Valorant).unwrap_err();
    assert!(matches!(err, SError::NameCollision(ref n) if n == "Main"));

    // Same name overwrites.
    seed_live_session(env.live_root(), "newer");
    h.registry.profiles.save("Main", Affinity::Lol).unwrap();
    assert_eq!(h.registry.profiles.affinity("Main").unwrap(), Affinity::Lol);
}

#[test]
fn test_invalid_names_rejected() {
    let env = setup_test_env();
    let h = default_registry(&env);

    for name in ["", " ", ".", "..", "a/b", "a\\b", "what?", "trailing ", "dot."] {
        assert!(
            matches!(
                h.registry.profiles.save(name, Affinity::Valorant),
                Err(SError::InvalidProfileName(_))
            ),
            "{name:?} should be rejected"
        );
    }
    assert!(h.registry.profiles.names().unwrap().is_empty());
}

#[test]
fn test_delete_twice() {
    let env = setup_test_env();
    let h = default_registry(&env);
    h.registry.profiles.save("X", Affinity::Valorant).unwrap();

    h.registry.profiles.delete("X").unwrap();
    assert!(!h.registry.profiles.exists("X"));

    let second = h.registry.profiles.delete("X");
    assert!(matches!(second, Err(SError::ProfileNotFound(_))));
    assert!(h.registry.profiles.names().unwrap().is_empty());
}

#[test]
fn test_set_affinity_on_missing_profile_fails() {
    let env = setup_test_env();
    let h = default_registry(&env);
    assert!(matches!(
        h.registry.profiles.set_affinity("ghost", Affinity::Lol),
        Err(SError::ProfileNotFound(_))
    ));
}

#[test]
fn test_backup_and_restore() {
    let env = setup_test_env();
    let h = default_registry(&env);
    let store = &h.registry.profiles;

    seed_live_session(env.live_root(), "alice");
    store.save("alice", Affinity::Lol).unwrap();

    let backup_dir = env.paths.app.profiles.parent().unwrap().join("backups");
    let archive = h.registry.backup_profiles(&backup_dir).unwrap();
    assert!(archive.is_file());
    assert!(archive.file_name().unwrap().starts_with("GameAccountBackup_"));

    store.delete("alice").unwrap();
    store.save("bob", Affinity::Valorant).unwrap();

    store.restore(&ZipProfileArchive, &archive).unwrap();
    assert_eq!(store.names().unwrap(), vec!["alice"]);
    assert_eq!(store.affinity("alice").unwrap(), Affinity::Lol);
    let owner = store.profile_dir("alice").join("Logs").join("owner.txt");
    assert_eq!(fs::read_to_string(owner).unwrap(), "alice");
}

#[test]
fn test_corrupt_backup_leaves_profiles_untouched() {
    let env = setup_test_env();
    let h = default_registry(&env);
    let store = &h.registry.profiles;

    seed_live_session(env.live_root(), "alice");
    store.save("alice", Affinity::Lol).unwrap();

    let bogus = env.paths.app.profiles.parent().unwrap().join("bogus.zip");
    fs::write(&bogus, "not a zip archive").unwrap();

    assert!(store.restore(&ZipProfileArchive, &bogus).is_err());
    assert_eq!(store.names().unwrap(), vec!["alice"]);
    assert_eq!(store.affinity("alice").unwrap(), Affinity::Lol);
    let owner = store.profile_dir("alice").join("Config").join("owner.txt");
    assert_eq!(fs::read_to_string(owner).unwrap(), "alice");

    // No staging directories are left behind.
    let leftovers: Vec<_> = fs::read_dir(env.paths.app.profiles.parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(".profiles."))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_mutations_use_the_stored_name() {
    let env = setup_test_env();
    let h = default_registry(&env);
    let store = &h.registry.profiles;
    h.registry
        .config
        .lock()
        .update(|c| c.output_dir = Some(env.paths.app.profiles.parent().unwrap().join("menu")))
        .unwrap();
    store.save("Main", Affinity::Valorant).unwrap();
    store.save("Alt", Affinity::Valorant).unwrap();
    store.set_affinity("main", Affinity::Lol).unwrap();
    assert_eq!(store.get("MAIN").unwrap().name, "Main");
    assert!(store.exists("main"));

    store.rename("alt", "Second").unwrap();
    store.delete("main").unwrap();

    assert_eq!(store.names().unwrap(), vec!["Second"]);
    let order = h.registry.config.lock().load().ordered_accounts.clone();
    assert_eq!(order, vec!["Second"]);
}
