mod common;

use common::{default_registry, setup_test_env, write_settings_file};
use session_keeper_lib::models::error::SError;
use session_keeper_lib::models::graphics::DisplayMode;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;

#[test]
fn test_apply_graphics_settings_persists_then_patches() {
    let env = setup_test_env();
    let h = default_registry(&env);
    let engine = write_settings_file(
        env.valorant_config(),
        "acc",
        "GameUserSettings.ini",
        "sg.ShadowQuality=0\nHDRDisplayOutputNits=1000\nFullscreenMode=2\n",
    );

    let mut settings = h.registry.graphics_settings().unwrap();
    assert_eq!(settings.quality["sg.ShadowQuality"], 0);

    settings.display_mode = DisplayMode::Fullscreen;
    settings.quality.insert("sg.ShadowQuality".into(), 2);
    let ui = BTreeMap::from([("show_game_icons".to_string(), Value::Bool(false))]);

    let patched = h.registry.apply_graphics_settings(settings.clone(), Some(ui)).unwrap();
    assert_eq!(patched, vec![engine.clone()]);
    assert_eq!(
        fs::read_to_string(engine).unwrap(),
        "sg.ShadowQuality=2\nHDRDisplayOutputNits=1000\n"
    );

    let saved = h.registry.config.lock().load().clone();
    assert_eq!(saved.graphics_settings, Some(settings));
    assert!(!saved.show_game_icons());
}

#[test]
fn test_set_client_path_rejects_missing_file() {
    let env = setup_test_env();
    let h = default_registry(&env);
    let missing = env.client_exe.with_file_name("missing.exe");

    assert!(matches!(
        h.registry.set_client_path(&missing),
        Err(SError::ClientNotFound(_))
    ));
    let saved = h.registry.config.lock().load().riot_client_exe_path.clone();
    assert_eq!(saved, Some(env.client_exe.clone()));
}
