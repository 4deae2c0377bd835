use std::fs;

use geometry_cometry::config::*;
use geometry_cometry::error::GameError;

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geocom.json");

    let mut config = Config::default();
    config.effects = false;
    config.register_highscore("ada", 1200);
    config.save(&path).expect("save");

    let loaded = Config::load(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn missing_keys_take_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geocom.json");
    fs::write(&path, r#"{ "conf_version": 2, "sound": false }"#).expect("write");

    let loaded = Config::load(&path).expect("load");
    assert!(!loaded.sound);
    assert!(loaded.effects);
    assert!(loaded.highscores.is_empty());
}

#[test]
fn other_version_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geocom.json");
    fs::write(&path, r#"{ "conf_version": 1 }"#).expect("write");

    match Config::load(&path) {
        Err(GameError::ConfigVersion { found, expected }) => {
            assert_eq!(found, 1);
            assert_eq!(expected, CONF_VERSION);
        }
        other => panic!("expected a version error, got {other:?}"),
    }
    // The fallback path swallows it.
    assert_eq!(Config::load_or_default(&path), Config::default());
}

#[test]
fn garbage_is_a_format_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geocom.json");
    fs::write(&path, "not json").expect("write");
    assert!(matches!(Config::load(&path), Err(GameError::ConfigFormat(_))));
}

#[test]
fn absent_file_gives_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nothing-here.json");
    assert!(matches!(Config::load(&path), Err(GameError::Io(_))));
    assert_eq!(Config::load_or_default(&path), Config::default());
}

#[test]
fn highscore_table_is_capped_and_sorted() {
    let mut config = Config::default();
    for score in 1..=12u32 {
        config.register_highscore(&format!("p{score}"), score * 10);
    }
    assert_eq!(config.highscores.len(), HIGHSCORES_AMOUNT);
    assert_eq!(config.best(), 120);
    assert_eq!(config.highscores.last().map(|(_, s)| *s), Some(30));
    assert!(config.highscores.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn ties_keep_the_earlier_name_first() {
    let mut config = Config::default();
    config.register_highscore("first", 500);
    config.register_highscore("second", 500);
    assert_eq!(config.highscores[0].0, "first");
    assert_eq!(config.highscores[1].0, "second");
}

#[test]
fn long_names_are_truncated() {
    let mut config = Config::default();
    config.register_highscore(&"x".repeat(40), 10);
    assert_eq!(config.highscores[0].0.chars().count(), MAX_NAME_LEN);
}

#[test]
fn is_highscore_only_when_it_beats_the_table() {
    let mut config = Config::default();
    assert!(config.is_highscore(0));
    for _ in 0..HIGHSCORES_AMOUNT {
        config.register_highscore("bot", 100);
    }
    assert!(!config.is_highscore(100));
    assert!(config.is_highscore(101));
}

#[test]
fn settings_follow_config() {
    let mut config = Config::default();
    config.debug = true;
    config.effects = false;
    let settings = config.settings();
    assert!(settings.debug);
    assert!(!settings.effects);
}
