//! Config loading tests

use std::fs;

use tempfile::TempDir;

use super::*;

fn write(
    dir: &TempDir,
    name: &str,
    content: &str,
) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults_when_nothing_found() {
    let dir = TempDir::new().unwrap();
    let loaded = load_from(None, dir.path(), None).unwrap();
    assert_eq!(loaded.source, None);
    assert_eq!(loaded.config, EngineConfig::default());
    assert_eq!(loaded.config.log.level, LogLevel::Info);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    write(&dir, PROJECT_CONFIG_FILE, "(attach: (report_conflicts: true))");
    let loaded = load_from(None, dir.path(), None).unwrap();
    assert!(loaded.config.attach.report_conflicts);
    assert!(!loaded.config.attach.report_unmet_requirements);
    assert_eq!(loaded.config.log, LogConfig::default());
    assert_eq!(loaded.source, Some(dir.path().join(PROJECT_CONFIG_FILE)));
}

#[test]
fn test_priority_explicit_then_project_then_user() {
    let dir = TempDir::new().unwrap();
    let user = write(&dir, "user.ron", "(log: (level: error))");
    let explicit = write(&dir, "explicit.ron", "(log: (level: trace))");

    let loaded = load_from(None, dir.path(), Some(user.clone())).unwrap();
    assert_eq!(loaded.config.log.level, LogLevel::Error);

    write(&dir, PROJECT_CONFIG_FILE, "(log: (level: warn))");
    let loaded = load_from(None, dir.path(), Some(user.clone())).unwrap();
    assert_eq!(loaded.config.log.level, LogLevel::Warn);

    let loaded = load_from(Some(&explicit), dir.path(), Some(user)).unwrap();
    assert_eq!(loaded.config.log.level, LogLevel::Trace);
    assert_eq!(loaded.source, Some(explicit));
}

#[test]
fn test_missing_explicit_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.ron");
    assert!(matches!(
        load_from(Some(&missing), dir.path(), None),
        Err(ConfigError::NotFound(path)) if path == missing
    ));
}

#[test]
fn test_parse_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.ron", "(log: (level: shouting))");
    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.ron"));
}

#[test]
fn test_env_override() {
    let mut config = EngineConfig::default();
    apply_env_override(&mut config, None).unwrap();
    assert_eq!(config.log.level, LogLevel::Info);

    apply_env_override(&mut config, Some("debug".to_string())).unwrap();
    assert_eq!(config.log.level, LogLevel::Debug);

    let err = apply_env_override(&mut config, Some("loud".to_string())).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnv { var: LOG_ENV_VAR, .. }));
    assert_eq!(config.log.level, LogLevel::Debug);
}

#[test]
fn test_ron_rendering_parses_back() {
    let mut config = EngineConfig::default();
    config.attach.report_unmet_requirements = true;
    config.log.ansi = true;
    let text = config.to_ron().unwrap();
    let parsed: EngineConfig = ron::from_str(&text).unwrap();
    assert_eq!(parsed, config);
    assert_eq!(
        parsed.attach_options(),
        AttachOptions {
            report_conflicts: false,
            report_unmet_requirements: true,
        }
    );
}
