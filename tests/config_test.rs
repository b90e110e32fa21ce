use std::path::PathBuf;
use std::time::Duration;

use trigger_spool::Error;
use trigger_spool::config::{Config, EngineConfig};

// Environment variables are process-wide, so every case runs in one test.
#[test]
fn config_from_env() {
    unsafe {
        std::env::remove_var("SPOOL_TRIGGERS_DIR");
        std::env::remove_var("SPOOL_STEP_TIMEOUT_MS");
    }
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    // An explicit directory makes the variable optional.
    let config = Config::from_env_with_triggers_dir(Some(PathBuf::from("cli-dir"))).unwrap();
    assert_eq!(config.triggers_dir, PathBuf::from("cli-dir"));
    assert_eq!(config.step_timeout, EngineConfig::default().step_timeout);

    unsafe {
        std::env::set_var("SPOOL_TRIGGERS_DIR", "/etc/spool/triggers");
        std::env::set_var("SPOOL_STEP_TIMEOUT_MS", "2500");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.triggers_dir, PathBuf::from("/etc/spool/triggers"));
    assert_eq!(config.engine().step_timeout, Duration::from_millis(2500));
    assert!(!config.log_level.is_empty());

    unsafe {
        std::env::set_var("SPOOL_STEP_TIMEOUT_MS", "soon");
    }
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    unsafe {
        std::env::remove_var("SPOOL_TRIGGERS_DIR");
        std::env::remove_var("SPOOL_STEP_TIMEOUT_MS");
    }
}
