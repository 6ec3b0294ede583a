use config::Map;
use sos_kernel::config::{ConfigError, load_config, load_config_with_env};
use sos_kernel::domain::config::SosConfig;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write config file");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let cfg: SosConfig = load_config(Some(dir.path().join("absent.toml"))).expect("defaults");
    assert_eq!(cfg.facilities.radius_meters, 2000);
    assert_eq!(cfg.location.live_fix_timeout_secs, 30);
}

#[test]
fn file_values_override_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "sos.toml",
        r#"
[facilities]
endpoint = "http://127.0.0.1:8080/interpreter"
limit = 3

[dispatch]
escalation = false
"#,
    );
    let cfg: SosConfig = load_config(Some(path)).expect("load");
    assert_eq!(cfg.facilities.endpoint, "http://127.0.0.1:8080/interpreter");
    assert_eq!(cfg.facilities.limit, 3);
    assert_eq!(cfg.facilities.category, "hospital");
    assert!(!cfg.dispatch.escalation);
}

#[test]
fn environment_overrides_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "sos.toml", "[location]\nlive_fix_timeout_secs = 12\n");

    let env = Map::from([
        ("SOS__LOCATION__LIVE_FIX_TIMEOUT_SECS".to_owned(), "4".to_owned()),
        ("SOS__DISPATCH__CONCURRENT_DELIVERY".to_owned(), "false".to_owned()),
    ]);
    let cfg: SosConfig = load_config_with_env(Some(&path), Some(env)).expect("load");
    assert_eq!(cfg.location.live_fix_timeout_secs, 4);
    assert!(!cfg.dispatch.concurrent_delivery);
}

#[test]
fn malformed_values_are_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "sos.toml", "[facilities]\nlimit = \"many\"\n");
    let err = load_config::<SosConfig>(Some(path)).expect_err("bad type");
    assert!(matches!(err, ConfigError::Config { .. }));
    assert_eq!(err.kind(), "config");
}
