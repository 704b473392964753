//! Unit tests for `GlobalConfig` parsing and validation.

use std::path::PathBuf;

use todont::config::{GlobalConfig, StorageKind};
use todont::AppError;

#[test]
fn empty_file_uses_defaults() {
    let config = GlobalConfig::from_toml_str("").expect("defaults");
    assert_eq!(config, GlobalConfig::default());
    assert_eq!(config.http_host, "127.0.0.1");
    assert_eq!(config.http_port, 5000);
    assert_eq!(config.storage, StorageKind::Sqlite);
    assert_eq!(config.db_path, PathBuf::from("data").join("todont.db"));
    assert_eq!(config.ids.length, 5);
    assert_eq!(config.ids.max_attempts, 8);
}

#[test]
fn full_file_overrides_every_field() {
    let toml = r#"
http_host = "0.0.0.0"
http_port = 8080
storage = "memory"
db_path = "/var/lib/todont/app.db"

[ids]
length = 7
max_attempts = 3
"#;
    let config = GlobalConfig::from_toml_str(toml).expect("valid");
    assert_eq!(config.bind_address(), "0.0.0.0:8080");
    assert_eq!(config.storage, StorageKind::Memory);
    assert_eq!(config.db_path, PathBuf::from("/var/lib/todont/app.db"));
    assert_eq!(config.ids.length, 7);
    assert_eq!(config.ids.max_attempts, 3);
}

#[test]
fn unknown_storage_kind_is_rejected() {
    let err = GlobalConfig::from_toml_str(r#"storage = "postgres""#).expect_err("bad kind");
    assert!(matches!(err, AppError::Config(_)), "{err}");
}

#[test]
fn id_length_out_of_range_is_rejected() {
    for length in [0, 3, 33] {
        let err = GlobalConfig::from_toml_str(&format!("[ids]\nlength = {length}\n"))
            .expect_err("bad length");
        assert!(err.to_string().contains("ids.length"), "{err}");
    }
}

#[test]
fn zero_attempts_is_rejected() {
    let err = GlobalConfig::from_toml_str("[ids]\nmax_attempts = 0\n").expect_err("zero");
    assert!(err.to_string().contains("max_attempts"), "{err}");
}

#[test]
fn blank_host_is_rejected() {
    let err = GlobalConfig::from_toml_str(r#"http_host = " ""#).expect_err("blank host");
    assert!(matches!(err, AppError::Config(_)), "{err}");
}

#[test]
fn load_from_path_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "http_port = 0\nstorage = \"memory\"\n").expect("write");

    let config = GlobalConfig::load_from_path(&path).expect("load");
    assert_eq!(config.http_port, 0);
    assert_eq!(config.storage, StorageKind::Memory);
}

#[test]
fn load_from_missing_path_is_config_error() {
    let err = GlobalConfig::load_from_path("/definitely/not/here.toml").expect_err("missing");
    assert!(err.to_string().starts_with("config: failed to read config"), "{err}");
}
