use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use medgraph_core::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_DATABASE, DEFAULT_NAMESPACE, ENV_BATCH_SIZE, ENV_DATABASE, ENV_ENDPOINT, ENV_INPUT,
    ENV_PASSWORD, ENV_USER,
};
use medgraph_core::{Config, ConfigError, ConfigOverrides};
use tempfile::TempDir;

/// Serialises tests that touch the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Sets environment variables and clears every `MEDGRAPH_*` variable on drop.
struct EnvGuard {
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn set(vars: &[(&str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        for (name, value) in vars {
            std::env::set_var(name, value);
        }
        Self { _lock: lock }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear_env();
    }
}

fn clear_env() {
    for name in [ENV_ENDPOINT, ENV_USER, ENV_PASSWORD, ENV_DATABASE, ENV_INPUT, ENV_BATCH_SIZE] {
        std::env::remove_var(name);
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("medgraph.json");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_from_file_key_aliases() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{"website": "bolt://localhost:7687", "user": "neo4j", "password": "secret", "dbname": "medical"}"#,
    );

    let config = Config::from_file(&path).unwrap();
    let settings = config.connection().unwrap();
    assert_eq!(settings.endpoint, "bolt://localhost:7687");
    assert_eq!(settings.username, "neo4j");
    assert_eq!(settings.password, "secret");
    assert_eq!(settings.database, "medical");
    assert_eq!(settings.namespace, DEFAULT_NAMESPACE);
}

#[test]
fn test_from_file_partial_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"endpoint": "ws://localhost:8000", "batch_size": 500}"#);

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.batch_size, 500);
    assert_eq!(config.database, DEFAULT_DATABASE);
    assert!(matches!(config.connection(), Err(ConfigError::Missing("username"))));
}

#[test]
fn test_command_line_completes_file_settings() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"endpoint": "bolt://db:7687", "user": "neo4j"}"#);

    let config = Config::from_file(&path).unwrap().with_overrides(ConfigOverrides {
        password: Some("from-cli".to_string()),
        database: Some("cli-db".to_string()),
        ..Default::default()
    });

    let settings = config.connection().unwrap();
    assert_eq!(settings.endpoint, "bolt://db:7687");
    assert_eq!(settings.password, "from-cli");
    assert_eq!(settings.database, "cli-db");
}

#[test]
fn test_invalid_json_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "{ endpoint = 'bolt://x' }");
    assert!(matches!(Config::from_file(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{"endpoint": "bolt://file:7687", "user": "file-user", "password": "file-pw", "batch_size": 10}"#,
    );
    let _env = EnvGuard::set(&[
        (ENV_ENDPOINT, "ws://env:8000"),
        (ENV_DATABASE, "env-db"),
        (ENV_INPUT, "env/records.json"),
        (ENV_BATCH_SIZE, "20"),
    ]);

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.endpoint.as_deref(), Some("ws://env:8000"));
    assert_eq!(config.username.as_deref(), Some("file-user"));
    assert_eq!(config.database, "env-db");
    assert_eq!(config.input, PathBuf::from("env/records.json"));
    assert_eq!(config.batch_size, 20);
}

#[test]
fn test_command_line_overrides_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"user": "file-user", "password": "file-pw"}"#);
    let _env = EnvGuard::set(&[(ENV_ENDPOINT, "ws://env:8000"), (ENV_USER, "env-user")]);

    let config = Config::load(Some(&path)).unwrap().with_overrides(ConfigOverrides {
        endpoint: Some("bolt://cli:7687".to_string()),
        ..Default::default()
    });

    let settings = config.connection().unwrap();
    assert_eq!(settings.endpoint, "bolt://cli:7687");
    assert_eq!(settings.username, "env-user");
    assert_eq!(settings.password, "file-pw");
}

#[test]
fn test_unparsable_batch_size_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"batch_size": 10}"#);
    let _env = EnvGuard::set(&[(ENV_BATCH_SIZE, "lots")]);

    match Config::load(Some(&path)) {
        Err(ConfigError::Invalid(message)) => assert!(message.contains(ENV_BATCH_SIZE)),
        other => panic!("expected invalid configuration, got {:?}", other),
    }
}

#[test]
fn test_explicit_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");
    match Config::load(Some(&missing)) {
        Err(ConfigError::ReadError { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected read error, got {:?}", other),
    }
}

#[test]
fn test_default_config_round_trips_through_json() {
    let text = Config::default_config_string();
    let config: Config = serde_json::from_str(&text).unwrap();
    assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    assert!(config.password.is_none());
}
