use serial_test::serial;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr};
use tempfile::{Builder, NamedTempFile};
use trellis_config::{AppConfig, ConfigError, ServerConfig, load_config, load_config_with_env};

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn no_env() -> Vec<(String, String)> {
    Vec::new()
}

#[test]
fn defaults_are_sane() {
    let config = AppConfig::default();
    assert_eq!(config.scan.root, "trellis_demo");
    assert!(!config.scan.strict);
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert!(config.server.context_path.is_empty());
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.console);
    assert!(config.logging.directory.is_none());
}

#[test]
fn socket_addr_combines_address_and_port() {
    let server = ServerConfig { port: 9000, ..ServerConfig::default() };
    assert_eq!(server.socket_addr().to_string(), "127.0.0.1:9000");
}

#[test]
#[serial]
fn file_values_override_defaults() {
    let file = toml_file(
        r#"
        [scan]
        root = "com.demo"
        strict = true

        [server]
        port = 9090
        context_path = "/shop"

        [logging]
        json = true
        "#,
    );

    let config: AppConfig = load_config(Some(file.path())).unwrap();
    assert_eq!(config.scan.root, "com.demo");
    assert!(config.scan.strict);
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.context_path, "/shop");
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn environment_overrides_file() {
    let file = toml_file("[server]\nport = 9090\n");
    let env = [
        ("TRELLIS__SERVER__PORT".to_owned(), "7070".to_owned()),
        ("TRELLIS__SCAN__ROOT".to_owned(), "other_app".to_owned()),
        ("UNRELATED__SERVER__PORT".to_owned(), "1".to_owned()),
    ];

    let config: AppConfig = load_config_with_env(Some(file.path()), env).unwrap();
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.scan.root, "other_app");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config_with_env::<AppConfig, _>(Some(dir.path().join("absent.toml")), no_env());
    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::Config { .. }));
    assert!(err.to_string().starts_with("Config error (Failed to build config)"), "{err}");
}

#[test]
fn invalid_values_fail_deserialization() {
    let file = toml_file("[server]\nport = \"not a port\"\n");
    let err = load_config_with_env::<AppConfig, _>(Some(file.path()), no_env()).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"), "{err}");
}
