use std::io::Write;
use std::path::PathBuf;
use tripwise_cli::{AppConfig, SessionConfig, build_session_service};

#[test]
fn test_load_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[identity]
app_name = "trips"
user_id = "bob"
session_id = "42"

[model]
name = "gemini-2.5-flash"
base_url = "http://localhost:9999"
timeout_secs = 5
"#
    )
    .unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.identity.app_name, "trips");
    assert_eq!(config.identity.user_id, "bob");
    assert_eq!(config.identity.session_id, "42");
    assert_eq!(config.model.base_url.as_deref(), Some("http://localhost:9999"));
    assert_eq!(config.model.timeout_secs, 5);
    assert_eq!(config.retry.attempts, 5);
    assert!(config.validate().is_ok());
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = AppConfig::load(Some(&missing)).unwrap_err();
    assert!(format!("{err:#}").contains("nope.toml"));
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[retry]\nattempts = \"many\"").unwrap();
    assert!(AppConfig::load(Some(file.path())).is_err());
}

#[test]
fn test_zero_attempts_fail_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[retry]\nattempts = 0").unwrap();
    let config = AppConfig::load(Some(file.path())).unwrap();
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_session_store_path_opens_file_service() {
    let dir = tempfile::tempdir().unwrap();
    let store: PathBuf = dir.path().join("state").join("sessions.json");
    let service = build_session_service(&SessionConfig { store: Some(store.clone()) }).await.unwrap();

    let key = tripwise_session::SessionKey::new("travel_agent", "usertravel1", "1002");
    service.get_or_create(&key).await.unwrap();
    assert!(store.exists());
}
