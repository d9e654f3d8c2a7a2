use backstage_common::observability::{init_logging, LogConfig, LogFormat};
use tempfile::TempDir;

#[test]
fn init_logging_creates_directory_and_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("logs");

    let config = LogConfig {
        app_name: "backstage-tests",
        log_dir: Some(dir.clone()),
        format: LogFormat::Json,
        default_filter: "debug".to_string(),
        ..LogConfig::default()
    };

    let first = init_logging(config.clone()).expect("logging initialises");
    assert!(dir.is_dir());
    assert!(first.starts_with(&dir));
    assert!(first
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("backstage-tests.log.")));

    tracing::info!(component = "tests", "logging initialised");

    let second = init_logging(config).expect("second call is a no-op");
    assert_eq!(first, second);
}
