use std::fs;
use std::time::Duration;
use storefront_domain::settings::LoggingSettings;
use storefront_logger::Logger;
use tempfile::tempdir;

#[test]
fn settings_with_directory_write_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");
    let settings = LoggingSettings {
        level: "debug".into(),
        console: false,
        directory: Some(log_dir.clone()),
        json: true,
        filter: None,
    };

    let logger = Logger::from_settings("integration-file-logging", &settings)?;
    assert!(logger.writes_file(), "file logging should own a worker");

    tracing::info!(product_id = 7, "hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let content = fs::read_to_string(&log_file)?;
    assert!(content.contains("hello from integration test"));
    assert!(content.lines().next().is_some_and(|line| line.starts_with('{')), "log lines should be JSON");

    Ok(())
}
