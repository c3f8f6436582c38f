use storefront_domain::settings::LoggingSettings;
use storefront_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn init_twice_returns_subscriber_error() {
    let logger = Logger::from_settings("integration-init-twice", &LoggingSettings::default())
        .expect("first init should succeed");
    assert!(!logger.writes_file(), "console-only logger should not start a file worker");

    let err = Logger::builder()
        .name("integration-init-twice-second")
        .level(LevelFilter::INFO)
        .init()
        .expect_err("second init should fail");

    assert!(
        matches!(err, LoggerError::Subscriber { .. }),
        "expected subscriber error for second init"
    );
}
