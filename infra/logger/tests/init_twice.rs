use sos_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn init_twice_returns_subscriber_error() {
    let _logger = Logger::builder()
        .name("sos-init-twice")
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");

    let err = Logger::builder()
        .name("sos-init-twice-second")
        .level(LevelFilter::INFO)
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }));
    assert_eq!(err.kind(), "subscriber");
}

#[test]
fn no_outputs_is_rejected_before_install() {
    let err = Logger::builder()
        .name("sos-silent")
        .console(false)
        .init()
        .expect_err("no outputs");
    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
}
