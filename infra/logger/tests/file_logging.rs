use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use trellis_logger::Logger;

#[test]
#[serial]
fn json_file_logging_creates_log_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("integration-file-logging")
        .level_name("debug")?
        .console(false)
        .json(true)
        .directory(Some(&log_dir))
        .init()?;
    assert!(logger.has_file_output());

    tracing::info!(route = "/hello/world", "hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents.lines().next().expect("log file should not be empty");
    assert!(line.starts_with('{'), "json output expected, got {line}");
    assert!(line.contains("/hello/world"));

    Ok(())
}
