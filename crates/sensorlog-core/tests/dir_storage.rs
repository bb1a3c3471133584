//! End-to-end logging onto a host directory

use sensorlog_core::prelude::*;
use sensorlog_core::reader::csv_time_header;
use std::fs;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sensorlog_core=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_csv_session_on_disk() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut logger = DataLogger::new(
        DirStorage::new(dir.path()),
        SystemClock::new(),
        HostPlatform::new(),
        LoggerConfig::default(),
    )
    .unwrap();

    logger.begin_session(0, "weather", LogFormat::Csv).unwrap();
    logger
        .log_text("bmp", Pressure { timestamp: 100, pressure: 1009.5 })
        .unwrap();
    logger
        .log_text("tmp", Temperature { timestamp: 120, t: 18.0 })
        .unwrap();

    let path = dir.path().join("data").join("weather0.csv");
    let contents = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(csv_time_header(&contents).is_some());
    assert_eq!(lines[1], "100,bmp,1009.5");
    assert_eq!(lines[2], "120,tmp,18");
}

#[test]
fn test_binary_session_without_clock() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    fs::write(dir.path().join("data").join("gyro0.bin"), b"").unwrap();

    let mut logger = DataLogger::new(
        DirStorage::new(dir.path()),
        NoClock,
        HostPlatform::new(),
        LoggerConfig::default(),
    )
    .unwrap();

    let session = logger.begin_session(0, "gyro", LogFormat::Binary).unwrap();
    assert!(session.path().ends_with("gyro1.bin"));
    logger
        .log_binary(2, Gyro { timestamp: 7, x: 0.5, y: 0.25, z: -1.0 })
        .unwrap();

    let data = fs::read(dir.path().join("data").join("gyro1.bin")).unwrap();
    let log = BinaryLog::parse(&data).unwrap();
    assert_eq!(log.time_header, None);
    assert_eq!(log.len(), 1);
    assert_eq!(log.records[0].header.sensor_id, 2);
}

#[test]
fn test_missing_card_root() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut logger = DataLogger::new(
        DirStorage::new(dir.path().join("unmounted")),
        NoClock,
        HostPlatform::new(),
        LoggerConfig::default(),
    )
    .unwrap();

    let result = logger.begin_session(0, "x", LogFormat::Csv);
    assert!(matches!(result, Err(LogError::StorageInit(_))));
}
