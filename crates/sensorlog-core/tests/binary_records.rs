//! Binary records decode back to exactly what was logged

mod common;

use common::*;
use pretty_assertions::assert_eq;
use sensorlog_core::prelude::*;
use sensorlog_core::record::{Payload, SCALAR_RECORD_SIZE, VECTOR_RECORD_SIZE};

fn one_of_each() -> Vec<SensorReading> {
    vec![
        Acceleration { timestamp: 10, x: 0.25, y: -9.81, z: 1e-3 }.into(),
        Magnetic { timestamp: 20, x: 22.0, y: -4.5, z: 41.125 }.into(),
        Gyro { timestamp: 30, x: f32::MIN_POSITIVE, y: 0.0, z: -0.0 }.into(),
        Orientation { timestamp: 40, roll: 12.5, pitch: -80.0, heading: 359.99 }.into(),
        Temperature { timestamp: 50, t: -40.0 }.into(),
        Luminosity { timestamp: 60, lux: 120_000.0 }.into(),
        UvLight { timestamp: 70, uv_index: 11.0 }.into(),
        Pressure { timestamp: u32::MAX, pressure: 1013.25 }.into(),
    ]
}

#[test]
fn test_every_kind_decodes_exactly() {
    for (id, reading) in one_of_each().iter().enumerate() {
        let record = BinaryRecord::from_reading(id as u8, reading);
        let encoded = record.encode();
        let (decoded, used) = BinaryRecord::decode(encoded.as_bytes()).unwrap();

        assert_eq!(used, encoded.as_bytes().len());
        assert_eq!(decoded.kind(), reading.kind());
        assert_eq!(decoded.header.sensor_id, id as u8);
        assert_eq!(decoded.header.timestamp, reading.timestamp());
        assert_eq!(decoded, record);
    }
}

#[test]
fn test_record_sizes() {
    for reading in one_of_each() {
        let size = BinaryRecord::from_reading(0, &reading).encode().as_bytes().len();
        let expected = if reading.values().len() == 3 {
            VECTOR_RECORD_SIZE
        } else {
            SCALAR_RECORD_SIZE
        };
        assert_eq!(size, expected, "{:?}", reading.kind());
    }
}

#[test]
fn test_payload_copied_verbatim() {
    let reading = Orientation { timestamp: 1, roll: 0.1, pitch: 0.2, heading: 0.3 };
    let record = BinaryRecord::orientation(4, &reading);
    match record.payload {
        Payload::Orientation(a) => {
            assert_eq!(a.roll.to_bits(), 0.1f32.to_bits());
            assert_eq!(a.pitch.to_bits(), 0.2f32.to_bits());
            assert_eq!(a.heading.to_bits(), 0.3f32.to_bits());
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_logged_file_decodes() {
    let storage = MemoryStorage::new();
    let mut logger = logger_with(&storage, MockClock::running());
    logger.begin_session(10, "all", LogFormat::Binary).unwrap();

    let readings = one_of_each();
    for (id, reading) in readings.iter().enumerate() {
        logger.log_binary(id as u8, *reading).unwrap();
    }

    let log = BinaryLog::parse(&storage.file("/data/all0.bin").unwrap()).unwrap();
    assert_eq!(log.time_header, Some(TimestampHeader::new(RTC_EPOCH, BOARD_MILLIS)));
    assert_eq!(log.len(), readings.len());
    for (record, reading) in log.records.iter().zip(&readings) {
        assert_eq!(record.kind(), reading.kind());
        assert_eq!(record.header.timestamp, reading.timestamp());
    }
}
