//! Log file decoding
//!
//! Reads back files produced by the logger once they are off the card.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::DecodeError;
use crate::format::LogFormat;
use crate::header::{TimestampHeader, BINARY_HEADER_SIZE};
use crate::record::{BinaryRecord, SensorKind};

/// A decoded binary log file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryLog {
    /// Clock correlation, present when the device had a running RTC
    pub time_header: Option<TimestampHeader>,
    /// Records in file order
    pub records: Vec<BinaryRecord>,
}

impl BinaryLog {
    /// Decode a complete binary log.
    ///
    /// A truncated trailing record (power lost mid-write) is an error; the
    /// records before it can be recovered with [`parse_lossy`](Self::parse_lossy).
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let (log, error) = Self::parse_prefix(data);
        match error {
            Some(err) => Err(err),
            None => Ok(log),
        }
    }

    /// Decode as many records as possible, stopping at the first bad one
    pub fn parse_lossy(data: &[u8]) -> Self {
        Self::parse_prefix(data).0
    }

    fn parse_prefix(data: &[u8]) -> (Self, Option<DecodeError>) {
        let mut log = Self::default();
        let mut offset = 0;

        if TimestampHeader::is_header(data) {
            match TimestampHeader::decode(data) {
                Ok(header) => {
                    log.time_header = Some(header);
                    offset = BINARY_HEADER_SIZE;
                }
                Err(e) => return (log, Some(e)),
            }
        }

        while offset < data.len() {
            match BinaryRecord::decode(&data[offset..]) {
                Ok((record, size)) => {
                    log.records.push(record);
                    offset += size;
                }
                Err(e) => return (log, Some(e)),
            }
        }

        (log, None)
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records from one sensor
    pub fn records_for(
        &self,
        kind: SensorKind,
        sensor_id: u8,
    ) -> impl Iterator<Item = &BinaryRecord> {
        self.records
            .iter()
            .filter(move |r| r.kind() == kind && r.header.sensor_id == sensor_id)
    }

    /// Records with timestamps in `[start, end]` milliseconds
    pub fn records_in_range(&self, start: u32, end: u32) -> impl Iterator<Item = &BinaryRecord> {
        self.records
            .iter()
            .filter(move |r| r.header.timestamp >= start && r.header.timestamp <= end)
    }

    /// Wall-clock time of a record, if the log has a timestamp header
    pub fn wall_clock(&self, record: &BinaryRecord) -> Option<DateTime<Utc>> {
        self.time_header
            .map(|header| header.wall_clock(record.header.timestamp))
    }
}

/// Timestamp header from the first line of a CSV log, if there is one
pub fn csv_time_header(contents: &str) -> Option<TimestampHeader> {
    let first = contents.lines().next()?;
    TimestampHeader::parse_text(first).ok()
}

/// Timestamp header of a log file, decoded according to its extension
pub fn time_header(path: &Path, contents: &[u8]) -> Option<TimestampHeader> {
    let format = LogFormat::from_extension(path)?;
    if format.is_text() {
        let first = contents.split(|&b| b == b'\n').next()?;
        csv_time_header(std::str::from_utf8(first).ok()?)
    } else {
        TimestampHeader::decode(contents).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{Acceleration, Luminosity};

    fn sample() -> Vec<u8> {
        let mut data = TimestampHeader::new(1_000_000, 100).to_bytes().to_vec();
        let accel = Acceleration {
            timestamp: 150,
            x: 0.1,
            y: 0.2,
            z: 9.8,
        };
        data.extend_from_slice(BinaryRecord::acceleration(1, &accel).encode().as_bytes());
        let lux = Luminosity {
            timestamp: 1100,
            lux: 350.0,
        };
        data.extend_from_slice(BinaryRecord::luminosity(2, &lux).encode().as_bytes());
        data
    }

    #[test]
    fn test_parse_with_header() {
        let log = BinaryLog::parse(&sample()).unwrap();
        assert_eq!(log.time_header, Some(TimestampHeader::new(1_000_000, 100)));
        assert_eq!(log.len(), 2);
        assert_eq!(log.records[1].kind(), SensorKind::Luminosity);

        let when = log.wall_clock(&log.records[1]).unwrap();
        assert_eq!(when.timestamp(), 1_000_001);
    }

    #[test]
    fn test_parse_without_header() {
        let data = sample();
        let log = BinaryLog::parse(&data[BINARY_HEADER_SIZE..]).unwrap();
        assert_eq!(log.time_header, None);
        assert_eq!(log.len(), 2);
        assert!(log.wall_clock(&log.records[0]).is_none());
    }

    #[test]
    fn test_truncated_tail() {
        let data = sample();
        let cut = &data[..data.len() - 3];
        assert!(BinaryLog::parse(cut).is_err());

        let log = BinaryLog::parse_lossy(cut);
        assert_eq!(log.len(), 1);
        assert_eq!(log.records[0].kind(), SensorKind::Acceleration);
    }

    #[test]
    fn test_filters() {
        let log = BinaryLog::parse(&sample()).unwrap();
        assert_eq!(log.records_for(SensorKind::Acceleration, 1).count(), 1);
        assert_eq!(log.records_for(SensorKind::Acceleration, 2).count(), 0);
        assert_eq!(log.records_in_range(0, 1000).count(), 1);
    }

    #[test]
    fn test_wall_clock_for_early_record() {
        let mut data = TimestampHeader::new(1_000_000, 3_000).to_bytes().to_vec();
        let lux = Luminosity {
            timestamp: 1_000,
            lux: 20.0,
        };
        data.extend_from_slice(BinaryRecord::luminosity(1, &lux).encode().as_bytes());

        let log = BinaryLog::parse(&data).unwrap();
        let when = log.wall_clock(&log.records[0]).unwrap();
        assert_eq!(when.timestamp(), 999_998);
    }

    #[test]
    fn test_time_header_by_extension() {
        let expected = Some(TimestampHeader::new(1_000_000, 100));
        assert_eq!(time_header(Path::new("/data/imu0.bin"), &sample()), expected);
        assert_eq!(
            time_header(Path::new("/data/imu0.CSV"), b"time: 1000000 at 100\n5,imu,1\n"),
            expected
        );
        assert_eq!(time_header(Path::new("/data/imu0.csv"), &sample()), None);
        assert_eq!(time_header(Path::new("/data/imu0.txt"), &sample()), None);
    }

    #[test]
    fn test_csv_time_header() {
        let contents = "time: 1417600000 at 42\n10,temp,21.5\n";
        assert_eq!(
            csv_time_header(contents),
            Some(TimestampHeader::new(1_417_600_000, 42))
        );
        assert_eq!(csv_time_header("10,temp,21.5\n"), None);
        assert_eq!(csv_time_header(""), None);
    }
}
