//! Timestamp header
//!
//! Written once at the top of a log file when a running RTC is found. It pins
//! the device millisecond counter to wall-clock time so relative record
//! timestamps can be converted afterwards.
//!
//! Text form: `time: <epoch seconds> at <millis>\n`
//!
//! Binary form (10 bytes, little-endian):
//! - 2 bytes: sentinel `0xFF 0xFF`
//! - 4 bytes: epoch seconds (u32)
//! - 4 bytes: millis (u32)

use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DecodeError;

/// Marker distinguishing the header from a sensor record
pub const SENTINEL: u16 = 0xFFFF;

/// Size of the binary header
pub const BINARY_HEADER_SIZE: usize = 10;

/// Longest possible text header, "time: 4294967295 at 4294967295\n"
pub const MAX_TEXT_HEADER_LEN: usize = 31;

const TEXT_PREFIX: &str = "time: ";
const TEXT_SEPARATOR: &str = " at ";

/// Correlation between wall-clock time and the device millisecond counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampHeader {
    /// Seconds since the Unix epoch
    pub epoch_seconds: u32,
    /// Device milliseconds at the same instant
    pub millis: u32,
}

impl TimestampHeader {
    /// Create a header
    pub fn new(epoch_seconds: u32, millis: u32) -> Self {
        Self {
            epoch_seconds,
            millis,
        }
    }

    /// Encode the binary form
    pub fn to_bytes(&self) -> [u8; BINARY_HEADER_SIZE] {
        let mut bytes = [0u8; BINARY_HEADER_SIZE];
        LittleEndian::write_u16(&mut bytes[0..2], SENTINEL);
        LittleEndian::write_u32(&mut bytes[2..6], self.epoch_seconds);
        LittleEndian::write_u32(&mut bytes[6..10], self.millis);
        bytes
    }

    /// Check whether `data` starts with the header sentinel
    pub fn is_header(data: &[u8]) -> bool {
        data.len() >= 2 && LittleEndian::read_u16(&data[0..2]) == SENTINEL
    }

    /// Decode the binary form from the start of `data`
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < BINARY_HEADER_SIZE {
            return Err(DecodeError::Truncated {
                needed: BINARY_HEADER_SIZE,
                available: data.len(),
            });
        }
        if !Self::is_header(data) {
            return Err(DecodeError::UnknownKind(data[0]));
        }
        Ok(Self {
            epoch_seconds: LittleEndian::read_u32(&data[2..6]),
            millis: LittleEndian::read_u32(&data[6..10]),
        })
    }

    /// Parse the text form. The trailing newline is optional.
    pub fn parse_text(line: &str) -> Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidTextHeader(line.to_string());

        let rest = line
            .trim_end_matches(['\r', '\n'])
            .strip_prefix(TEXT_PREFIX)
            .ok_or_else(invalid)?;
        let (seconds, millis) = rest.split_once(TEXT_SEPARATOR).ok_or_else(invalid)?;

        Ok(Self {
            epoch_seconds: seconds.parse().map_err(|_| invalid())?,
            millis: millis.parse().map_err(|_| invalid())?,
        })
    }

    /// Convert a record timestamp taken in the same session to wall-clock time
    pub fn wall_clock(&self, millis: u32) -> DateTime<Utc> {
        // Signed: readings may predate the header, and the counter may wrap after it.
        let delta = millis.wrapping_sub(self.millis) as i32;
        let base = DateTime::<Utc>::from_timestamp(i64::from(self.epoch_seconds), 0)
            .unwrap_or_default();
        base + chrono::Duration::milliseconds(i64::from(delta))
    }
}

impl fmt::Display for TimestampHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}{}{}{}",
            TEXT_PREFIX, self.epoch_seconds, TEXT_SEPARATOR, self.millis
        )
    }
}
