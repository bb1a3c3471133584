//! # SensorLog Core Library
//!
//! Persistent logging of sensor readings on small devices with a removable
//! storage card and an optional battery-backed real-time clock.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Log sessions with 8.3 file name allocation under a fixed directory
//! - CSV and packed binary record output, synced after every write
//! - A shared scratch buffer that is safe to reuse as the storage cache
//! - RTC timestamp headers tying relative timestamps to wall-clock time
//! - Decoding of binary logs
//!
//! ## Example
//!
//! ```rust,ignore
//! use sensorlog_core::prelude::*;
//!
//! let mut logger = DataLogger::new(storage, clock, platform, LoggerConfig::default())?;
//! logger.begin_session(10, "accel", LogFormat::Binary)?;
//!
//! let reading = Acceleration { timestamp: platform.millis(), x: 0.0, y: 0.0, z: 9.81 };
//! logger.log_binary(1, reading)?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod header;
pub mod logger;
pub mod naming;
pub mod reader;
pub mod reading;
pub mod record;
pub mod scratch;
pub mod storage;
pub mod text;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::{Clock, HostPlatform, NoClock, Platform, SystemClock};
    pub use crate::config::LoggerConfig;
    pub use crate::error::{ConfigError, DecodeError, LogError};
    pub use crate::format::LogFormat;
    pub use crate::header::TimestampHeader;
    pub use crate::logger::{DataLogger, LogSession};
    pub use crate::reader::BinaryLog;
    pub use crate::reading::{
        Acceleration, Gyro, Luminosity, Magnetic, Orientation, Pressure, SensorReading,
        Temperature, UvLight,
    };
    pub use crate::record::{BinaryRecord, SensorKind};
    pub use crate::storage::{DirStorage, LogFile, MemoryStorage, Storage};
    pub use crate::text::{CsvFormatter, DefaultCsvFormatter};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
