//! Data logger
//!
//! Owns the storage driver, the clock, the shared scratch buffer and at most
//! one open log session. Every write is synced to the medium before it
//! returns, so a power cut loses at most the record in flight.
//!
//! Writes issued while no session is open are accepted and dropped: they
//! return `Ok(0)` without touching storage.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::clock::{self, Clock, Platform};
use crate::config::LoggerConfig;
use crate::error::{ConfigError, LogError};
use crate::format::LogFormat;
use crate::header::TimestampHeader;
use crate::naming;
use crate::reading::SensorReading;
use crate::record::BinaryRecord;
use crate::scratch::ScratchBuffer;
use crate::storage::{LogFile, OpenMode, Storage};
use crate::text::{CsvFormatter, DefaultCsvFormatter};

/// An open log file
#[derive(Debug)]
pub struct LogSession<F> {
    file: F,
    path: String,
    format: LogFormat,
    time_header: Option<TimestampHeader>,
    bytes_written: u64,
}

impl<F: LogFile> LogSession<F> {
    fn new(file: F, path: String, format: LogFormat) -> Self {
        Self {
            file,
            path,
            format,
            time_header: None,
            bytes_written: 0,
        }
    }

    /// Full path of the log file
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Format records are written in
    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Timestamp header written at the top of the file, if a clock was running
    pub fn time_header(&self) -> Option<TimestampHeader> {
        self.time_header
    }

    /// Bytes accepted by the medium so far, header included
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Check whether the file is still open
    pub fn is_open(&self) -> bool {
        self.file.is_open()
    }
}

/// Writes sensor readings to a removable storage medium
pub struct DataLogger<S: Storage, C: Clock, P: Platform> {
    storage: S,
    clock: C,
    platform: P,
    config: LoggerConfig,
    scratch: ScratchBuffer,
    formatter: Box<dyn CsvFormatter>,
    session: Option<LogSession<S::File>>,
}

impl<S: Storage, C: Clock, P: Platform> DataLogger<S, C, P> {
    /// Create a logger. No storage access happens until a session begins.
    pub fn new(storage: S, clock: C, platform: P, config: LoggerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            storage,
            clock,
            platform,
            scratch: ScratchBuffer::new(config.scratch_capacity),
            config,
            formatter: Box::new(DefaultCsvFormatter),
            session: None,
        })
    }

    /// Replace the CSV line formatter
    pub fn with_formatter<T: CsvFormatter + 'static>(mut self, formatter: T) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Get the storage driver
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get the shared scratch buffer
    pub fn scratch(&self) -> &ScratchBuffer {
        &self.scratch
    }

    /// Get the shared scratch buffer for staging output
    pub fn scratch_mut(&mut self) -> &mut ScratchBuffer {
        &mut self.scratch
    }

    /// Set the real-time clock
    pub fn set_clock(&mut self, time: DateTime<Utc>) {
        clock::set_rtc(&mut self.clock, time);
    }

    /// Check if a log file is open
    pub fn is_open(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_open())
    }

    /// Get the current session
    pub fn session(&self) -> Option<&LogSession<S::File>> {
        self.session.as_ref()
    }

    /// Detach the current session, leaving the logger closed
    pub fn end_session(&mut self) -> Option<LogSession<S::File>> {
        self.session.take()
    }

    /// Start logging to a new file.
    ///
    /// Brings up storage behind `selector`, makes sure the root directory
    /// exists and opens the first free `<prefix><n>.<ext>` in it. If the
    /// clock is running a timestamp header is written before anything else.
    /// Any session already open is abandoned first, so on failure the logger
    /// is left closed.
    pub fn begin_session(
        &mut self,
        selector: u8,
        name_prefix: &str,
        format: LogFormat,
    ) -> Result<&LogSession<S::File>, LogError> {
        if let Some(previous) = self.session.take() {
            debug!("Abandoning log session {}", previous.path);
        }

        let session = self
            .open_session(selector, name_prefix, format)
            .inspect_err(|e| error!("Failed to begin log session: {}", e))?;
        info!("Logging {:?} to {}", format, session.path);
        self.session = Some(session);

        match self.write_timestamp_header() {
            Ok(0) => debug!("No running RTC, timestamps are relative only"),
            Ok(n) => debug!("Wrote {} byte timestamp header", n),
            Err(e) => warn!("Failed to write timestamp header: {}", e),
        }

        if !self.is_open() {
            let path = self.session.take().map(|s| s.path).unwrap_or_default();
            error!("Log file {} closed during setup", path);
            return Err(LogError::FileOpen {
                path,
                reason: "file closed during setup".to_string(),
            });
        }
        self.session.as_ref().ok_or_else(|| LogError::FileOpen {
            path: name_prefix.to_string(),
            reason: "no session".to_string(),
        })
    }

    fn open_session(
        &mut self,
        selector: u8,
        name_prefix: &str,
        format: LogFormat,
    ) -> Result<LogSession<S::File>, LogError> {
        self.clock.begin();

        let free = self.platform.free_memory();
        if free < self.config.min_free_memory {
            return Err(LogError::InsufficientMemory {
                free,
                required: self.config.min_free_memory,
            });
        }

        self.storage
            .init(selector)
            .map_err(|e| LogError::StorageInit(e.to_string()))?;

        let root = self.config.root_dir.as_str();
        if !self.storage.exists(root) {
            debug!("Creating {}", root);
            self.storage
                .mkdir(root)
                .map_err(|e| LogError::DirectoryCreate {
                    path: root.to_string(),
                    reason: e.to_string(),
                })?;
        }

        let path = naming::allocate(&mut self.storage, root, name_prefix, format)?;
        let file = self
            .storage
            .open(&path, OpenMode::Append)
            .map_err(|e| LogError::FileOpen {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if !file.is_open() {
            return Err(LogError::FileOpen {
                path,
                reason: "driver returned a closed handle".to_string(),
            });
        }

        Ok(LogSession::new(file, path, format))
    }

    /// Write the clock correlation header in the session's format.
    ///
    /// Writes nothing when the clock is stopped.
    fn write_timestamp_header(&mut self) -> Result<usize, LogError> {
        let Some(format) = self.session.as_ref().map(|s| s.format) else {
            return Ok(0);
        };
        if !self.clock.is_running() {
            return Ok(0);
        }

        let epoch_seconds = clock::epoch_seconds(self.clock.now());
        let header = TimestampHeader::new(epoch_seconds, self.platform.millis());

        let written = match format {
            LogFormat::Csv => {
                self.scratch.clear();
                write!(self.scratch, "{}", header)?;
                self.write_scratch(self.scratch.len())?
            }
            LogFormat::Binary => self.write_bytes(&header.to_bytes())?,
        };

        if let Some(session) = self.session.as_mut() {
            session.time_header = Some(header);
        }
        Ok(written)
    }

    /// Write a caller-owned buffer.
    ///
    /// At most `scratch capacity - 1` bytes are written. Returns the count the
    /// medium accepted, which may be short.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<usize, LogError> {
        let Some(session) = self.session.as_mut().filter(|s| s.is_open()) else {
            return Ok(0);
        };
        let len = data.len().min(self.scratch.max_write());
        commit(session, &data[..len], self.scratch.as_bytes_mut())
    }

    /// Write the first `len` bytes of the scratch buffer.
    ///
    /// The driver reuses the scratch region as its cache, so the bytes are
    /// copied out before the write starts.
    pub fn write_scratch(&mut self, len: usize) -> Result<usize, LogError> {
        let Some(session) = self.session.as_mut().filter(|s| s.is_open()) else {
            return Ok(0);
        };
        let len = len.min(self.scratch.max_write());

        let mut copy = Vec::new();
        copy.try_reserve_exact(len)
            .map_err(|_| LogError::ScratchCopy { len })?;
        copy.extend_from_slice(&self.scratch.as_bytes()[..len]);

        commit(session, &copy, self.scratch.as_bytes_mut())
    }

    /// Write text
    pub fn write_str(&mut self, text: &str) -> Result<usize, LogError> {
        self.write_bytes(text.as_bytes())
    }

    /// Write one reading as a CSV line
    pub fn log_text<R: Into<SensorReading>>(
        &mut self,
        sensor_name: &str,
        reading: R,
    ) -> Result<usize, LogError> {
        if !self.is_open() {
            return Ok(0);
        }
        let reading = reading.into();
        self.scratch.clear();
        self.formatter
            .format(sensor_name, &reading, &mut self.scratch)?;
        self.write_scratch(self.scratch.len())
    }

    /// Write one reading as a binary record
    pub fn log_binary<R: Into<SensorReading>>(
        &mut self,
        sensor_id: u8,
        reading: R,
    ) -> Result<usize, LogError> {
        let record = BinaryRecord::from_reading(sensor_id, &reading.into());
        self.write_record(&record)
    }

    /// Write an already built binary record
    pub fn write_record(&mut self, record: &BinaryRecord) -> Result<usize, LogError> {
        let encoded = record.encode();
        self.write_bytes(encoded.as_bytes())
    }
}

fn commit<F: LogFile>(
    session: &mut LogSession<F>,
    data: &[u8],
    cache: &mut [u8],
) -> Result<usize, LogError> {
    let written = session.file.write(data, cache)?;
    session.file.sync()?;
    session.bytes_written += written as u64;

    if written < data.len() {
        warn!(
            "Short write to {}: {} of {} bytes",
            session.path,
            written,
            data.len()
        );
    }
    Ok(written)
}
