//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sensorlog_core::prelude::*;

/// Epoch seconds the mock RTC reports
pub const RTC_EPOCH: u32 = 1_417_600_000;

/// Millisecond counter value the mock board reports
pub const BOARD_MILLIS: u32 = 4_242;

/// RTC that reports a fixed time
pub struct MockClock {
    pub running: bool,
    pub now: DateTime<Utc>,
    pub begun: bool,
}

impl MockClock {
    pub fn running() -> Self {
        Self {
            running: true,
            now: Utc.timestamp_opt(i64::from(RTC_EPOCH), 0).unwrap(),
            begun: false,
        }
    }

    pub fn stopped() -> Self {
        Self {
            running: false,
            ..Self::running()
        }
    }
}

impl Clock for MockClock {
    fn begin(&mut self) {
        self.begun = true;
    }

    fn is_running(&mut self) -> bool {
        self.running
    }

    fn now(&mut self) -> DateTime<Utc> {
        self.now
    }

    fn adjust(&mut self, time: DateTime<Utc>) {
        self.now = time;
        self.running = true;
    }
}

/// Board with a fixed millisecond counter and configurable free RAM
pub struct MockBoard {
    pub free: usize,
}

impl Platform for MockBoard {
    fn millis(&self) -> u32 {
        BOARD_MILLIS
    }

    fn free_memory(&self) -> usize {
        self.free
    }
}

pub type TestLogger = DataLogger<MemoryStorage, MockClock, MockBoard>;

pub fn logger_with(storage: &MemoryStorage, clock: MockClock) -> TestLogger {
    DataLogger::new(
        storage.clone(),
        clock,
        MockBoard { free: 1024 },
        LoggerConfig::default(),
    )
    .expect("default config is valid")
}
