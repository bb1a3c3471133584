//! Real-time clock and platform probes
//!
//! A battery-backed RTC is optional. When it is absent or stopped, log files
//! carry relative millisecond timestamps only.

use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::info;

/// Driver for a real-time clock chip
pub trait Clock {
    /// Bring up the clock's bus
    fn begin(&mut self);

    /// Check whether the oscillator is running (the clock has been set)
    fn is_running(&mut self) -> bool;

    /// Current wall-clock time
    fn now(&mut self) -> DateTime<Utc>;

    /// Set the clock
    fn adjust(&mut self, time: DateTime<Utc>);
}

/// Board-level probes the logger needs besides storage and clock
pub trait Platform {
    /// Milliseconds since the device started
    fn millis(&self) -> u32;

    /// Bytes of free RAM
    fn free_memory(&self) -> usize;
}

/// Set the clock to `time`, bringing it up first.
///
/// Run once after fitting a new clock battery; subsequent sessions then
/// pick up wall-clock time automatically.
pub fn set_rtc<C: Clock>(clock: &mut C, time: DateTime<Utc>) {
    clock.begin();
    clock.adjust(time);
    info!("RTC set to {}", time);
}

/// Seconds since the Unix epoch, saturated to the `u32` range used on disk
pub fn epoch_seconds(time: DateTime<Utc>) -> u32 {
    time.timestamp().clamp(0, i64::from(u32::MAX)) as u32
}

/// A board without a clock chip
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl Clock for NoClock {
    fn begin(&mut self) {}

    fn is_running(&mut self) -> bool {
        false
    }

    fn now(&mut self) -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }

    fn adjust(&mut self, _time: DateTime<Utc>) {}
}

/// Clock backed by the host's system time, optionally offset by `adjust`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: chrono::Duration,
}

impl SystemClock {
    /// Create a clock reading the system time
    pub fn new() -> Self {
        Self {
            offset: chrono::Duration::zero(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn begin(&mut self) {}

    fn is_running(&mut self) -> bool {
        true
    }

    fn now(&mut self) -> DateTime<Utc> {
        Utc::now() + self.offset
    }

    fn adjust(&mut self, time: DateTime<Utc>) {
        self.offset = time - Utc::now();
    }
}

/// Platform probes for a hosted build
#[derive(Debug, Clone, Copy)]
pub struct HostPlatform {
    started: Instant,
}

impl HostPlatform {
    /// Start the millisecond counter now
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HostPlatform {
    fn millis(&self) -> u32 {
        // Wraps after ~49 days, like the device counter.
        self.started.elapsed().as_millis() as u32
    }

    fn free_memory(&self) -> usize {
        usize::MAX
    }
}
