//! Sensor readings
//!
//! One type per sensor kind, as handed over by the acquisition layer. Every
//! reading carries the device millisecond counter at which it was sampled.

use serde::{Deserialize, Serialize};

use crate::record::SensorKind;

/// Linear acceleration in m/s^2
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Acceleration {
    pub timestamp: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Magnetic field strength in micro-Tesla
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Magnetic {
    pub timestamp: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Angular rate in rad/s
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gyro {
    pub timestamp: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Attitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub timestamp: u32,
    pub roll: f32,
    pub pitch: f32,
    pub heading: f32,
}

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Temperature {
    pub timestamp: u32,
    pub t: f32,
}

/// Illuminance in lux
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Luminosity {
    pub timestamp: u32,
    pub lux: f32,
}

/// Ultraviolet index
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UvLight {
    pub timestamp: u32,
    pub uv_index: f32,
}

/// Barometric pressure in hPa
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pressure {
    pub timestamp: u32,
    pub pressure: f32,
}

/// A reading of any kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SensorReading {
    Acceleration(Acceleration),
    Magnetic(Magnetic),
    Gyro(Gyro),
    Orientation(Orientation),
    Temperature(Temperature),
    Luminosity(Luminosity),
    UvLight(UvLight),
    Pressure(Pressure),
}

impl SensorReading {
    /// The sensor kind of this reading
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorReading::Acceleration(_) => SensorKind::Acceleration,
            SensorReading::Magnetic(_) => SensorKind::Magnetic,
            SensorReading::Gyro(_) => SensorKind::Gyro,
            SensorReading::Orientation(_) => SensorKind::Orientation,
            SensorReading::Temperature(_) => SensorKind::Temperature,
            SensorReading::Luminosity(_) => SensorKind::Luminosity,
            SensorReading::UvLight(_) => SensorKind::UltravioletLight,
            SensorReading::Pressure(_) => SensorKind::Pressure,
        }
    }

    /// Millisecond counter value at which the reading was sampled
    pub fn timestamp(&self) -> u32 {
        match self {
            SensorReading::Acceleration(r) => r.timestamp,
            SensorReading::Magnetic(r) => r.timestamp,
            SensorReading::Gyro(r) => r.timestamp,
            SensorReading::Orientation(r) => r.timestamp,
            SensorReading::Temperature(r) => r.timestamp,
            SensorReading::Luminosity(r) => r.timestamp,
            SensorReading::UvLight(r) => r.timestamp,
            SensorReading::Pressure(r) => r.timestamp,
        }
    }

    /// Measured values in on-disk field order
    pub fn values(&self) -> Vec<f32> {
        match self {
            SensorReading::Acceleration(r) => vec![r.x, r.y, r.z],
            SensorReading::Magnetic(r) => vec![r.x, r.y, r.z],
            SensorReading::Gyro(r) => vec![r.x, r.y, r.z],
            SensorReading::Orientation(r) => vec![r.roll, r.pitch, r.heading],
            SensorReading::Temperature(r) => vec![r.t],
            SensorReading::Luminosity(r) => vec![r.lux],
            SensorReading::UvLight(r) => vec![r.uv_index],
            SensorReading::Pressure(r) => vec![r.pressure],
        }
    }
}

macro_rules! impl_from_reading {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for SensorReading {
                fn from(reading: $variant) -> Self {
                    SensorReading::$variant(reading)
                }
            }
        )*
    };
}

impl_from_reading!(Acceleration, Magnetic, Gyro, Orientation, Temperature, Luminosity, UvLight, Pressure);
