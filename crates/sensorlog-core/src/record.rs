//! Binary record encoding/decoding
//!
//! Every record is packed and little-endian:
//! - 1 byte: sensor kind (0-7, see [`SensorKind`])
//! - 1 byte: sensor id
//! - 4 bytes: timestamp (device milliseconds, u32)
//! - 4 or 12 bytes: payload, one f32 per field
//!
//! Vector kinds (acceleration, magnetic, gyro, orientation) are 18 bytes,
//! scalar kinds (temperature, luminosity, UV, pressure) are 10 bytes. The
//! first byte of a record is always below 8, which keeps it distinct from
//! the `0xFF 0xFF` timestamp header.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::reading::{
    Acceleration, Gyro, Luminosity, Magnetic, Orientation, Pressure, SensorReading, Temperature,
    UvLight,
};

/// Size of the header shared by every record
pub const HEADER_SIZE: usize = 6;

/// Size of a record with three payload fields
pub const VECTOR_RECORD_SIZE: usize = HEADER_SIZE + 12;

/// Size of a record with one payload field
pub const SCALAR_RECORD_SIZE: usize = HEADER_SIZE + 4;

/// Largest record this module produces
pub const MAX_RECORD_SIZE: usize = VECTOR_RECORD_SIZE;

/// Sensor kind. The discriminants are the on-disk wire values and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SensorKind {
    Acceleration = 0,
    Magnetic = 1,
    Gyro = 2,
    Orientation = 3,
    Temperature = 4,
    Luminosity = 5,
    UltravioletLight = 6,
    Pressure = 7,
}

impl SensorKind {
    /// All kinds in wire order
    pub const ALL: [SensorKind; 8] = [
        SensorKind::Acceleration,
        SensorKind::Magnetic,
        SensorKind::Gyro,
        SensorKind::Orientation,
        SensorKind::Temperature,
        SensorKind::Luminosity,
        SensorKind::UltravioletLight,
        SensorKind::Pressure,
    ];

    /// Number of f32 payload fields
    pub fn field_count(&self) -> usize {
        match self {
            SensorKind::Acceleration
            | SensorKind::Magnetic
            | SensorKind::Gyro
            | SensorKind::Orientation => 3,
            _ => 1,
        }
    }

    /// Encoded record size for this kind
    pub fn record_size(&self) -> usize {
        HEADER_SIZE + 4 * self.field_count()
    }

    /// Short lowercase name, as used in CSV lines
    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Acceleration => "acceleration",
            SensorKind::Magnetic => "magnetic",
            SensorKind::Gyro => "gyro",
            SensorKind::Orientation => "orientation",
            SensorKind::Temperature => "temperature",
            SensorKind::Luminosity => "luminosity",
            SensorKind::UltravioletLight => "uv",
            SensorKind::Pressure => "pressure",
        }
    }
}

impl From<SensorKind> for u8 {
    fn from(kind: SensorKind) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for SensorKind {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SensorKind::ALL
            .get(value as usize)
            .copied()
            .ok_or(DecodeError::UnknownKind(value))
    }
}

/// Fields shared by every record besides the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader {
    /// Caller-assigned id distinguishing sensors of the same kind
    pub sensor_id: u8,
    /// Device milliseconds, copied from the reading
    pub timestamp: u32,
}

/// Three-axis payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Attitude payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub heading: f32,
}

/// Kind-specific part of a record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Acceleration(Vector3),
    Magnetic(Vector3),
    Gyro(Vector3),
    Orientation(Attitude),
    Temperature(f32),
    Luminosity(f32),
    UltravioletLight(f32),
    Pressure(f32),
}

impl Payload {
    /// The sensor kind this payload belongs to
    pub fn kind(&self) -> SensorKind {
        match self {
            Payload::Acceleration(_) => SensorKind::Acceleration,
            Payload::Magnetic(_) => SensorKind::Magnetic,
            Payload::Gyro(_) => SensorKind::Gyro,
            Payload::Orientation(_) => SensorKind::Orientation,
            Payload::Temperature(_) => SensorKind::Temperature,
            Payload::Luminosity(_) => SensorKind::Luminosity,
            Payload::UltravioletLight(_) => SensorKind::UltravioletLight,
            Payload::Pressure(_) => SensorKind::Pressure,
        }
    }

    fn fields(&self) -> ([f32; 3], usize) {
        match *self {
            Payload::Acceleration(v) | Payload::Magnetic(v) | Payload::Gyro(v) => {
                ([v.x, v.y, v.z], 3)
            }
            Payload::Orientation(a) => ([a.roll, a.pitch, a.heading], 3),
            Payload::Temperature(f)
            | Payload::Luminosity(f)
            | Payload::UltravioletLight(f)
            | Payload::Pressure(f) => ([f, 0.0, 0.0], 1),
        }
    }

    fn from_fields(kind: SensorKind, f: [f32; 3]) -> Self {
        let v = Vector3 { x: f[0], y: f[1], z: f[2] };
        match kind {
            SensorKind::Acceleration => Payload::Acceleration(v),
            SensorKind::Magnetic => Payload::Magnetic(v),
            SensorKind::Gyro => Payload::Gyro(v),
            SensorKind::Orientation => Payload::Orientation(Attitude {
                roll: f[0],
                pitch: f[1],
                heading: f[2],
            }),
            SensorKind::Temperature => Payload::Temperature(f[0]),
            SensorKind::Luminosity => Payload::Luminosity(f[0]),
            SensorKind::UltravioletLight => Payload::UltravioletLight(f[0]),
            SensorKind::Pressure => Payload::Pressure(f[0]),
        }
    }
}

/// One binary sensor record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryRecord {
    pub header: RecordHeader,
    pub payload: Payload,
}

/// An encoded record, held on the stack
#[derive(Debug, Clone, Copy)]
pub struct EncodedRecord {
    bytes: [u8; MAX_RECORD_SIZE],
    len: usize,
}

impl EncodedRecord {
    /// The encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl BinaryRecord {
    fn with_header(sensor_id: u8, timestamp: u32, payload: Payload) -> Self {
        Self {
            header: RecordHeader {
                sensor_id,
                timestamp,
            },
            payload,
        }
    }

    /// Record an acceleration reading
    pub fn acceleration(sensor_id: u8, r: &Acceleration) -> Self {
        let v = Vector3 { x: r.x, y: r.y, z: r.z };
        Self::with_header(sensor_id, r.timestamp, Payload::Acceleration(v))
    }

    /// Record a magnetic reading
    pub fn magnetic(sensor_id: u8, r: &Magnetic) -> Self {
        let v = Vector3 { x: r.x, y: r.y, z: r.z };
        Self::with_header(sensor_id, r.timestamp, Payload::Magnetic(v))
    }

    /// Record a gyro reading
    pub fn gyro(sensor_id: u8, r: &Gyro) -> Self {
        let v = Vector3 { x: r.x, y: r.y, z: r.z };
        Self::with_header(sensor_id, r.timestamp, Payload::Gyro(v))
    }

    /// Record an orientation reading
    pub fn orientation(sensor_id: u8, r: &Orientation) -> Self {
        let a = Attitude {
            roll: r.roll,
            pitch: r.pitch,
            heading: r.heading,
        };
        Self::with_header(sensor_id, r.timestamp, Payload::Orientation(a))
    }

    /// Record a temperature reading
    pub fn temperature(sensor_id: u8, r: &Temperature) -> Self {
        Self::with_header(sensor_id, r.timestamp, Payload::Temperature(r.t))
    }

    /// Record a luminosity reading
    pub fn luminosity(sensor_id: u8, r: &Luminosity) -> Self {
        Self::with_header(sensor_id, r.timestamp, Payload::Luminosity(r.lux))
    }

    /// Record a UV light reading
    pub fn uv_light(sensor_id: u8, r: &UvLight) -> Self {
        Self::with_header(sensor_id, r.timestamp, Payload::UltravioletLight(r.uv_index))
    }

    /// Record a pressure reading
    pub fn pressure(sensor_id: u8, r: &Pressure) -> Self {
        Self::with_header(sensor_id, r.timestamp, Payload::Pressure(r.pressure))
    }

    /// Record a reading of any kind
    pub fn from_reading(sensor_id: u8, reading: &SensorReading) -> Self {
        match reading {
            SensorReading::Acceleration(r) => Self::acceleration(sensor_id, r),
            SensorReading::Magnetic(r) => Self::magnetic(sensor_id, r),
            SensorReading::Gyro(r) => Self::gyro(sensor_id, r),
            SensorReading::Orientation(r) => Self::orientation(sensor_id, r),
            SensorReading::Temperature(r) => Self::temperature(sensor_id, r),
            SensorReading::Luminosity(r) => Self::luminosity(sensor_id, r),
            SensorReading::UvLight(r) => Self::uv_light(sensor_id, r),
            SensorReading::Pressure(r) => Self::pressure(sensor_id, r),
        }
    }

    /// The sensor kind of this record
    pub fn kind(&self) -> SensorKind {
        self.payload.kind()
    }

    /// Encoded size in bytes
    pub fn encoded_size(&self) -> usize {
        self.kind().record_size()
    }

    /// Encode the record
    pub fn encode(&self) -> EncodedRecord {
        let mut bytes = [0u8; MAX_RECORD_SIZE];
        bytes[0] = self.kind().into();
        bytes[1] = self.header.sensor_id;
        LittleEndian::write_u32(&mut bytes[2..6], self.header.timestamp);

        let (fields, count) = self.payload.fields();
        for (i, value) in fields.iter().take(count).enumerate() {
            let at = HEADER_SIZE + 4 * i;
            LittleEndian::write_f32(&mut bytes[at..at + 4], *value);
        }

        EncodedRecord {
            bytes,
            len: self.encoded_size(),
        }
    }

    /// Decode one record from the start of `data`.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let Some(&kind_byte) = data.first() else {
            return Err(DecodeError::Truncated {
                needed: HEADER_SIZE,
                available: 0,
            });
        };
        let kind = SensorKind::try_from(kind_byte)?;
        let size = kind.record_size();
        if data.len() < size {
            return Err(DecodeError::Truncated {
                needed: size,
                available: data.len(),
            });
        }

        let header = RecordHeader {
            sensor_id: data[1],
            timestamp: LittleEndian::read_u32(&data[2..6]),
        };

        let mut fields = [0.0f32; 3];
        for (i, field) in fields.iter_mut().take(kind.field_count()).enumerate() {
            let at = HEADER_SIZE + 4 * i;
            *field = LittleEndian::read_f32(&data[at..at + 4]);
        }

        let record = Self {
            header,
            payload: Payload::from_fields(kind, fields),
        };
        Ok((record, size))
    }
}
