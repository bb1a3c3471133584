//! CSV line formatting
//!
//! Formatting belongs to the sensor API; the logger only needs something that
//! renders a reading into the scratch buffer as one line.

use std::fmt::{self, Write};

use crate::reading::SensorReading;

/// Renders one reading as a CSV line
pub trait CsvFormatter {
    /// Write a complete line, including its trailing newline, to `out`
    fn format(&self, sensor_name: &str, reading: &SensorReading, out: &mut dyn Write)
        -> fmt::Result;
}

/// `timestamp,name,value[,value...]\n`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCsvFormatter;

impl CsvFormatter for DefaultCsvFormatter {
    fn format(
        &self,
        sensor_name: &str,
        reading: &SensorReading,
        out: &mut dyn Write,
    ) -> fmt::Result {
        write!(out, "{},{}", reading.timestamp(), sensor_name)?;
        for value in reading.values() {
            write!(out, ",{}", value)?;
        }
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{Magnetic, Temperature};

    fn render(reading: SensorReading) -> String {
        let mut line = String::new();
        DefaultCsvFormatter
            .format("probe", &reading, &mut line)
            .unwrap();
        line
    }

    #[test]
    fn test_vector_line() {
        let line = render(
            Magnetic {
                timestamp: 1500,
                x: 12.5,
                y: -3.0,
                z: 0.25,
            }
            .into(),
        );
        assert_eq!(line, "1500,probe,12.5,-3,0.25\n");
    }

    #[test]
    fn test_scalar_line() {
        let line = render(Temperature { timestamp: 20, t: 21.5 }.into());
        assert_eq!(line, "20,probe,21.5\n");
    }
}
