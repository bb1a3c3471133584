//! Log file formats
//!
//! A session writes either CSV text lines or packed binary records.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported log file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Comma-separated values, one reading per line
    Csv,
    /// Packed binary records
    Binary,
}

impl LogFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "csv" => Some(LogFormat::Csv),
            "bin" => Some(LogFormat::Binary),
            _ => None,
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            LogFormat::Csv => "csv",
            LogFormat::Binary => "bin",
        }
    }

    /// Check whether this format is human-readable text
    pub fn is_text(&self) -> bool {
        matches!(self, LogFormat::Csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            LogFormat::from_extension(Path::new("/data/temp0.csv")),
            Some(LogFormat::Csv)
        );
        assert_eq!(
            LogFormat::from_extension(Path::new("/data/TEMP0.BIN")),
            Some(LogFormat::Binary)
        );
        assert_eq!(LogFormat::from_extension(Path::new("log.txt")), None);
    }

    #[test]
    fn test_extension_roundtrip() {
        for format in [LogFormat::Csv, LogFormat::Binary] {
            let name = format!("x.{}", format.extension());
            assert_eq!(LogFormat::from_extension(Path::new(&name)), Some(format));
        }
    }
}
