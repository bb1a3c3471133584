//! Block storage driver interface
//!
//! The logger only needs a handful of primitives from the card driver:
//! initialize the medium, test for a path, create a directory and open a
//! file for appending. Implementations for hosts and tests live in the
//! submodules.

pub mod dir;
pub mod memory;

pub use dir::DirStorage;
pub use memory::MemoryStorage;

use std::io;

/// How a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create if missing, append to the end
    Append,
}

/// A storage medium holding a file system
pub trait Storage {
    /// Handle to an open file
    type File: LogFile;

    /// Bring up the medium behind the given selector (chip-select pin, slot).
    ///
    /// On failure the error carries the driver's own diagnostic.
    fn init(&mut self, selector: u8) -> io::Result<()>;

    /// Check whether a file or directory exists
    fn exists(&mut self, path: &str) -> bool;

    /// Create a directory
    fn mkdir(&mut self, path: &str) -> io::Result<()>;

    /// Open a file
    fn open(&mut self, path: &str, mode: OpenMode) -> io::Result<Self::File>;
}

/// An open file on a [`Storage`] medium
pub trait LogFile {
    /// Write bytes, returning how many the medium accepted.
    ///
    /// `cache` is the shared scratch region; the driver may use and overwrite
    /// it before `data` is physically committed. `data` never borrows from it.
    fn write(&mut self, data: &[u8], cache: &mut [u8]) -> io::Result<usize>;

    /// Flush everything written so far to the medium
    fn sync(&mut self) -> io::Result<()>;

    /// Check whether the handle still refers to an open file
    fn is_open(&self) -> bool;
}
