//! In-memory storage volume
//!
//! Behaves like a freshly formatted card. Clones share the same volume, so a
//! test can hand one clone to the logger and inspect files through another.
//! Faults can be injected to exercise the logger's failure paths.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::rc::Rc;

use super::{LogFile, OpenMode, Storage};

/// Byte pattern written over the cache when clobbering is enabled
pub const CLOBBER_BYTE: u8 = 0xA5;

#[derive(Debug, Default)]
struct Volume {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    initialized: bool,
    init_error: Option<String>,
    mkdir_error: Option<String>,
    write_limit: Option<usize>,
    write_failures: usize,
    clobber_cache: bool,
    operations: usize,
    syncs: usize,
}

/// Shared in-memory volume
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    volume: Rc<RefCell<Volume>>,
}

impl MemoryStorage {
    /// Create an empty volume
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `init` fail with the given diagnostic
    pub fn fail_init(&self, message: &str) {
        self.volume.borrow_mut().init_error = Some(message.to_string());
    }

    /// Make `mkdir` fail with the given diagnostic
    pub fn fail_mkdir(&self, message: &str) {
        self.volume.borrow_mut().mkdir_error = Some(message.to_string());
    }

    /// Accept at most `limit` bytes per write call
    pub fn limit_writes(&self, limit: usize) {
        self.volume.borrow_mut().write_limit = Some(limit);
    }

    /// Make the next `count` write calls fail without touching the file
    pub fn fail_writes(&self, count: usize) {
        self.volume.borrow_mut().write_failures = count;
    }

    /// Overwrite the whole cache region on every write, as a block driver
    /// reusing its cache would
    pub fn clobber_cache(&self, enabled: bool) {
        self.volume.borrow_mut().clobber_cache = enabled;
    }

    /// Pre-create a file with the given contents
    pub fn insert_file(&self, path: &str, contents: &[u8]) {
        self.volume
            .borrow_mut()
            .files
            .insert(path.to_string(), contents.to_vec());
    }

    /// Pre-create a directory
    pub fn insert_dir(&self, path: &str) {
        self.volume.borrow_mut().dirs.insert(path.to_string());
    }

    /// Contents of a file, if it exists
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.volume.borrow().files.get(path).cloned()
    }

    /// All file paths, sorted
    pub fn file_names(&self) -> Vec<String> {
        self.volume.borrow().files.keys().cloned().collect()
    }

    /// Check whether a directory exists
    pub fn has_dir(&self, path: &str) -> bool {
        self.volume.borrow().dirs.contains(path)
    }

    /// Number of driver calls made so far (init, exists, mkdir, open, write, sync)
    pub fn operations(&self) -> usize {
        self.volume.borrow().operations
    }

    /// Number of sync calls made so far
    pub fn syncs(&self) -> usize {
        self.volume.borrow().syncs
    }
}

impl Storage for MemoryStorage {
    type File = MemoryFile;

    fn init(&mut self, _selector: u8) -> io::Result<()> {
        let mut volume = self.volume.borrow_mut();
        volume.operations += 1;
        if let Some(message) = &volume.init_error {
            return Err(io::Error::new(io::ErrorKind::NotFound, message.clone()));
        }
        volume.initialized = true;
        Ok(())
    }

    fn exists(&mut self, path: &str) -> bool {
        let mut volume = self.volume.borrow_mut();
        volume.operations += 1;
        volume.files.contains_key(path) || volume.dirs.contains(path)
    }

    fn mkdir(&mut self, path: &str) -> io::Result<()> {
        let mut volume = self.volume.borrow_mut();
        volume.operations += 1;
        if let Some(message) = &volume.mkdir_error {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, message.clone()));
        }
        volume.dirs.insert(path.to_string());
        Ok(())
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> io::Result<MemoryFile> {
        let mut volume = self.volume.borrow_mut();
        volume.operations += 1;
        if !volume.initialized {
            return Err(io::Error::other("volume not initialized"));
        }
        match mode {
            OpenMode::Append => {
                volume.files.entry(path.to_string()).or_default();
            }
        }
        Ok(MemoryFile {
            volume: Rc::clone(&self.volume),
            path: path.to_string(),
        })
    }
}

/// Open file on a [`MemoryStorage`] volume
#[derive(Debug)]
pub struct MemoryFile {
    volume: Rc<RefCell<Volume>>,
    path: String,
}

impl LogFile for MemoryFile {
    fn write(&mut self, data: &[u8], cache: &mut [u8]) -> io::Result<usize> {
        let mut volume = self.volume.borrow_mut();
        volume.operations += 1;
        if volume.clobber_cache {
            cache.fill(CLOBBER_BYTE);
        }
        if volume.write_failures > 0 {
            volume.write_failures -= 1;
            return Err(io::Error::other("write error"));
        }
        let n = volume.write_limit.map_or(data.len(), |limit| data.len().min(limit));
        let file = volume
            .files
            .get_mut(&self.path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, self.path.clone()))?;
        file.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn sync(&mut self) -> io::Result<()> {
        let mut volume = self.volume.borrow_mut();
        volume.operations += 1;
        volume.syncs += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.volume.borrow().files.contains_key(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_requires_init() {
        let mut storage = MemoryStorage::new();
        assert!(storage.open("/a.csv", OpenMode::Append).is_err());

        storage.init(10).unwrap();
        let file = storage.open("/a.csv", OpenMode::Append).unwrap();
        assert!(file.is_open());
        assert!(storage.exists("/a.csv"));
    }

    #[test]
    fn test_write_appends_and_clobbers() {
        let mut storage = MemoryStorage::new();
        storage.insert_file("/a.bin", b"xy");
        storage.init(0).unwrap();
        storage.clobber_cache(true);

        let mut cache = [0u8; 4];
        let mut file = storage.open("/a.bin", OpenMode::Append).unwrap();
        assert_eq!(file.write(b"z", &mut cache).unwrap(), 1);
        assert_eq!(storage.file("/a.bin").unwrap(), b"xyz");
        assert_eq!(cache, [CLOBBER_BYTE; 4]);
    }

    #[test]
    fn test_write_limit() {
        let mut storage = MemoryStorage::new();
        storage.init(0).unwrap();
        storage.limit_writes(2);

        let mut file = storage.open("/a.bin", OpenMode::Append).unwrap();
        assert_eq!(file.write(b"abcd", &mut []).unwrap(), 2);
        assert_eq!(storage.file("/a.bin").unwrap(), b"ab");
    }

    #[test]
    fn test_failed_writes_recover() {
        let mut storage = MemoryStorage::new();
        storage.init(0).unwrap();
        storage.fail_writes(1);

        let mut file = storage.open("/a.bin", OpenMode::Append).unwrap();
        assert!(file.write(b"ab", &mut []).is_err());
        assert_eq!(file.write(b"cd", &mut []).unwrap(), 2);
        assert_eq!(storage.file("/a.bin").unwrap(), b"cd");
    }

    #[test]
    fn test_injected_failures() {
        let mut storage = MemoryStorage::new();
        storage.fail_init("card not present");
        storage.fail_mkdir("read-only");

        let err = storage.init(4).unwrap_err();
        assert_eq!(err.to_string(), "card not present");
        assert!(storage.mkdir("/data").is_err());
        assert_eq!(storage.operations(), 2);
    }
}
