//! Host directory storage
//!
//! Maps the card's absolute paths onto a directory of the host file system,
//! so `/data/temp0.csv` lands at `<root>/data/temp0.csv`. Useful for
//! simulating a device on a workstation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{LogFile, OpenMode, Storage};

/// Storage backed by a host directory
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Use `root` as the top of the simulated card
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Host path for a card path
    pub fn host_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for DirStorage {
    type File = DirFile;

    fn init(&mut self, _selector: u8) -> io::Result<()> {
        let meta = fs::metadata(&self.root)?;
        if !meta.is_dir() {
            return Err(io::Error::other(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }

    fn exists(&mut self, path: &str) -> bool {
        self.host_path(path).exists()
    }

    fn mkdir(&mut self, path: &str) -> io::Result<()> {
        fs::create_dir(self.host_path(path))
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> io::Result<DirFile> {
        let file = match mode {
            OpenMode::Append => OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.host_path(path))?,
        };
        Ok(DirFile { file })
    }
}

/// Open file under a [`DirStorage`] root
#[derive(Debug)]
pub struct DirFile {
    file: File,
}

impl LogFile for DirFile {
    fn write(&mut self, data: &[u8], _cache: &mut [u8]) -> io::Result<usize> {
        self.file.write(data)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn is_open(&self) -> bool {
        true
    }
}
