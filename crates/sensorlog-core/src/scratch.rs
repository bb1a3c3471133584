//! Shared scratch buffer
//!
//! One reusable byte region sized for the largest line or record. Formatters
//! produce their output into it, and the storage driver uses the same region
//! as its block cache while a write is in progress. Because the driver may
//! overwrite it mid-write, bytes staged here are always copied before they
//! are handed to storage (see [`DataLogger::write_scratch`]).
//!
//! [`DataLogger::write_scratch`]: crate::logger::DataLogger::write_scratch

use std::fmt;

/// Fixed-capacity byte buffer with a fill cursor
pub struct ScratchBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl ScratchBuffer {
    /// Create a zeroed buffer of the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Total size of the region
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Largest span that may be persisted in one write.
    ///
    /// The last byte is reserved so a producer can always terminate its output.
    pub fn max_write(&self) -> usize {
        self.capacity().saturating_sub(1)
    }

    /// Number of bytes staged by the current producer
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reset the fill cursor and zero the region
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.len = 0;
    }

    /// Stage raw bytes, truncating to [`max_write`](Self::max_write).
    ///
    /// Returns the number of bytes staged.
    pub fn stage(&mut self, bytes: &[u8]) -> usize {
        self.clear();
        let n = bytes.len().min(self.max_write());
        self.data[..n].copy_from_slice(&bytes[..n]);
        self.len = n;
        n
    }

    /// The whole region, regardless of the fill cursor
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The whole region, mutably. Handed to the storage driver as its cache.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl fmt::Write for ScratchBuffer {
    /// Appends text, silently truncating at [`max_write`](Self::max_write)
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.max_write().saturating_sub(self.len);
        let n = s.len().min(room);
        self.data[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

impl fmt::Debug for ScratchBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .finish()
    }
}
