//! Backing Store Implementation.
//!
//! This module provides a safe wrapper around the raw allocation holding the
//! simulated memory space. On Unix the store is an anonymous `mmap`, so a large
//! memory is only paged in by the OS where the program actually touches it; other
//! platforms fall back to a zeroed heap allocation. Allocation failure is reported
//! to the caller instead of aborting.

use std::fmt;
use std::io;
use std::slice;

use crate::common::constants::WORD_BYTES;
use crate::common::{HarnessError, Result};

enum Storage {
    #[cfg(unix)]
    Mapped { ptr: *mut u8, len: usize },
    Heap(Box<[u8]>),
}

/// Zero-initialised, fixed-size byte-addressable memory.
///
/// Owned exclusively by the session for the lifetime of a run.
pub struct BackingStore {
    storage: Storage,
}

// SAFETY: the mapping is owned exclusively by the store and only reached through
// `&self`/`&mut self`, so the usual borrow rules make cross-thread use sound.
unsafe impl Send for BackingStore {}
unsafe impl Sync for BackingStore {}

impl BackingStore {
    /// Allocates a zeroed store of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Allocation`] carrying the OS error when the memory
    /// cannot be obtained.
    pub fn new(size: usize) -> Result<Self> {
        let storage = if size == 0 {
            Storage::Heap(Box::default())
        } else {
            Storage::allocate(size).map_err(|source| {
                tracing::error!(size, %source, "backing store allocation failed");
                HarnessError::Allocation { size, source }
            })?
        };
        Ok(Self { storage })
    }

    /// Returns the size of the store in bytes.
    pub fn len(&self) -> usize {
        match &self.storage {
            #[cfg(unix)]
            Storage::Mapped { len, .. } => *len,
            Storage::Heap(bytes) => bytes.len(),
        }
    }

    /// Returns `true` for a zero-sized store.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `addr` names a byte inside the store.
    #[inline]
    pub fn contains(&self, addr: u32) -> bool {
        (addr as usize) < self.len()
    }

    /// The whole store as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            // SAFETY: the mapping is `len` bytes, readable, and lives as long as `self`.
            #[cfg(unix)]
            Storage::Mapped { ptr, len } => unsafe { slice::from_raw_parts(*ptr, *len) },
            Storage::Heap(bytes) => &bytes[..],
        }
    }

    /// The whole store as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            // SAFETY: as above; `&mut self` guarantees exclusive access.
            #[cfg(unix)]
            Storage::Mapped { ptr, len } => unsafe { slice::from_raw_parts_mut(*ptr, *len) },
            Storage::Heap(bytes) => &mut bytes[..],
        }
    }

    /// Copies bytes starting at `addr` into `buf`, zero-filling whatever lies past the end.
    ///
    /// Returns the number of bytes that came from the store.
    pub fn read_into(&self, addr: u32, buf: &mut [u8]) -> usize {
        let mem = self.as_slice();
        let start = (addr as usize).min(mem.len());
        let n = buf.len().min(mem.len() - start);
        buf[..n].copy_from_slice(&mem[start..start + n]);
        buf[n..].fill(0);
        n
    }

    /// Reads the little-endian word at `addr`, or `None` if it does not fit.
    pub fn read_word(&self, addr: u32) -> Option<u32> {
        let start = addr as usize;
        let bytes = self.as_slice().get(start..start + WORD_BYTES)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?))
    }

    /// Writes a little-endian word at `addr`; returns `false` if it does not fit.
    pub fn write_word(&mut self, addr: u32, value: u32) -> bool {
        let start = addr as usize;
        match self.as_mut_slice().get_mut(start..start + WORD_BYTES) {
            Some(dst) => {
                dst.copy_from_slice(&value.to_le_bytes());
                true
            }
            None => false,
        }
    }
}

impl Storage {
    #[cfg(unix)]
    fn allocate(size: usize) -> io::Result<Self> {
        // SAFETY: anonymous private mapping with no backing fd; checked for MAP_FAILED.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        Ok(Storage::Mapped {
            ptr: ptr.cast::<u8>(),
            len: size,
        })
    }

    #[cfg(not(unix))]
    fn allocate(size: usize) -> io::Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        bytes.resize(size, 0);
        Ok(Storage::Heap(bytes.into_boxed_slice()))
    }
}

#[cfg(unix)]
impl Drop for Storage {
    fn drop(&mut self) {
        if let Storage::Mapped { ptr, len } = self {
            // SAFETY: `ptr`/`len` came from a successful mmap and are unmapped exactly once.
            unsafe {
                let _ = libc::munmap(ptr.cast(), *len);
            }
        }
    }
}

impl fmt::Debug for BackingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.storage {
            #[cfg(unix)]
            Storage::Mapped { .. } => "mmap",
            Storage::Heap(_) => "heap",
        };
        f.debug_struct("BackingStore")
            .field("len", &self.len())
            .field("storage", &kind)
            .finish()
    }
}
