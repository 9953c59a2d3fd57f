//! Write port and memory-mapped I/O tap.
//!
//! Writes have no latency: a valid request updates the backing store in the
//! cycle it is presented, one byte lane at a time under the byte-enable mask.
//! The MMIO tap observes the same requests and reports writes to one designated
//! address; it never suppresses or redirects the store write.

use crate::common::constants::BYTE_BITS;
use crate::common::{HarnessError, Result, WriteRequest};
use crate::mem::buffer::BackingStore;

/// Immediate, byte-masked write interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePort {
    width: usize,
}

impl WritePort {
    /// Creates a write port `width_bits` wide.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] if the width is zero or not a multiple of 8.
    pub fn new(width_bits: u32) -> Result<Self> {
        Ok(Self {
            width: width_bytes(width_bits)?,
        })
    }

    /// Interface width in bytes.
    pub const fn width_bytes(&self) -> usize {
        self.width
    }

    /// Applies `request` to `store`.
    ///
    /// Every enabled lane `i` writes `data[i]` to `addr + i`. Lanes that fall
    /// outside the store (or beyond the supplied data) are dropped. Returns the
    /// number of bytes written.
    pub fn apply(&self, store: &mut BackingStore, request: &WriteRequest<'_>) -> usize {
        if !request.valid {
            return 0;
        }
        let base = request.addr as usize;
        let mem = store.as_mut_slice();
        let mut written = 0;
        let mut dropped = 0;
        for (i, &byte) in request.data.iter().take(self.width).enumerate() {
            if !request.byte_enable.is_enabled(i) {
                continue;
            }
            match mem.get_mut(base + i) {
                Some(dst) => {
                    *dst = byte;
                    written += 1;
                }
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::warn!(
                addr = request.addr,
                dropped,
                size = mem.len(),
                "write lanes outside memory dropped"
            );
        }
        written
    }
}

/// Detector for writes to a single memory-mapped output address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioTap {
    addr: u32,
    width: usize,
}

impl MmioTap {
    /// Watches `addr` on an interface `width_bits` wide.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] if the width is zero or not a multiple of 8.
    pub fn new(addr: u32, width_bits: u32) -> Result<Self> {
        Ok(Self {
            addr,
            width: width_bytes(width_bits)?,
        })
    }

    /// The watched address.
    pub const fn addr(&self) -> u32 {
        self.addr
    }

    /// Returns the written lanes if `request` is a valid write to the watched address.
    ///
    /// The whole interface width is reported regardless of byte enables.
    pub fn probe<'a>(&self, request: &WriteRequest<'a>) -> Option<&'a [u8]> {
        if !request.valid || request.addr != self.addr {
            return None;
        }
        let data = request.data;
        Some(&data[..self.width.min(data.len())])
    }
}

fn width_bytes(width_bits: u32) -> Result<usize> {
    if width_bits == 0 || width_bits % BYTE_BITS != 0 {
        return Err(HarnessError::InvalidConfig(format!(
            "write port width must be a non-zero multiple of 8 bits, got {width_bits}"
        )));
    }
    Ok((width_bits / BYTE_BITS) as usize)
}
