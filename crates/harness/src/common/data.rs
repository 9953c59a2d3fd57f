//! Memory Port Transaction Types.
//!
//! This module defines the values exchanged between the generated model's memory
//! interfaces and the harness memory model. It provides:
//! 1. **Requests:** Read requests, write requests, and the combined data-port request.
//! 2. **Responses:** The delivered read slot (data, valid, error).
//! 3. **Byte Masks:** Per-byte enables shared by the write port and the vector commit log.

/// Per-byte enable mask stored as a little-endian bit array.
///
/// Bit `i % 8` of byte `i / 8` enables byte `i`. Bytes beyond the end of the
/// backing slice are treated as disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteMask<'a>(&'a [u8]);

impl<'a> ByteMask<'a> {
    /// Wraps a raw mask as exposed by the model (one bit per data byte).
    pub const fn new(bits: &'a [u8]) -> Self {
        Self(bits)
    }

    /// Returns `true` if byte `index` is enabled.
    #[inline]
    pub fn is_enabled(&self, index: usize) -> bool {
        self.0
            .get(index / 8)
            .is_some_and(|bits| bits & (1 << (index % 8)) != 0)
    }

    /// Returns the raw mask bytes.
    pub const fn bits(&self) -> &'a [u8] {
        self.0
    }
}

/// A read request presented on a memory port for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadRequest {
    /// Byte address of the request.
    pub addr: u32,
    /// Whether the port asserts a request this cycle.
    pub valid: bool,
}

impl ReadRequest {
    /// Creates a read request.
    pub const fn new(addr: u32, valid: bool) -> Self {
        Self { addr, valid }
    }

    /// A request slot with nothing asserted.
    pub const fn idle() -> Self {
        Self {
            addr: 0,
            valid: false,
        }
    }
}

/// A write request presented on a memory port for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteRequest<'a> {
    /// Byte address of the first lane.
    pub addr: u32,
    /// Whether the port asserts a write this cycle.
    pub valid: bool,
    /// Write data, least significant lane first.
    pub data: &'a [u8],
    /// Byte enables for `data`.
    pub byte_enable: ByteMask<'a>,
}

/// Data-port request as driven by the core: a single interface that either reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataRequest<'a> {
    /// Byte address of the request.
    pub addr: u32,
    /// Request valid.
    pub valid: bool,
    /// Write enable; a valid request with `write == false` is a load.
    pub write: bool,
    /// Write data (ignored for loads).
    pub data: &'a [u8],
    /// Byte enables (ignored for loads).
    pub byte_enable: ByteMask<'a>,
}

impl<'a> DataRequest<'a> {
    /// A data-port slot with nothing asserted.
    pub const fn idle() -> Self {
        Self {
            addr: 0,
            valid: false,
            write: false,
            data: &[],
            byte_enable: ByteMask::new(&[]),
        }
    }

    /// The load half of this request; valid only for non-write requests.
    pub const fn as_read(&self) -> ReadRequest {
        ReadRequest {
            addr: self.addr,
            valid: self.valid && !self.write,
        }
    }

    /// The store half of this request; valid only for write requests.
    pub const fn as_write(&self) -> WriteRequest<'a> {
        WriteRequest {
            addr: self.addr,
            valid: self.valid && self.write,
            data: self.data,
            byte_enable: self.byte_enable,
        }
    }
}

/// The pipeline slot delivered to a read port this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadResponse<'a> {
    /// Read data, `width / 8` bytes, least significant lane first.
    pub data: &'a [u8],
    /// Echo of the request valid issued `latency` cycles ago.
    pub valid: bool,
    /// Set when that request was not accepted (out of range or not valid).
    pub error: bool,
}
