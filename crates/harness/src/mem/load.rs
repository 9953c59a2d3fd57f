//! Latency-modelled read port.
//!
//! A `LoadPort` answers every read request exactly `latency` cycles after it was
//! issued. It keeps a fixed-depth shift pipeline of pending responses:
//! 1. **Deliver:** The oldest slot (`latency - 1`) is copied to the port output.
//! 2. **Shift:** Every slot moves one position toward delivery.
//! 3. **Accept:** The request of this cycle is captured into slot 0.
//!
//! The order defines read-after-write behaviour: a write applied to the store
//! earlier in the same cycle is never visible in the delivered slot, but is
//! captured by a read accepted in that cycle.

use crate::common::constants::BYTE_BITS;
use crate::common::{HarnessError, ReadRequest, ReadResponse, Result};
use crate::mem::buffer::BackingStore;

/// Fixed-latency read interface of the given width.
#[derive(Debug, Clone)]
pub struct LoadPort {
    /// Interface width in bytes.
    width: usize,
    /// Pipeline depth (the round-trip latency in cycles).
    depth: usize,
    /// `depth * width` bytes; slot `i` occupies `[i * width, (i + 1) * width)`.
    data: Box<[u8]>,
    valid: Box<[bool]>,
    error: Box<[bool]>,
    /// Slot delivered by the last `step`.
    out: Box<[u8]>,
}

impl LoadPort {
    /// Creates a port `width_bits` wide that answers after `latency` cycles.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] if `latency` is zero (there would be
    /// no slot to accept into) or `width_bits` is zero or not a multiple of 8.
    pub fn new(width_bits: u32, latency: u32) -> Result<Self> {
        if latency == 0 {
            return Err(HarnessError::InvalidConfig(
                "load port latency must be at least 1 cycle".into(),
            ));
        }
        if width_bits == 0 || width_bits % BYTE_BITS != 0 {
            return Err(HarnessError::InvalidConfig(format!(
                "load port width must be a non-zero multiple of 8 bits, got {width_bits}"
            )));
        }
        let width = (width_bits / BYTE_BITS) as usize;
        let depth = latency as usize;
        Ok(Self {
            width,
            depth,
            data: vec![0; depth * width].into_boxed_slice(),
            valid: vec![false; depth].into_boxed_slice(),
            error: vec![false; depth].into_boxed_slice(),
            out: vec![0; width].into_boxed_slice(),
        })
    }

    /// Interface width in bytes.
    pub const fn width_bytes(&self) -> usize {
        self.width
    }

    /// Round-trip latency in cycles.
    pub const fn latency(&self) -> usize {
        self.depth
    }

    /// Advances the port by one cycle.
    ///
    /// Returns the response to the request issued `latency` cycles ago and
    /// captures `request` against the current contents of `store`. A request is
    /// accepted when it is valid and `addr` lies inside the store; the captured
    /// slot keeps `valid = request.valid` and sets `error` when not accepted.
    /// Lanes of an accepted request that run past the end of the store read as zero.
    pub fn step(&mut self, request: ReadRequest, store: &BackingStore) -> ReadResponse<'_> {
        let w = self.width;
        let last = self.depth - 1;

        self.out.copy_from_slice(&self.data[last * w..]);
        let valid = self.valid[last];
        let error = self.error[last];

        self.data.copy_within(..last * w, w);
        self.valid.copy_within(..last, 1);
        self.error.copy_within(..last, 1);

        let accepted = request.valid && store.contains(request.addr);
        let slot = &mut self.data[..w];
        if accepted {
            let read = store.read_into(request.addr, slot);
            if read < w {
                tracing::debug!(
                    addr = request.addr,
                    read,
                    width = w,
                    "read runs past end of memory, upper lanes zero-filled"
                );
            }
        } else {
            slot.fill(0);
        }
        self.valid[0] = request.valid;
        self.error[0] = !accepted;

        ReadResponse {
            data: &self.out,
            valid,
            error,
        }
    }
}
