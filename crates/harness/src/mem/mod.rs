//! Software model of the memory attached to the generated core.
//!
//! This module implements the memory the RTL model talks to. It provides:
//! 1. **Buffer:** The zero-initialised backing store for the whole address space.
//! 2. **Load:** Fixed-latency read ports with a shift pipeline of pending responses.
//! 3. **Store:** Immediate byte-masked writes and the MMIO output tap.
//! 4. **Image:** Hex program image loading and region dumps.

/// Backing store allocation and raw access.
pub mod buffer;

/// Program image loading and memory dumps.
pub mod image;

/// Latency-modelled read port.
pub mod load;

/// Write port and MMIO tap.
pub mod store;

pub use buffer::BackingStore;
pub use load::LoadPort;
pub use store::{MmioTap, WritePort};
