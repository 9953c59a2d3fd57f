//! Harness Constants.
//!
//! This module defines constants shared by the memory model and the log emitters. It includes:
//! 1. **Sizes:** Bits per byte and the word size used by images and dumps.
//! 2. **Log Markers:** Fixed strings that appear in the instruction trace.
//! 3. **Vector Encoding:** Field positions of the `vtype` CSR.

/// Number of bits in a byte lane.
pub const BYTE_BITS: u32 = 8;

/// Size of a program image / memory dump word in bytes.
pub const WORD_BYTES: usize = 4;

/// Largest addressable memory (32-bit byte addresses).
pub const MAX_MEMORY_SIZE: u64 = 1 << 32;

/// Delimiter written to the instruction trace when the writeback PC changes.
pub const NEW_PC_MARKER: &str = "NEW PC";

/// Shift of the `vsew` field in `vtype`.
pub const VTYPE_VSEW_SHIFT: u32 = 3;

/// Mask of the `vsew` field after shifting.
pub const VTYPE_VSEW_MASK: u32 = 0x7;

/// Mask of the `vlmul` field in `vtype`.
pub const VTYPE_VLMUL_MASK: u32 = 0x7;
