//! Memory and trace harness for cycle-stepped RTL simulation of RISC-V cores.
//!
//! This crate drives a generated hardware model one clock cycle at a time and provides:
//! 1. **Memory:** A flat backing store with fixed-latency read ports, an immediate
//!    byte-masked write port, and a memory-mapped output tap.
//! 2. **Traces:** A Spike-compatible register commit log and a writeback instruction trace.
//! 3. **Statistics:** Cycle, CPI, and vector length accounting.
//! 4. **Simulation:** The model adapter traits, stall detection, and the per-cycle session.
//! 5. **Images:** Hex program image loading and memory region dumps.

/// Common types and constants (port transactions, byte masks, errors).
pub mod common;
/// Harness configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// Backing store, read/write ports, MMIO tap, and program images.
pub mod mem;
/// Model adapter, stall detection, and session driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Commit log, instruction trace, and trace window.
pub mod trace;

/// Crate error and result types.
pub use crate::common::{HarnessError, Result};
/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Flat byte-addressable memory shared by all ports.
pub use crate::mem::BackingStore;
/// Per-cycle driver; construct with `Session::open` or `Session::new`.
pub use crate::sim::{Session, SignalModel};
/// End-of-run statistics.
pub use crate::stats::SimStats;
