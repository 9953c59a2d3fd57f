//! Execution trace and commit log emitters.
//!
//! This module turns per-cycle signal snapshots into append-only text logs. It provides:
//! 1. **Commit log:** One line per register write (integer, float, vector) in Spike format.
//! 2. **Instruction trace:** Writeback instruction words with `NEW PC` delimiters.
//! 3. **Trace window:** The cycle range in which the instruction trace and waveform run.

/// Register commit log.
pub mod commit;

/// Writeback instruction trace and PC tracker.
pub mod inst;

/// Cycle window gating.
pub mod window;

pub use commit::{CommitLog, CommitRecord, RegisterKind};
pub use inst::{InstructionTrace, WritebackTracker};
pub use window::TraceWindow;
