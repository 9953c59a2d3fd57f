//! Simulation driver.
//!
//! This module connects the harness to a generated hardware model. It provides:
//! 1. **Model adapter:** The `Clocked` and `SignalModel` traits and the clock helpers.
//! 2. **Stall detection:** Fetch PC watchdog.
//! 3. **Session:** Per-cycle orchestration of memory, statistics, and traces.

/// Adapter traits over the generated model.
pub mod model;

/// Per-cycle session driver.
pub mod session;

/// Fetch stall watchdog.
pub mod stall;

pub use model::{Clocked, RegCommit, SignalModel, VectorStatus, VregCommit, advance_cycle, check_pc};
pub use session::{RunExit, Session, StepReport, StepStatus, TraceSinks};
pub use stall::StallDetector;
