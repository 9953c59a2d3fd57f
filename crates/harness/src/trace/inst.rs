//! Writeback instruction trace.
//!
//! For every traced cycle the instruction word sitting in writeback is written
//! as eight hex digits. When the writeback PC differs from the previous cycle a
//! `NEW PC` line is written first, so multi-cycle instructions show up as one
//! block of repeated words.

use std::io::{self, Write};

use crate::common::constants::NEW_PC_MARKER;
use crate::trace::window::TraceWindow;

/// Previous and current writeback PC.
///
/// Updated exactly once per cycle, before the instruction trace runs; both the
/// instruction counter and the `NEW PC` marker are derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritebackTracker {
    last: u32,
    current: u32,
}

impl WritebackTracker {
    /// Creates a tracker with both PCs at zero (the reset value of the signal).
    pub const fn new() -> Self {
        Self {
            last: 0,
            current: 0,
        }
    }

    /// Records this cycle's writeback PC; returns `true` if it changed.
    pub fn update(&mut self, pc: u32) -> bool {
        self.last = self.current;
        self.current = pc;
        self.changed()
    }

    /// Whether the PC recorded this cycle differs from the one before it.
    pub const fn changed(&self) -> bool {
        self.current != self.last
    }

    /// Writeback PC recorded this cycle.
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Writeback PC recorded the cycle before.
    pub const fn last(&self) -> u32 {
        self.last
    }
}

/// Instruction trace over any writer.
#[derive(Debug)]
pub struct InstructionTrace<W: Write> {
    out: W,
    window: TraceWindow,
}

impl<W: Write> InstructionTrace<W> {
    /// Wraps `out`, tracing only cycles inside `window`.
    pub const fn new(out: W, window: TraceWindow) -> Self {
        Self { out, window }
    }

    /// Traces `instr` for `cycle`; returns `false` if the cycle is outside the window.
    ///
    /// # Errors
    ///
    /// Propagates the writer's I/O error.
    pub fn record(&mut self, cycle: u64, pc_changed: bool, instr: u32) -> io::Result<bool> {
        if !self.window.contains(cycle) {
            return Ok(false);
        }
        if pc_changed {
            writeln!(self.out, "{NEW_PC_MARKER}")?;
        }
        writeln!(self.out, "{instr:08x}")?;
        Ok(true)
    }

    /// The active trace window.
    pub const fn window(&self) -> TraceWindow {
        self.window
    }

    /// Flushes buffered lines to the underlying writer.
    ///
    /// # Errors
    ///
    /// Propagates the writer's I/O error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// The underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the trace, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
