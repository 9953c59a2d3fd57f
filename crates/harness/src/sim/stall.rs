//! Fetch stall detection.

/// Declares a stall when the fetch PC stays unchanged for `threshold` consecutive checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StallDetector {
    threshold: u64,
    last_pc: u32,
    stalled_cycles: u64,
}

impl StallDetector {
    /// Creates a detector; the previous PC starts at zero.
    pub const fn new(threshold: u64) -> Self {
        Self {
            threshold,
            last_pc: 0,
            stalled_cycles: 0,
        }
    }

    /// Records this cycle's fetch PC; returns `true` once the run is stalled.
    ///
    /// Every stalled check is reported, so the caller may keep running after
    /// the first one.
    pub fn check(&mut self, pc: u32) -> bool {
        if pc == self.last_pc {
            self.stalled_cycles += 1;
        } else {
            self.stalled_cycles = 0;
        }
        self.last_pc = pc;

        if self.stalled_cycles >= self.threshold {
            tracing::error!(
                threshold = self.threshold,
                pc = %format!("{pc:#x}"),
                "simulation stalled"
            );
            return true;
        }
        false
    }

    /// Consecutive checks with an unchanged PC.
    pub const fn stalled_cycles(&self) -> u64 {
        self.stalled_cycles
    }

    /// Configured threshold.
    pub const fn threshold(&self) -> u64 {
        self.threshold
    }
}
