//! Cycle window gating the instruction trace and waveform dumps.

/// Half-open range of cycles `[begin, end)` in which tracing is active.
///
/// An `end` of zero means "trace the whole run", regardless of `begin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceWindow {
    /// First traced cycle.
    pub begin: u64,
    /// First cycle no longer traced, or `0` for no limit.
    pub end: u64,
}

impl TraceWindow {
    /// Creates a window from `begin` (inclusive) to `end` (exclusive, `0` = unbounded).
    pub const fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    /// Returns `true` if `cycle` should be traced.
    #[inline]
    pub const fn contains(&self, cycle: u64) -> bool {
        self.end == 0 || (cycle >= self.begin && cycle < self.end)
    }
}
