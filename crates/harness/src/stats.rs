//! Simulation statistics collection and reporting.
//!
//! This module tracks the metrics reported at the end of a run. It provides:
//! 1. **Cycle and CPI:** Total cycles and retired instructions (counted as writeback PC changes).
//! 2. **Vector activity:** Number of retired vector results.
//! 3. **Vector length:** Summed `vl` in elements and bytes, and vector register group usage.
//!
//! Vector length accounting decodes `vtype` (SEW in bits 5:3, LMUL in bits 2:0).
//! Encodings the accounting cannot represent are reported and that cycle's
//! length update is skipped; the run itself is unaffected.

use std::fmt;
use std::time::Instant;

use crate::common::constants::{VTYPE_VLMUL_MASK, VTYPE_VSEW_MASK, VTYPE_VSEW_SHIFT};
use crate::common::{HarnessError, Result};

/// Vector register group multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lmul {
    /// LMUL = 1/8.
    Eighth,
    /// LMUL = 1/4.
    Quarter,
    /// LMUL = 1/2.
    Half,
    /// LMUL = 1.
    One,
    /// LMUL = 2.
    Two,
    /// LMUL = 4.
    Four,
    /// LMUL = 8.
    Eight,
}

impl Lmul {
    /// Number of vector registers in a group (fractional for LMUL < 1).
    pub const fn factor(self) -> f64 {
        match self {
            Lmul::Eighth => 0.125,
            Lmul::Quarter => 0.25,
            Lmul::Half => 0.5,
            Lmul::One => 1.0,
            Lmul::Two => 2.0,
            Lmul::Four => 4.0,
            Lmul::Eight => 8.0,
        }
    }
}

/// The fields of `vtype` that the statistics need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorType {
    /// Selected element width in bytes.
    pub sew_bytes: u32,
    /// Register group multiplier.
    pub lmul: Lmul,
}

impl VectorType {
    /// Decodes a raw `vtype` CSR value.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnsupportedSew`] for element widths above 32 bits
    /// (not available on a Zve32x core) and [`HarnessError::ReservedLmul`] for the
    /// reserved `vlmul` encoding `0b100`.
    pub fn decode(vtype: u32) -> Result<Self> {
        let vsew = (vtype >> VTYPE_VSEW_SHIFT) & VTYPE_VSEW_MASK;
        let sew_bytes = match vsew {
            0 => 1,
            1 => 2,
            2 => 4,
            _ => return Err(HarnessError::UnsupportedSew { vsew, vtype }),
        };
        let vlmul = vtype & VTYPE_VLMUL_MASK;
        let lmul = match vlmul {
            0 => Lmul::One,
            1 => Lmul::Two,
            2 => Lmul::Four,
            3 => Lmul::Eight,
            5 => Lmul::Eighth,
            6 => Lmul::Quarter,
            7 => Lmul::Half,
            _ => return Err(HarnessError::ReservedLmul { vlmul, vtype }),
        };
        Ok(Self { sew_bytes, lmul })
    }
}

/// Simulation statistics for one session.
///
/// Counters start at zero when the session is created and only ever grow.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulated cycles.
    pub cycles: u64,
    /// Instructions retired (cycles in which the writeback PC changed).
    pub instructions: u64,
    /// Vector results accepted by the core (`result_valid && result_ready`).
    pub vector_instructions: u64,
    /// Sum of `vl` over accounted vector results, in elements.
    pub vl_elements: u64,
    /// Sum of `vl * SEW` over accounted vector results, in bytes.
    pub vl_bytes: u64,
    /// Sum over accounted vector results of the fraction of the register group written.
    pub vreg_usage: f64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions: 0,
            vector_instructions: 0,
            vl_elements: 0,
            vl_bytes: 0,
            vreg_usage: 0.0,
        }
    }
}

impl SimStats {
    /// Counts one simulated cycle.
    pub fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    /// Counts a retired instruction when the writeback PC changed this cycle.
    pub fn record_writeback(&mut self, pc_changed: bool) {
        if pc_changed {
            self.instructions += 1;
        }
    }

    /// Accounts one retired vector result.
    ///
    /// `vlen_bytes` is the width of a single vector register. The instruction is
    /// always counted; the length sums are skipped (and the cause logged) when
    /// `vtype` cannot be decoded.
    pub fn record_vector_result(&mut self, vl: u32, vtype: u32, vlen_bytes: u32) {
        self.vector_instructions += 1;

        let vt = match VectorType::decode(vtype) {
            Ok(vt) => vt,
            Err(e) => {
                tracing::error!(cycle = self.cycles, error = %e, "vector length statistics skipped");
                return;
            }
        };

        let bytes = u64::from(vl) * u64::from(vt.sew_bytes);
        self.vl_elements += u64::from(vl);
        self.vl_bytes += bytes;
        if vlen_bytes > 0 {
            self.vreg_usage += bytes as f64 / (f64::from(vlen_bytes) * vt.lmul.factor());
        }
    }

    /// Cycles per retired instruction (0 when nothing retired).
    pub fn cpi(&self) -> f64 {
        if self.instructions == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions as f64
        }
    }

    /// Average `vl` in elements per vector result.
    pub fn avg_vl_elements(&self) -> f64 {
        self.per_vector(self.vl_elements as f64)
    }

    /// Average `vl` in bytes per vector result.
    pub fn avg_vl_bytes(&self) -> f64 {
        self.per_vector(self.vl_bytes as f64)
    }

    /// Average percentage of the register group written per vector result.
    pub fn avg_vreg_usage_percent(&self) -> f64 {
        self.per_vector(self.vreg_usage) * 100.0
    }

    fn per_vector(&self, total: f64) -> f64 {
        if self.vector_instructions == 0 {
            0.0
        } else {
            total / self.vector_instructions as f64
        }
    }

    /// Prints the report to stderr.
    pub fn print(&self) {
        eprint!("{self}");
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };
        writeln!(f, "==========================================================")?;
        writeln!(f, "SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "host_seconds             {seconds:.4} s")?;
        writeln!(f, "sim_freq                 {khz:.2} kHz")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_insts                {}", self.instructions)?;
        writeln!(f, "sim_cpi                  {:.4}", self.cpi())?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "VECTOR")?;
        writeln!(f, "  vec.insts              {}", self.vector_instructions)?;
        writeln!(f, "  vec.avg_vl_elements    {:.4}", self.avg_vl_elements())?;
        writeln!(f, "  vec.avg_vl_bytes       {:.4}", self.avg_vl_bytes())?;
        writeln!(
            f,
            "  vec.avg_vreg_usage     {:.2}%",
            self.avg_vreg_usage_percent()
        )?;
        writeln!(f, "==========================================================")
    }
}
