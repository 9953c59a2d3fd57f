//! Adapter trait over the generated hardware model.
//!
//! The harness never reaches into the model's internals. Everything it needs is
//! exposed through two traits:
//! 1. **`Clocked`:** Clock input, the evaluation primitive, and the fetch PC.
//! 2. **`SignalModel`:** Writeback, commit, vector status, and memory port signals.
//!
//! Optional register files (float, vector) have default implementations that
//! report no activity, so a model built without them only implements the core set.

use crate::common::{ByteMask, DataRequest, ReadRequest, ReadResponse};

/// Clock and evaluation interface of the model.
pub trait Clocked {
    /// Drives the clock input.
    fn set_clock(&mut self, high: bool);

    /// Evaluates the model for the current input values.
    fn eval(&mut self);

    /// Program counter of the instruction in fetch.
    fn fetch_pc(&self) -> u32;
}

/// Integer or floating-point register write at writeback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegCommit {
    /// Destination register.
    pub index: u32,
    /// Written value.
    pub value: u32,
}

/// Vector register file write through its single write port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VregCommit<'a> {
    /// Destination register.
    pub index: u32,
    /// Write data, least significant byte first.
    pub data: &'a [u8],
    /// Per-byte write mask.
    pub mask: ByteMask<'a>,
}

/// Vector unit status sampled once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorStatus {
    /// The vector unit presents a result.
    pub result_valid: bool,
    /// The core accepts the result.
    pub result_ready: bool,
    /// Current `vl` CSR.
    pub vl: u32,
    /// Current `vtype` CSR.
    pub vtype: u32,
    /// Vector register width in bytes.
    pub vlen_bytes: u32,
}

impl VectorStatus {
    /// A vector instruction retires this cycle.
    pub const fn retired(&self) -> bool {
        self.result_valid && self.result_ready
    }
}

/// Signals of the model consumed and driven by the harness each cycle.
pub trait SignalModel: Clocked {
    /// Program counter of the instruction in writeback.
    fn writeback_pc(&self) -> u32;

    /// Instruction word in writeback.
    fn writeback_instr(&self) -> u32;

    /// Integer register write, if the write enable is asserted.
    fn xreg_commit(&self) -> Option<RegCommit>;

    /// Floating-point register write, if the commit valid is asserted.
    fn freg_commit(&self) -> Option<RegCommit> {
        None
    }

    /// Vector register write, if the write enable is asserted.
    fn vreg_commit(&self) -> Option<VregCommit<'_>> {
        None
    }

    /// Vector unit status; `None` for models without a vector unit.
    fn vector_status(&self) -> Option<VectorStatus> {
        None
    }

    /// Request on the instruction port.
    fn instr_request(&self) -> ReadRequest;

    /// Request on the data port.
    fn data_request(&self) -> DataRequest<'_>;

    /// Drives the instruction port response inputs.
    fn drive_instr_response(&mut self, response: ReadResponse<'_>);

    /// Drives the data port response inputs.
    fn drive_data_response(&mut self, response: ReadResponse<'_>);

    /// Dumps the waveform for `cycle`. Models without tracing ignore this.
    fn dump_waveform(&mut self, _cycle: u64) {}
}

/// Moves the model to just after the next falling clock edge.
pub fn advance_cycle<M: Clocked + ?Sized>(model: &mut M) {
    model.set_clock(true);
    model.eval();

    model.set_clock(false);
    model.eval();
}

/// Returns `true` if the fetch PC equals `addr`.
pub fn check_pc<M: Clocked + ?Sized>(model: &M, addr: u32) -> bool {
    model.fetch_pc() == addr
}
