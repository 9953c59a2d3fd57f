//! Per-cycle simulation session.
//!
//! A `Session` owns everything the harness keeps between cycles: the backing
//! store, both read ports, the write port, the MMIO tap, the statistics, and the
//! open trace logs. Each call to [`Session::step`] performs one cycle:
//!
//! 1. **Memory:** MMIO probe, write port, instruction read, data read; responses
//!    are driven back into the model.
//! 2. **Statistics:** Cycle count, writeback PC tracking, vector accounting.
//! 3. **Traces:** Waveform hook, instruction trace, commit log.
//! 4. **Clock:** The model is advanced past the next falling edge.
//! 5. **Termination:** End PC match, then stall detection.
//!
//! Cycles are numbered from 1; the trace window is compared against that number.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::common::constants::BYTE_BITS;
use crate::common::{HarnessError, Result};
use crate::config::Config;
use crate::mem::image::{dump_region, load_program};
use crate::mem::{BackingStore, LoadPort, MmioTap, WritePort};
use crate::sim::model::{SignalModel, advance_cycle, check_pc};
use crate::sim::stall::StallDetector;
use crate::stats::SimStats;
use crate::trace::{CommitLog, CommitRecord, InstructionTrace, TraceWindow, WritebackTracker};

/// Writers for the optional logs of a session.
#[derive(Debug)]
pub struct TraceSinks<W: Write> {
    /// Destination of the register commit log.
    pub commit_log: Option<W>,
    /// Destination of the writeback instruction trace.
    pub inst_trace: Option<W>,
}

impl<W: Write> Default for TraceSinks<W> {
    fn default() -> Self {
        Self {
            commit_log: None,
            inst_trace: None,
        }
    }
}

/// Outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Keep going.
    Running,
    /// The fetch PC has not changed for `general.stall_cycles` cycles.
    Stalled {
        /// The stuck fetch PC.
        pc: u32,
    },
    /// The fetch PC reached `general.end_pc`.
    Finished {
        /// The matched fetch PC.
        pc: u32,
    },
}

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Termination state after the cycle.
    pub status: StepStatus,
    /// Data written to the MMIO address this cycle, if any.
    pub mmio: Option<Vec<u8>>,
}

/// Why [`Session::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The end PC was reached.
    Finished {
        /// The matched fetch PC.
        pc: u32,
        /// Cycles simulated.
        cycles: u64,
    },
    /// The run stalled.
    Stalled {
        /// The stuck fetch PC.
        pc: u32,
        /// Cycles simulated.
        cycles: u64,
    },
    /// `general.max_cycles` was reached.
    CycleLimit {
        /// Cycles simulated.
        cycles: u64,
    },
}

/// Harness state for one simulation run.
#[derive(Debug)]
pub struct Session<W: Write = BufWriter<File>> {
    config: Config,
    store: BackingStore,
    instr_port: LoadPort,
    data_port: LoadPort,
    write_port: WritePort,
    mmio: Option<MmioTap>,
    stats: SimStats,
    writeback: WritebackTracker,
    stall: StallDetector,
    window: TraceWindow,
    commit_log: Option<CommitLog<W>>,
    inst_trace: Option<InstructionTrace<W>>,
}

impl Session<BufWriter<File>> {
    /// Builds a session entirely from `config`.
    ///
    /// Allocates the backing store, loads `memory.program` if set, and creates
    /// the commit log and instruction trace files named in `trace`.
    ///
    /// # Errors
    ///
    /// Returns configuration, allocation, program image, and log file errors.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let store = match &config.memory.program {
            Some(path) => load_program(config.memory.size, path)?,
            None => BackingStore::new(config.memory.size)?,
        };
        let sinks = TraceSinks {
            commit_log: config.trace.commit_log.as_deref().map(open_log).transpose()?,
            inst_trace: config.trace.inst_trace.as_deref().map(open_log).transpose()?,
        };
        Self::new(config, store, sinks)
    }
}

fn open_log(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| {
        tracing::error!(path = %path.display(), %source, "cannot open log file");
        HarnessError::LogFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(BufWriter::new(file))
}

impl<W: Write> Session<W> {
    /// Builds a session around an existing store and log writers.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] if `config` does not validate or
    /// `store` is not `memory.size` bytes long.
    pub fn new(config: Config, store: BackingStore, sinks: TraceSinks<W>) -> Result<Self> {
        config.validate()?;
        let mem = &config.memory;
        if store.len() != mem.size {
            return Err(HarnessError::InvalidConfig(format!(
                "backing store is {} bytes but memory.size is {}",
                store.len(),
                mem.size
            )));
        }
        let instr_port = LoadPort::new(mem.instr_width, mem.latency)?;
        let data_port = LoadPort::new(mem.data_width, mem.latency)?;
        let write_port = WritePort::new(mem.data_width)?;
        let mmio = mem
            .mmio_addr
            .map(|addr| MmioTap::new(addr, mem.data_width))
            .transpose()?;
        let window = TraceWindow::new(config.trace.begin_cycles, config.trace.end_cycles);

        tracing::info!(
            size = store.len(),
            latency = mem.latency,
            instr_width = mem.instr_width,
            data_width = mem.data_width,
            float = config.extensions.float,
            vector = config.extensions.vector,
            "session ready"
        );

        Ok(Self {
            stall: StallDetector::new(config.general.stall_cycles),
            store,
            instr_port,
            data_port,
            write_port,
            mmio,
            stats: SimStats::default(),
            writeback: WritebackTracker::new(),
            window,
            commit_log: sinks.commit_log.map(CommitLog::new),
            inst_trace: sinks.inst_trace.map(|w| InstructionTrace::new(w, window)),
            config,
        })
    }

    /// Runs one cycle against `model`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if a log write fails.
    pub fn step<M: SignalModel + ?Sized>(&mut self, model: &mut M) -> Result<StepReport> {
        let mmio = self.update_memory(model);
        let pc_changed = self.update_stats(&*model);
        self.update_traces(model, pc_changed)?;

        advance_cycle(model);

        let pc = model.fetch_pc();
        let end_pc = self.config.general.end_pc;
        let status = match end_pc {
            Some(end) if check_pc(&*model, end) => StepStatus::Finished { pc },
            _ if self.stall.check(pc) => StepStatus::Stalled { pc },
            _ => StepStatus::Running,
        };
        Ok(StepReport { status, mmio })
    }

    fn update_memory<M: SignalModel + ?Sized>(&mut self, model: &mut M) -> Option<Vec<u8>> {
        let instr_req = model.instr_request();
        let (data_req, mmio) = {
            let req = model.data_request();
            let write = req.as_write();
            let mmio = self
                .mmio
                .and_then(|tap| tap.probe(&write))
                .map(<[u8]>::to_vec);
            if let Some(data) = &mmio {
                tracing::debug!(cycle = self.stats.cycles, addr = write.addr, ?data, "mmio write");
            }
            let _ = self.write_port.apply(&mut self.store, &write);
            (req.as_read(), mmio)
        };

        model.drive_instr_response(self.instr_port.step(instr_req, &self.store));
        model.drive_data_response(self.data_port.step(data_req, &self.store));
        mmio
    }

    fn update_stats<M: SignalModel + ?Sized>(&mut self, model: &M) -> bool {
        self.stats.record_cycle();
        let pc_changed = self.writeback.update(model.writeback_pc());
        self.stats.record_writeback(pc_changed);

        if self.config.extensions.vector
            && let Some(status) = model.vector_status()
            && status.retired()
        {
            self.stats
                .record_vector_result(status.vl, status.vtype, status.vlen_bytes);
        }
        pc_changed
    }

    fn update_traces<M: SignalModel + ?Sized>(
        &mut self,
        model: &mut M,
        pc_changed: bool,
    ) -> Result<()> {
        let cycle = self.stats.cycles;
        if self.config.trace.waveform && self.window.contains(cycle) {
            model.dump_waveform(cycle);
        }
        if let Some(trace) = &mut self.inst_trace {
            let _ = trace.record(cycle, pc_changed, model.writeback_instr())?;
        }

        let Some(log) = &mut self.commit_log else {
            return Ok(());
        };
        let ext = &self.config.extensions;

        if let Some(c) = model.xreg_commit() {
            log.record(&CommitRecord::Integer {
                index: c.index,
                value: c.value,
            })?;
        }
        if ext.float
            && let Some(c) = model.freg_commit()
        {
            log.record(&CommitRecord::Float {
                index: c.index,
                value: c.value,
            })?;
        }
        if ext.vector
            && let Some(c) = model.vreg_commit()
        {
            let width = (ext.vreg_width / BYTE_BITS) as usize;
            match c.data.get(..width) {
                Some(data) => log.record(&CommitRecord::Vector {
                    index: c.index,
                    data,
                    mask: c.mask,
                })?,
                None => tracing::warn!(
                    cycle,
                    index = c.index,
                    expected = width,
                    got = c.data.len(),
                    "vector commit narrower than vreg_width, not logged"
                ),
            }
        }
        Ok(())
    }

    /// Steps until the end PC, a stall, or `general.max_cycles`.
    ///
    /// `on_mmio` receives the data of every write to the MMIO address.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Session::step`].
    pub fn run<M, F>(&mut self, model: &mut M, mut on_mmio: F) -> Result<RunExit>
    where
        M: SignalModel + ?Sized,
        F: FnMut(&[u8]),
    {
        loop {
            let cycles = self.stats.cycles;
            if let Some(max) = self.config.general.max_cycles
                && cycles >= max
            {
                tracing::info!(cycles, "cycle limit reached");
                return Ok(RunExit::CycleLimit { cycles });
            }

            let report = self.step(model)?;
            if let Some(data) = &report.mmio {
                on_mmio(data);
            }

            let cycles = self.stats.cycles;
            match report.status {
                StepStatus::Running => {}
                StepStatus::Stalled { pc } => return Ok(RunExit::Stalled { pc, cycles }),
                StepStatus::Finished { pc } => {
                    tracing::info!(cycles, pc = %format!("{pc:#x}"), "end pc reached");
                    return Ok(RunExit::Finished { pc, cycles });
                }
            }
        }
    }

    /// Flushes the logs, writes the configured memory dump, and returns the statistics.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if a log cannot be flushed and the dump errors
    /// of [`dump_region`].
    pub fn finish(mut self) -> Result<SimStats> {
        if let Some(log) = &mut self.commit_log {
            log.flush()?;
        }
        if let Some(trace) = &mut self.inst_trace {
            trace.flush()?;
        }
        if let Some(dump) = &self.config.memory.dump {
            dump_region(&self.store, dump.start, dump.end, &dump.path)?;
        }
        tracing::info!(
            cycles = self.stats.cycles,
            instructions = self.stats.instructions,
            "session finished"
        );
        Ok(self.stats)
    }

    /// Session configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Statistics collected so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// The backing store.
    pub const fn store(&self) -> &BackingStore {
        &self.store
    }

    /// The backing store, mutably (for preloading data outside the image format).
    pub fn store_mut(&mut self) -> &mut BackingStore {
        &mut self.store
    }

    /// Writeback PC tracker.
    pub const fn writeback(&self) -> &WritebackTracker {
        &self.writeback
    }

    /// The commit log, if one is open.
    pub const fn commit_log(&self) -> Option<&CommitLog<W>> {
        self.commit_log.as_ref()
    }

    /// The instruction trace, if one is open.
    pub const fn inst_trace(&self) -> Option<&InstructionTrace<W>> {
        self.inst_trace.as_ref()
    }
}
