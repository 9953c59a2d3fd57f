//! Configuration system for the simulation harness.
//!
//! This module defines all configuration structures used to parameterize a
//! simulation session. It provides:
//! 1. **Defaults:** Baseline memory geometry, latency, and stall threshold.
//! 2. **Structures:** Hierarchical config for general run control, memory, tracing,
//!    and ISA extensions.
//! 3. **Validation:** Rejection of geometries the memory model cannot represent.
//!
//! Configuration is supplied as JSON (`Config::from_json`, `Config::from_file`) or
//! built from `Config::default()` and adjusted in code.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::constants::{BYTE_BITS, MAX_MEMORY_SIZE};
use crate::common::{HarnessError, Result};
use crate::mem::image::region_fits;

/// Default configuration constants for the harness.
///
/// These values describe the memory system the harness models when a
/// configuration file does not override them.
mod defaults {
    /// Size of the backing store (16 MiB).
    ///
    /// The store is lazily mapped, so large sizes cost nothing until touched.
    pub const MEMORY_SIZE: usize = 16 * 1024 * 1024;

    /// Round-trip read latency in cycles.
    ///
    /// A read accepted in cycle `t` is delivered in cycle `t + LATENCY`.
    pub const LATENCY: u32 = 1;

    /// Instruction fetch interface width in bits.
    pub const INSTR_WIDTH: u32 = 32;

    /// Data interface width in bits.
    pub const DATA_WIDTH: u32 = 32;

    /// Number of cycles the fetch PC may stay unchanged before a stall is declared.
    pub const STALL_CYCLES: u64 = 1000;

    /// Vector register width in bits (VLEN).
    pub const VREG_WIDTH: u32 = 128;
}

/// Root configuration for a simulation session.
///
/// Every section may be omitted from JSON, in which case its defaults apply.
///
/// # Example
///
/// ```
/// use vsim_harness::config::Config;
///
/// let json = r#"{
///     "memory": { "size": 65536, "latency": 3, "data_width": 64, "mmio_addr": 4096 },
///     "trace":  { "begin_cycles": 10, "end_cycles": 500 },
///     "extensions": { "vector": true, "vreg_width": 256 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.latency, 3);
/// assert_eq!(config.memory.instr_width, 32);
/// assert_eq!(config.memory.mmio_addr, Some(0x1000));
/// assert!(config.extensions.vector);
/// assert!(!config.extensions.float);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Run control: stall detection and termination.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory geometry, latency, program image, and dump region.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Trace window and log destinations.
    #[serde(default)]
    pub trace: TraceConfig,
    /// Register-file extensions present in the generated model.
    #[serde(default)]
    pub extensions: ExtensionConfig,
}

impl Config {
    /// Parses and validates a JSON configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ConfigParse`] for malformed JSON and the errors of
    /// [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ConfigFile`] if the file cannot be read, otherwise
    /// the errors of [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            tracing::error!(path = %path.display(), %source, "cannot read config file");
            HarnessError::ConfigFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_json(&text)
    }

    /// Checks that the configuration describes a memory system the harness can model.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] for a zero latency, interface or vector
    /// widths that are zero or not a multiple of 8 bits, a memory size outside
    /// `1..=2^32`, or a dump region that does not fit in memory.
    pub fn validate(&self) -> Result<()> {
        let mem = &self.memory;
        if mem.latency == 0 {
            return Err(invalid("memory.latency must be at least 1 cycle"));
        }
        check_width("memory.instr_width", mem.instr_width)?;
        check_width("memory.data_width", mem.data_width)?;
        if mem.size == 0 || mem.size as u64 > MAX_MEMORY_SIZE {
            return Err(invalid(format!(
                "memory.size must be in 1..={MAX_MEMORY_SIZE}, got {}",
                mem.size
            )));
        }
        if let Some(dump) = &mem.dump
            && !region_fits(dump.start, dump.end, mem.size)
        {
            return Err(invalid(format!(
                "memory.dump region {:#x}..{:#x} does not fit in {} bytes",
                dump.start, dump.end, mem.size
            )));
        }
        if self.extensions.vector {
            check_width("extensions.vreg_width", self.extensions.vreg_width)?;
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> HarnessError {
    HarnessError::InvalidConfig(msg.into())
}

fn check_width(name: &str, bits: u32) -> Result<()> {
    if bits == 0 || bits % BYTE_BITS != 0 {
        return Err(invalid(format!(
            "{name} must be a non-zero multiple of 8 bits, got {bits}"
        )));
    }
    Ok(())
}

/// Run control settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Cycles the fetch PC may stay unchanged before the run is declared stalled.
    #[serde(default = "GeneralConfig::default_stall_cycles")]
    pub stall_cycles: u64,

    /// Fetch PC that ends the run (e.g. the address of the exit loop).
    #[serde(default)]
    pub end_pc: Option<u32>,

    /// Upper bound on simulated cycles; `None` runs until stall or `end_pc`.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

impl GeneralConfig {
    fn default_stall_cycles() -> u64 {
        defaults::STALL_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            stall_cycles: defaults::STALL_CYCLES,
            end_pc: None,
            max_cycles: None,
        }
    }
}

/// Memory system configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Backing store size in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,

    /// Read round-trip latency in cycles (at least 1).
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u32,

    /// Instruction interface width in bits.
    #[serde(default = "MemoryConfig::default_instr_width")]
    pub instr_width: u32,

    /// Data interface width in bits.
    #[serde(default = "MemoryConfig::default_data_width")]
    pub data_width: u32,

    /// Address whose writes are reported as device output.
    #[serde(default)]
    pub mmio_addr: Option<u32>,

    /// Hex program image loaded into memory before the run.
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Region written out as a hex dump when the session finishes.
    #[serde(default)]
    pub dump: Option<DumpConfig>,
}

impl MemoryConfig {
    fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }

    fn default_latency() -> u32 {
        defaults::LATENCY
    }

    fn default_instr_width() -> u32 {
        defaults::INSTR_WIDTH
    }

    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEMORY_SIZE,
            latency: defaults::LATENCY,
            instr_width: defaults::INSTR_WIDTH,
            data_width: defaults::DATA_WIDTH,
            mmio_addr: None,
            program: None,
            dump: None,
        }
    }
}

/// Memory region dumped at the end of a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DumpConfig {
    /// Output file.
    pub path: PathBuf,
    /// First byte address (inclusive).
    pub start: u32,
    /// Last byte address (exclusive).
    pub end: u32,
}

/// Trace window and log destinations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceConfig {
    /// First cycle (inclusive) of the trace window.
    #[serde(default)]
    pub begin_cycles: u64,

    /// Cycle (exclusive) at which tracing stops; `0` traces the whole run.
    #[serde(default)]
    pub end_cycles: u64,

    /// Ask the model to dump its waveform for cycles inside the window.
    #[serde(default)]
    pub waveform: bool,

    /// Destination of the register commit log.
    #[serde(default)]
    pub commit_log: Option<PathBuf>,

    /// Destination of the writeback instruction trace.
    #[serde(default)]
    pub inst_trace: Option<PathBuf>,
}

/// Register-file extensions implemented by the generated model.
///
/// These select which commit emitters run; signals of absent extensions are never read.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionConfig {
    /// Single-precision floating-point register file (F).
    #[serde(default)]
    pub float: bool,

    /// Vector register file (Zve32x).
    #[serde(default)]
    pub vector: bool,

    /// Vector register width in bits.
    #[serde(default = "ExtensionConfig::default_vreg_width")]
    pub vreg_width: u32,
}

impl ExtensionConfig {
    fn default_vreg_width() -> u32 {
        defaults::VREG_WIDTH
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            float: false,
            vector: false,
            vreg_width: defaults::VREG_WIDTH,
        }
    }
}
