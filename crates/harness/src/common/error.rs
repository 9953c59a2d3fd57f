//! Harness error type.
//!
//! This module defines the single error type returned by the harness. It covers:
//! 1. **Setup failures:** Backing store allocation and configuration validation.
//! 2. **File I/O:** Program images, memory dumps, and trace/commit log files.
//! 3. **Image parsing:** Malformed tokens and words that land outside memory.
//! 4. **Vector configuration:** `vtype` encodings the statistics cannot account for.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the harness.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors reported by the harness.
///
/// None of these are fatal at this layer; the caller (usually the simulation
/// driver) decides whether to abort the run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The backing store could not be allocated.
    #[error("allocating {size} bytes of memory: {source}")]
    Allocation {
        /// Requested size in bytes.
        size: usize,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The program image could not be opened or read.
    #[error("invalid program path `{}': {source}", path.display())]
    ProgramImage {
        /// Path of the image.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The memory dump file could not be created or written.
    #[error("opening `{}': {source}", path.display())]
    Dump {
        /// Path of the dump file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file could not be read.
    #[error("reading config `{}': {source}", path.display())]
    ConfigFile {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A trace or commit log could not be created.
    #[error("opening log `{}': {source}", path.display())]
    LogFile {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A token in a program image is not a hexadecimal number.
    #[error("line {line}: malformed hex token `{token}'")]
    ImageSyntax {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A program image word does not fit in memory.
    #[error("line {line}: word at {addr:#x} is outside memory of {size} bytes")]
    ImageOutOfRange {
        /// 1-based line number.
        line: usize,
        /// Byte address of the word.
        addr: u64,
        /// Memory size in bytes.
        size: usize,
    },

    /// A memory region lies (partly) outside the backing store.
    #[error("region {start:#x}..{end:#x} is outside memory of {size} bytes")]
    RegionOutOfRange {
        /// First byte of the region.
        start: u32,
        /// One past the last byte of the region.
        end: u32,
        /// Memory size in bytes.
        size: usize,
    },

    /// The vector `vtype` selects an element width the statistics do not support.
    #[error("unsupported SEW encoding {vsew} in vtype {vtype:#x}")]
    UnsupportedSew {
        /// Raw `vsew` field (bits 5:3).
        vsew: u32,
        /// Full `vtype` value.
        vtype: u32,
    },

    /// The vector `vtype` selects the reserved LMUL encoding.
    #[error("reserved LMUL encoding {vlmul} in vtype {vtype:#x}")]
    ReservedLmul {
        /// Raw `vlmul` field (bits 2:0).
        vlmul: u32,
        /// Full `vtype` value.
        vtype: u32,
    },

    /// The configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Writing to a trace or commit log failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
