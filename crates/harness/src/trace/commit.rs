//! Register commit log.
//!
//! Every register write retired by the core becomes one line of an append-only
//! text log in the format produced by Spike's `--log-commits`, so the two can be
//! diffed directly:
//!
//! ```text
//! x5 0x000000ff
//! f1 0x3f800000
//! v2 0xXXXXXXXX0403020100ff00ff11223344
//! ```
//!
//! Vector lines list the register bytes most significant first; lanes masked out
//! of the write are printed as `XX`.

use std::fmt;
use std::io::{self, Write};

use crate::common::ByteMask;

/// Register file a commit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    /// Integer register file (`x0`-`x31`).
    Integer,
    /// Floating-point register file (`f0`-`f31`).
    Float,
    /// Vector register file (`v0`-`v31`).
    Vector,
}

impl RegisterKind {
    /// Register name prefix used in the log.
    pub const fn prefix(self) -> char {
        match self {
            RegisterKind::Integer => 'x',
            RegisterKind::Float => 'f',
            RegisterKind::Vector => 'v',
        }
    }
}

/// A single register write observed at writeback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitRecord<'a> {
    /// Integer register write.
    Integer {
        /// Destination register.
        index: u32,
        /// Written value.
        value: u32,
    },
    /// Floating-point register write.
    Float {
        /// Destination register.
        index: u32,
        /// Written value (raw bits).
        value: u32,
    },
    /// Vector register write through one write port.
    Vector {
        /// Destination register.
        index: u32,
        /// Register bytes, least significant first.
        data: &'a [u8],
        /// Bytes actually written.
        mask: ByteMask<'a>,
    },
}

impl CommitRecord<'_> {
    /// The register file this record targets.
    pub const fn kind(&self) -> RegisterKind {
        match self {
            CommitRecord::Integer { .. } => RegisterKind::Integer,
            CommitRecord::Float { .. } => RegisterKind::Float,
            CommitRecord::Vector { .. } => RegisterKind::Vector,
        }
    }

    /// The destination register index.
    pub const fn index(&self) -> u32 {
        match self {
            CommitRecord::Integer { index, .. }
            | CommitRecord::Float { index, .. }
            | CommitRecord::Vector { index, .. } => *index,
        }
    }
}

impl fmt::Display for CommitRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} 0x", self.kind().prefix(), self.index())?;
        match self {
            CommitRecord::Integer { value, .. } | CommitRecord::Float { value, .. } => {
                write!(f, "{value:08x}")
            }
            CommitRecord::Vector { data, mask, .. } => {
                for (i, byte) in data.iter().enumerate().rev() {
                    if mask.is_enabled(i) {
                        write!(f, "{byte:02x}")?;
                    } else {
                        f.write_str("XX")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Append-only commit log over any writer.
#[derive(Debug)]
pub struct CommitLog<W: Write> {
    out: W,
    records: u64,
}

impl<W: Write> CommitLog<W> {
    /// Wraps `out`; nothing is written until the first record.
    pub const fn new(out: W) -> Self {
        Self { out, records: 0 }
    }

    /// Appends one line for `record`.
    ///
    /// # Errors
    ///
    /// Propagates the writer's I/O error; the record is not counted.
    pub fn record(&mut self, record: &CommitRecord<'_>) -> io::Result<()> {
        writeln!(self.out, "{record}")?;
        self.records += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub const fn records(&self) -> u64 {
        self.records
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

    /// Consumes the log, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
