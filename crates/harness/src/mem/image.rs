//! Program image loading and memory dumps.
//!
//! This module moves memory contents to and from the hex text format used by
//! the RTL testbenches. It performs:
//! 1. **Image loading:** Parses `@<word address>` directives and 32-bit hex words
//!    into the backing store, little-endian, four bytes per word.
//! 2. **Region dumps:** Writes one 8-digit hex word per line for a byte range.
//!
//! Lines starting with `#` or `/` are comments. `@<hex>` sets the load address to
//! `hex * 4`; any words following it on the same line are loaded from there.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::common::constants::WORD_BYTES;
use crate::common::{HarnessError, Result};
use crate::mem::buffer::BackingStore;

/// Allocates a store of `size` bytes and loads the program image at `path` into it.
///
/// # Errors
///
/// Propagates allocation, open, and parse failures; each is also logged.
pub fn load_program(size: usize, path: impl AsRef<Path>) -> Result<BackingStore> {
    let mut store = BackingStore::new(size)?;
    let _ = load_image(&mut store, path)?;
    Ok(store)
}

/// Loads the program image at `path` into `store`, returning the number of words loaded.
///
/// # Errors
///
/// Returns [`HarnessError::ProgramImage`] if the file cannot be opened or read,
/// and the parse errors of [`parse_image`].
pub fn load_image(store: &mut BackingStore, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        tracing::error!(path = %path.display(), %source, "invalid program path");
        HarnessError::ProgramImage {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let words = parse_image(BufReader::new(file), store).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "program image rejected");
        match e {
            HarnessError::Io(source) => HarnessError::ProgramImage {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    })?;
    tracing::info!(path = %path.display(), words, "program image loaded");
    Ok(words)
}

/// Parses a hex program image from `reader` into `store`.
///
/// Returns the number of words stored.
///
/// # Errors
///
/// Returns [`HarnessError::ImageSyntax`] for a token that is not a 32-bit hex
/// number and [`HarnessError::ImageOutOfRange`] for a word that does not fit in
/// the store.
pub fn parse_image<R: BufRead>(reader: R, store: &mut BackingStore) -> Result<usize> {
    let mut addr: u64 = 0;
    let mut words = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        if line.starts_with('#') || line.starts_with('/') {
            continue;
        }

        let mut tokens = line.split_whitespace().peekable();
        if let Some(directive) = tokens.peek().and_then(|t| t.strip_prefix('@')) {
            addr = u64::from(parse_hex(directive, lineno)?) * WORD_BYTES as u64;
            let _ = tokens.next();
        }

        for token in tokens {
            let word = parse_hex(token, lineno)?;
            let fits = u32::try_from(addr)
                .ok()
                .is_some_and(|a| store.write_word(a, word));
            if !fits {
                return Err(HarnessError::ImageOutOfRange {
                    line: lineno,
                    addr,
                    size: store.len(),
                });
            }
            addr += WORD_BYTES as u64;
            words += 1;
        }
    }
    Ok(words)
}

fn parse_hex(token: &str, line: usize) -> Result<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).map_err(|_| HarnessError::ImageSyntax {
        line,
        token: token.to_string(),
    })
}

/// Returns `true` if every word emitted for `start..end` lies inside `size` bytes.
///
/// A trailing partial word counts as a whole word; an empty region always fits.
pub fn region_fits(start: u32, end: u32, size: usize) -> bool {
    if start > end {
        return false;
    }
    let words = u64::from(end - start).div_ceil(WORD_BYTES as u64);
    words == 0 || u64::from(start) + words * WORD_BYTES as u64 <= size as u64
}

fn check_region(store: &BackingStore, start: u32, end: u32) -> Result<()> {
    if region_fits(start, end, store.len()) {
        Ok(())
    } else {
        Err(HarnessError::RegionOutOfRange {
            start,
            end,
            size: store.len(),
        })
    }
}

/// Writes the words of `start..end` (byte addresses, step 4) to the file at `path`.
///
/// The region is checked before the file is created, so a rejected dump leaves
/// no file behind.
///
/// # Errors
///
/// Returns [`HarnessError::Dump`] if the file cannot be created or written and
/// [`HarnessError::RegionOutOfRange`] if the region does not fit in the store.
pub fn dump_region(
    store: &BackingStore,
    start: u32,
    end: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    check_region(store, start, end).inspect_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "memory dump rejected");
    })?;
    let dump_err = |source: io::Error| {
        tracing::error!(path = %path.display(), %source, "memory dump failed");
        HarnessError::Dump {
            path: path.to_path_buf(),
            source,
        }
    };
    let file = File::create(path).map_err(dump_err)?;
    let mut out = BufWriter::new(file);
    match write_region(store, start, end, &mut out) {
        Ok(()) => {}
        Err(HarnessError::Io(source)) => return Err(dump_err(source)),
        Err(other) => return Err(other),
    }
    out.flush().map_err(dump_err)?;
    tracing::info!(path = %path.display(), start, end, "memory region dumped");
    Ok(())
}

/// Writes the words of `start..end` as `%08x` lines to `out`.
///
/// A trailing partial word (when `end - start` is not a multiple of 4) is
/// written in full, as long as it lies inside the store.
///
/// # Errors
///
/// Returns [`HarnessError::RegionOutOfRange`] if any emitted word does not fit
/// in the store, and [`HarnessError::Io`] if writing fails. Nothing is written
/// for a rejected region.
pub fn write_region<W: Write>(
    store: &BackingStore,
    start: u32,
    end: u32,
    out: &mut W,
) -> Result<()> {
    check_region(store, start, end)?;
    for addr in (start..end).step_by(WORD_BYTES) {
        let word = store.read_word(addr).unwrap_or_default();
        writeln!(out, "{word:08x}")?;
    }
    Ok(())
}
