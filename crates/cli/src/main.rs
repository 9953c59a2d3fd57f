//! Program image and memory dump tool for the simulation harness.
//!
//! This binary exposes the harness memory model without a hardware model attached. It performs:
//! 1. **Dump:** Load a hex program image into memory and write a region back out as a hex dump.
//! 2. **Check:** Parse a hex program image and report how many words it loads.
//! 3. **Config:** Validate a JSON harness configuration and print the effective settings.
//!
//! Log verbosity follows `RUST_LOG` (default `info`); failures are reported
//! through the same log on stderr.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vsim_harness::config::Config;
use vsim_harness::mem::BackingStore;
use vsim_harness::mem::image::{dump_region, load_image, load_program};

/// Default memory size for image commands (16 MiB).
const DEFAULT_MEM_SIZE: usize = 16 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "vsim-mem",
    author,
    version,
    about = "Program image and memory dump tool for the vsim harness",
    long_about = "Load hex program images into the harness memory model, dump memory regions, and validate harness configuration files.\n\nExamples:\n  vsim-mem check prog.hex\n  vsim-mem dump prog.hex --start 0x1000 --end 0x1100 -o dump.hex\n  vsim-mem config harness.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load an image and write a memory region as one hex word per line.
    Dump {
        /// Hex program image to load.
        image: PathBuf,

        /// Memory size in bytes.
        #[arg(long, default_value_t = DEFAULT_MEM_SIZE)]
        mem_size: usize,

        /// First byte address of the region (inclusive).
        #[arg(long, value_parser = parse_addr)]
        start: u32,

        /// Last byte address of the region (exclusive).
        #[arg(long, value_parser = parse_addr)]
        end: u32,

        /// Output file.
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Parse an image and report the number of words it loads.
    Check {
        /// Hex program image to check.
        image: PathBuf,

        /// Memory size in bytes.
        #[arg(long, default_value_t = DEFAULT_MEM_SIZE)]
        mem_size: usize,
    },

    /// Validate a JSON configuration file.
    Config {
        /// Configuration file.
        path: PathBuf,
    },
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_addr(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dump {
            image,
            mem_size,
            start,
            end,
            out,
        } => cmd_dump(&image, mem_size, start, end, &out),
        Commands::Check { image, mem_size } => cmd_check(&image, mem_size),
        Commands::Config { path } => cmd_config(&path),
    };

    let code = exit_code(&result);
    if code != 0 {
        process::exit(code);
    }
}

/// Logs a failed command and maps it to the process exit status.
fn exit_code(result: &vsim_harness::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            1
        }
    }
}

/// Loads `image` into a fresh memory and dumps `start..end` to `out`.
fn cmd_dump(
    image: &Path,
    mem_size: usize,
    start: u32,
    end: u32,
    out: &Path,
) -> vsim_harness::Result<()> {
    let store = load_program(mem_size, image)?;
    dump_region(&store, start, end, out)?;
    println!(
        "[*] Dumped {:#x}..{:#x} ({} words) to {}",
        start,
        end,
        (end - start).div_ceil(4),
        out.display()
    );
    Ok(())
}

/// Parses `image` and prints the loaded word count.
fn cmd_check(image: &Path, mem_size: usize) -> vsim_harness::Result<()> {
    let mut store = BackingStore::new(mem_size)?;
    let words = load_image(&mut store, image)?;
    println!("[*] {}: {} words", image.display(), words);
    Ok(())
}

/// Validates the configuration at `path` and prints the effective settings.
fn cmd_config(path: &Path) -> vsim_harness::Result<()> {
    let config = Config::from_file(path)?;
    let mem = &config.memory;
    println!("Configuration: {}", path.display());
    println!(
        "  Memory: {} bytes  Latency: {} cycles  Instr: {} bits  Data: {} bits",
        mem.size, mem.latency, mem.instr_width, mem.data_width
    );
    if let Some(addr) = mem.mmio_addr {
        println!("  MMIO: {addr:#x}");
    }
    println!(
        "  Trace window: {}..{}  Stall threshold: {} cycles",
        config.trace.begin_cycles, config.trace.end_cycles, config.general.stall_cycles
    );
    println!(
        "  Extensions: float={} vector={} vreg_width={}",
        config.extensions.float, config.extensions.vector, config.extensions.vreg_width
    );
    Ok(())
}
