//! # Main — CLI Entry Point
//!
//! Parses arguments, configures logging and the Rayon worker pool, and hands
//! off to the search runner in `cli.rs`. Output contract: the bit length
//! header, each prime as `index: value` the moment it is claimed, and the
//! total elapsed time once the requested count has been found.

mod cli;

use anyhow::Result;
use clap::Parser;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "primegen",
    about = "Generate random probable primes of a given bit length, in parallel"
)]
struct Cli {
    /// Bit length of the primes to generate; must be a multiple of 8 and at least 32
    bits: u32,

    /// Number of primes to generate
    #[arg(default_value_t = 1)]
    count: u64,

    /// Miller-Rabin rounds per candidate (higher = more certain but slower)
    #[arg(long, default_value_t = primegen::miller_rabin::DEFAULT_ROUNDS)]
    mr_rounds: u32,

    /// Number of search worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    // Initialize structured logging: LOG_FORMAT=json for machine consumers,
    // human-readable on stderr otherwise (stdout is reserved for results)
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);
    cli::run_search(&cli)
}
