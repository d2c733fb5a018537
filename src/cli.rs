//! # CLI Execution
//!
//! Extracted from `main.rs` to keep the entry point slim: rayon pool
//! configuration, the console reporter, and the search runner.

use anyhow::Result;
use rug::Integer;
use std::time::Duration;
use tracing::{info, warn};

use primegen::progress::Progress;
use primegen::search::{self, SearchConfig};
use primegen::Reporter;

use super::Cli;

/// Size the global rayon pool. `None` (or 0) keeps the default of one
/// worker per logical core.
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    let result = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global();
    if let Err(e) = result {
        warn!(error = %e, "Could not configure rayon thread pool");
    }
}

/// Prints each prime to stdout as it is claimed: `index: value`, with a
/// blank line between entries. Called under the claim lock, so lines never
/// interleave and always appear in index order.
struct ConsoleReporter {
    count: u64,
}

impl Reporter for ConsoleReporter {
    fn report(&self, index: u64, value: &Integer) {
        println!("{}: {}", index, value);
        if index < self.count {
            println!();
        }
    }
}

/// Run the search with the console reporter and a background progress
/// logger, then print the elapsed time.
pub fn run_search(cli: &Cli) -> Result<()> {
    let mut config = SearchConfig::new(cli.bits, cli.count);
    config.mr_rounds = cli.mr_rounds;
    config.validate()?;

    info!(
        cores = rayon::current_num_threads(),
        mr_rounds = cli.mr_rounds,
        "primegen starting"
    );
    println!("BitLength: {} bits", cli.bits);

    let progress = Progress::new();
    let reporter_handle = progress.start_reporter();
    let console = ConsoleReporter { count: cli.count };
    let summary = search::search_with_progress(&config, &console, &progress)?;

    progress.stop();
    // The reporter thread sleeps between wakes; the process exits without
    // waiting out its current interval
    drop(reporter_handle);

    println!("Time to Generate: {}", format_elapsed(summary.elapsed));
    info!(
        found = summary.found,
        tested = summary.tested,
        "search complete"
    );
    Ok(())
}

/// Format a duration as h:mm:ss.fffffff.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:07}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        elapsed.subsec_nanos() / 100
    )
}
