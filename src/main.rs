/*!
 * Lock-Free Queue Stress Tool - Main Entry Point
 *
 * Hammers one queue from many threads and verifies that nothing is lost,
 * duplicated or invented:
 * - Concurrent pushes
 * - Concurrent pops
 * - Mixed push/pop with a final drain
 */

use lockfree_queue::{init_tracing, stress, StressConfig};
use miette::IntoDiagnostic;
use tracing::info;

fn main() -> miette::Result<()> {
    // Initialize structured tracing
    init_tracing();

    info!("Lock-free queue stress run starting...");
    info!("================================================");

    let config = StressConfig::from_env()?;
    info!(
        producers = config.producers,
        consumers = config.consumers,
        items = config.items_per_producer,
        threads = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        "Configuration loaded"
    );

    let report = stress::run(&config)?;

    info!(
        pushed = report.pushed,
        popped = report.popped,
        cas_retries = report.stats.cas_retries,
        "Stress run passed"
    );

    let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
    println!("{}", json);

    Ok(())
}
