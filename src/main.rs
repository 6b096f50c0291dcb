//! procwatch CLI entry point.
//!
//! Exit status is 0 when monitoring ends normally, including when no process
//! matches and when interrupted with Ctrl+C. Any error that prevents the run
//! or its report (bad config, report write failure) exits with 1.

use clap::Parser;
use procwatch::cli::Cli;
use procwatch::config::{self, RunConfig};
use procwatch::process::{check_platform, find_process, ProcessSampler};
use procwatch::{logging, report, CancellationToken, Collector, ProcwatchError, Result, StopReason};
use tracing::{info, warn};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let file = config::load_config_file(cli.config.as_deref())?;
    let config = RunConfig::resolve(cli, file)?;
    logging::init(config.headless);
    check_platform()?;

    let handle = match find_process(&config.process_name_substring) {
        Ok(handle) => handle,
        Err(ProcwatchError::ProcessNotFound(name)) => {
            warn!("Cannot find any process includes {}", name);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    // checked before sampling so a bad destination does not cost a whole run
    let report_path = report::resolve_report_path(
        &config.report_filename,
        config.report_directory.as_deref(),
    )?;

    let token = CancellationToken::install()?;
    info!(
        "Monitoring {} (pid {}) every {} ms, press Ctrl+C to stop",
        handle.name(),
        handle.pid(),
        config.sample_interval_ms
    );
    info!("CPU usage is measured between samples; the first sample reads 0%");

    let collection =
        Collector::new(ProcessSampler::new(handle), config.sample_interval(), token).run();

    report::write_report(&collection.records, &report_path)?;

    if collection.stop_reason == StopReason::SamplerFailed {
        return Err(ProcwatchError::SamplingFailed);
    }
    Ok(())
}
