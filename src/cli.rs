//! Command-line arguments.

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "procwatch")]
#[command(
    version,
    about = "Sample one process's memory, CPU and thread count and write a CSV report",
    after_help = "EXAMPLES:
    procwatch --process postgres
    procwatch --process nginx --report_path /tmp --report_name nginx.csv
    procwatch --process java --collect_interval 250 --headless

NOTES:
    The first process whose name contains --process is monitored. When several
    processes match, which one is picked depends on the OS process table order.
    Memory is the unique set size (USS) in MB, 0 when the OS denies access.
    macOS and Windows report resident set size instead of USS.
    CPU usage is measured since the previous sample, so the first row reads 0%.
    Sampling stops on Ctrl+C or when the process exits; the report is written then.

CONFIG FILE:
    ~/.config/procwatch/config.toml may set report_path, report_name,
    collect_interval and headless. Command-line flags take precedence."
)]
pub struct Cli {
    /// Substring to match against process names (case-sensitive)
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub process: String,

    /// Directory for the CSV report [default: the executable's directory]
    #[arg(long = "report_path", visible_alias = "report-path")]
    pub report_path: Option<PathBuf>,

    /// Report filename [default: report.csv]
    #[arg(long = "report_name", visible_alias = "report-name")]
    pub report_name: Option<String>,

    /// Sampling period in milliseconds [default: 1000]
    #[arg(
        long = "collect_interval",
        visible_alias = "collect-interval",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub collect_interval: Option<u64>,

    /// Suppress log output on the console
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub headless: Option<bool>,

    /// Read defaults from this TOML file instead of ~/.config/procwatch/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}
