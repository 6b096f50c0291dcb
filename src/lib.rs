pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod process;
pub mod report;
pub mod signal;

pub use collector::{Collection, Collector, CollectorState, StopReason};
pub use config::RunConfig;
pub use error::{ProcwatchError, Result};
pub use metrics::{MetricRecord, RecordTable};
pub use signal::CancellationToken;
