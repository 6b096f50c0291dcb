use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcwatchError {
    #[error("Cannot find any process includes {0}")]
    ProcessNotFound(String),

    #[error("Process {0} terminated")]
    ProcessGone(u32),

    #[error("Sampling stopped after an unexpected error")]
    SamplingFailed,

    #[error("Thread counts cannot be read on {0}")]
    UnsupportedPlatform(String),

    #[error("Failed to register signal handler: {0}")]
    SignalHandler(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report directory does not exist: {0}")]
    ReportDirectory(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcwatchError {
    /// Whether this error ends monitoring normally rather than signalling a fault.
    pub fn is_process_gone(&self) -> bool {
        matches!(self, ProcwatchError::ProcessGone(_))
    }
}

pub type Result<T> = std::result::Result<T, ProcwatchError>;
