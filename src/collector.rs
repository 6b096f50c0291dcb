//! The sampling loop.
//!
//! State transitions:
//!
//! ```text
//! Running --(cancellation observed)--> Stopping --> Done
//! Running --(process gone / sampler failure)------> Done
//! ```
//!
//! The cancellation token is checked once at the start of every tick, never
//! mid-sample. After each successful sample the loop sleeps for the full
//! interval, so the sampling period is `interval + sample time`, and a
//! cancellation is observed at most one interval after it was requested.

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::metrics::RecordTable;
use crate::process::Sampler;
use crate::signal::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Running,
    Stopping,
    Done,
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The monitored process exited. Normal end of monitoring.
    ProcessGone,
    /// Cancellation was requested (SIGINT).
    Interrupted,
    /// The sampler failed for a reason other than process exit.
    SamplerFailed,
}

/// Result of a finished collection run, handed to the reporter.
#[derive(Debug)]
pub struct Collection {
    pub records: RecordTable,
    pub stop_reason: StopReason,
}

pub struct Collector<S: Sampler> {
    sampler: S,
    interval: Duration,
    token: CancellationToken,
    state: CollectorState,
    records: RecordTable,
}

impl<S: Sampler> Collector<S> {
    pub fn new(sampler: S, interval: Duration, token: CancellationToken) -> Self {
        Self {
            sampler,
            interval,
            token,
            state: CollectorState::Running,
            records: RecordTable::new(),
        }
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    /// Samples until the process exits or cancellation is requested.
    ///
    /// Always returns whatever was collected, possibly nothing. Nothing is retried.
    pub fn run(mut self) -> Collection {
        let stop_reason = loop {
            if let Some(reason) = self.tick() {
                break reason;
            }
            thread::sleep(self.interval);
        };

        self.state = CollectorState::Done;
        info!("Collected {} samples", self.records.len());

        Collection {
            records: self.records,
            stop_reason,
        }
    }

    /// Runs one tick. Returns the stop reason once the loop must end.
    fn tick(&mut self) -> Option<StopReason> {
        if self.token.is_cancelled() {
            self.state = CollectorState::Stopping;
            info!("Interrupt received, stopping");
            return Some(StopReason::Interrupted);
        }

        match self.sampler.sample() {
            Ok(record) => {
                info!(
                    "{} {:.2}MB {:.1}% {}",
                    self.sampler.process_name(),
                    record.memory_usage_mb,
                    record.cpu_usage_percent,
                    record.thread_count
                );
                self.records.push(record);
                None
            }
            Err(e) if e.is_process_gone() => {
                info!("Process terminated");
                Some(StopReason::ProcessGone)
            }
            Err(e) => {
                warn!("Sampling failed: {}", e);
                Some(StopReason::SamplerFailed)
            }
        }
    }
}
