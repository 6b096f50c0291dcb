//! Per-tick sampling of the monitored process using sysinfo.
//!
//! CPU usage is a delta since the previous refresh of the same process, so
//! the first sample of a run reads 0% (there is no earlier refresh to compare
//! against). That value is reported as-is.

use std::io;

use chrono::Local;
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use tracing::{debug, warn};

use super::locator::ProcessHandle;
use crate::error::{ProcwatchError, Result};
use crate::metrics::{bytes_to_mb, MetricRecord};

/// Source of metric records for the collector loop.
pub trait Sampler {
    /// Display name of the sampled process, used in log lines.
    fn process_name(&self) -> &str;

    /// Takes one sample.
    ///
    /// # Errors
    ///
    /// Returns [`ProcwatchError::ProcessGone`] once the process has exited.
    fn sample(&mut self) -> Result<MetricRecord>;
}

/// Checks that thread counts can be read on this OS.
///
/// Linux reports USS. macOS and Windows report resident memory instead,
/// which is logged once here. Any other OS is refused before monitoring
/// starts rather than writing zero thread counts.
///
/// # Errors
///
/// Returns [`ProcwatchError::UnsupportedPlatform`] outside Linux, macOS and Windows.
pub fn check_platform() -> Result<()> {
    match std::env::consts::OS {
        "linux" => Ok(()),
        "macos" | "windows" => {
            warn!(
                "USS is not available on {}; memory_usage is resident set size",
                std::env::consts::OS
            );
            Ok(())
        }
        other => Err(ProcwatchError::UnsupportedPlatform(other.to_string())),
    }
}

/// Samples one OS process.
///
/// Owns its own `sysinfo::System` so CPU deltas are tracked between calls.
pub struct ProcessSampler {
    system: System,
    handle: ProcessHandle,
}

impl ProcessSampler {
    pub fn new(handle: ProcessHandle) -> Self {
        Self {
            system: System::new(),
            handle,
        }
    }

    pub fn handle(&self) -> &ProcessHandle {
        &self.handle
    }
}

impl Sampler for ProcessSampler {
    fn process_name(&self) -> &str {
        self.handle.name()
    }

    fn sample(&mut self) -> Result<MetricRecord> {
        let timestamp = Local::now();
        let pid = self.handle.pid();
        let sys_pid = Pid::from_u32(pid);

        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            refresh_kind(),
        );

        let process = self
            .system
            .process(sys_pid)
            .ok_or(ProcwatchError::ProcessGone(pid))?;

        // Exited but not yet reaped by its parent.
        if matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead) {
            return Err(ProcwatchError::ProcessGone(pid));
        }

        let cpu_usage = f64::from(process.cpu_usage());
        let memory = memory_bytes(pid, process)?;
        let threads = thread_count(pid, process)?;

        Ok(MetricRecord::new(
            timestamp,
            bytes_to_mb(memory),
            cpu_usage,
            threads,
        ))
    }
}

fn refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing().with_cpu().with_memory()
}

#[cfg(target_os = "linux")]
fn memory_bytes(pid: u32, _process: &Process) -> Result<u64> {
    super::procfs::read_uss_bytes(pid).or_else(|e| recover(pid, "memory", e))
}

/// sysinfo has no USS outside Linux; resident memory stands in for it.
#[cfg(not(target_os = "linux"))]
fn memory_bytes(_pid: u32, process: &Process) -> Result<u64> {
    Ok(process.memory())
}

#[cfg(target_os = "linux")]
fn thread_count(pid: u32, _process: &Process) -> Result<u64> {
    super::procfs::read_thread_count(pid).or_else(|e| recover(pid, "thread count", e))
}

#[cfg(any(target_os = "macos", windows))]
fn thread_count(pid: u32, _process: &Process) -> Result<u64> {
    super::native::read_thread_count(pid).or_else(|e| recover(pid, "thread count", e))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn thread_count(_pid: u32, _process: &Process) -> Result<u64> {
    Err(ProcwatchError::UnsupportedPlatform(
        std::env::consts::OS.to_string(),
    ))
}

/// Maps an OS read failure to either "process gone" or a zero reading.
///
/// Access denied is expected for processes owned by other users and reads as 0.
fn recover(pid: u32, what: &str, e: io::Error) -> Result<u64> {
    if is_no_such_process(&e) {
        return Err(ProcwatchError::ProcessGone(pid));
    }

    if e.kind() == io::ErrorKind::PermissionDenied {
        debug!("Access denied reading {} of pid {}, using 0", what, pid);
    } else {
        debug!("Cannot read {} of pid {}: {}, using 0", what, pid, e);
    }
    Ok(0)
}

fn is_no_such_process(e: &io::Error) -> bool {
    const ESRCH: i32 = 3;

    e.kind() == io::ErrorKind::NotFound || (cfg!(unix) && e.raw_os_error() == Some(ESRCH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_current_process() {
        let handle = ProcessHandle::new(std::process::id(), "self");
        let mut sampler = ProcessSampler::new(handle);

        let record = sampler.sample().unwrap();

        assert!(record.memory_usage_mb > 0.0);
        assert!(record.cpu_usage_percent >= 0.0);
        assert!(record.thread_count >= 1);
        assert_eq!(sampler.process_name(), "self");
    }

    #[test]
    fn test_consecutive_samples_advance_timestamp() {
        let handle = ProcessHandle::new(std::process::id(), "self");
        let mut sampler = ProcessSampler::new(handle);

        let first = sampler.sample().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = sampler.sample().unwrap();

        assert!(second.timestamp > first.timestamp);
    }

    #[test]
    fn test_nonexistent_process_is_gone() {
        let handle = ProcessHandle::new(u32::MAX - 1, "ghost");
        let mut sampler = ProcessSampler::new(handle);

        let err = sampler.sample().unwrap_err();
        assert!(err.is_process_gone());
    }

    #[cfg(unix)]
    #[test]
    fn test_exited_child_is_gone() {
        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .unwrap();
        let mut sampler = ProcessSampler::new(ProcessHandle::new(child.id(), "sleep"));

        assert!(sampler.sample().is_ok());

        child.kill().unwrap();
        child.wait().unwrap();

        assert!(sampler.sample().unwrap_err().is_process_gone());
    }

    #[test]
    fn test_sample_counts_spawned_thread() {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let worker = std::thread::spawn(move || rx.recv().ok());

        let handle = ProcessHandle::new(std::process::id(), "self");
        let record = ProcessSampler::new(handle).sample().unwrap();

        tx.send(()).unwrap();
        worker.join().unwrap();
        assert!(record.thread_count >= 2);
    }

    #[test]
    fn test_check_platform_accepts_supported_targets() {
        let supported = cfg!(any(target_os = "linux", target_os = "macos", windows));
        assert_eq!(check_platform().is_ok(), supported);
    }

    #[cfg(unix)]
    #[test]
    fn test_recover_maps_errors() {
        use std::io::{Error, ErrorKind};

        let denied = recover(1, "memory", Error::from(ErrorKind::PermissionDenied));
        assert_eq!(denied.unwrap(), 0);

        let gone = recover(1, "memory", Error::from(ErrorKind::NotFound));
        assert!(gone.unwrap_err().is_process_gone());

        let esrch = recover(1, "memory", Error::from_raw_os_error(3));
        assert!(esrch.unwrap_err().is_process_gone());

        let other = recover(1, "memory", Error::from(ErrorKind::InvalidData));
        assert_eq!(other.unwrap(), 0);
    }
}
