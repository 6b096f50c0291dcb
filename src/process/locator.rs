//! Finding the process to monitor by name.

use sysinfo::{Pid, Process, ProcessStatus, ProcessesToUpdate, System};
use tracing::info;

use crate::error::{ProcwatchError, Result};

/// A live process selected for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pid: u32,
    name: String,
}

impl ProcessHandle {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Returns the first live process whose name contains `name_substring`.
///
/// The process table is enumerated once. Every match is logged, but only the
/// first one in enumeration order is returned. That order is whatever the OS
/// and sysinfo's process map yield, so when several processes match the
/// choice is not deterministic.
///
/// PID 0, this tool's own process, Linux userland threads and processes that
/// already exited (zombie or dead) are never candidates. Matching is
/// case-sensitive.
///
/// # Errors
///
/// Returns [`ProcwatchError::ProcessNotFound`] when nothing matches.
pub fn find_process(name_substring: &str) -> Result<ProcessHandle> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let own_pid = Pid::from_u32(std::process::id());
    let mut found: Option<ProcessHandle> = None;

    for (pid, process) in system.processes() {
        if pid.as_u32() == 0 || *pid == own_pid || !is_live_process(process) {
            continue;
        }

        let process_name = process.name().to_string_lossy();
        if !process_name.contains(name_substring) {
            continue;
        }

        info!("Found one process: {} (pid {})", process_name, pid);
        if found.is_none() {
            found = Some(ProcessHandle::new(pid.as_u32(), process_name));
        }
    }

    found.ok_or_else(|| ProcwatchError::ProcessNotFound(name_substring.to_string()))
}

fn is_live_process(process: &Process) -> bool {
    process.thread_kind().is_none()
        && !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead)
}
