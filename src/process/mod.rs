//! Process discovery and sampling.
//!
//! [`find_process`] selects the process to watch, [`ProcessSampler`] turns it
//! into metric records on each tick.

mod locator;
#[cfg(any(target_os = "macos", windows))]
mod native;
#[cfg(target_os = "linux")]
mod procfs;
mod sampler;

pub use locator::{find_process, ProcessHandle};
pub use sampler::{check_platform, ProcessSampler, Sampler};
