//! Readers for per-process statistics sysinfo does not expose.
//!
//! - `/proc/{pid}/smaps_rollup` (or `smaps`) - private pages for USS
//! - `/proc/{pid}/status` - thread count

use std::fs;
use std::io;

const USS_FIELDS: [&str; 3] = ["Private_Clean:", "Private_Dirty:", "Private_Hugetlb:"];

/// Reads the unique set size of `pid` in bytes.
///
/// Prefers `smaps_rollup` and falls back to the per-mapping `smaps` on
/// kernels older than 4.14.
pub fn read_uss_bytes(pid: u32) -> io::Result<u64> {
    let content = match fs::read_to_string(format!("/proc/{}/smaps_rollup", pid)) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::read_to_string(format!("/proc/{}/smaps", pid))?
        }
        Err(e) => return Err(e),
    };

    parse_uss_kb(&content).map(|kb| kb * 1024)
}

/// Reads the current thread count of `pid`.
pub fn read_thread_count(pid: u32) -> io::Result<u64> {
    let content = fs::read_to_string(format!("/proc/{}/status", pid))?;
    parse_thread_count(&content)
}

/// Sums the private page fields of an smaps listing, in kB.
///
/// Works for both `smaps_rollup` (one block) and `smaps` (one block per mapping).
fn parse_uss_kb(content: &str) -> io::Result<u64> {
    let mut total = 0u64;
    let mut seen = false;

    for line in content.lines() {
        let Some(field) = USS_FIELDS.iter().find(|f| line.starts_with(**f)) else {
            continue;
        };
        let value = line[field.len()..]
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| malformed("smaps", line))?;
        total = total.saturating_add(value);
        seen = true;
    }

    if !seen {
        return Err(malformed("smaps", "no Private_* fields"));
    }
    Ok(total)
}

fn parse_thread_count(content: &str) -> io::Result<u64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| malformed("status", "missing Threads field"))
}

fn malformed(file: &str, detail: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed /proc/<pid>/{}: {}", file, detail),
    )
}
