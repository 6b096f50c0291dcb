//! End-of-run CSV report and summary statistics.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ProcwatchError, Result};
use crate::metrics::{MetricRecord, RecordTable};

/// Default report filename.
pub const DEFAULT_REPORT_NAME: &str = "report.csv";

/// Max, min, mean and median of one metric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
}

impl Summary {
    /// Summarises `values`. Returns `None` for an empty slice.
    ///
    /// The median of an even-length slice is the mean of the two middle values.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mid = n / 2;
        let median = if n % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            max: sorted[n - 1],
            min: sorted[0],
            mean: sorted.iter().sum::<f64>() / n as f64,
            median,
        })
    }
}

/// Summaries for the CPU and memory columns of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSummary {
    pub cpu_usage: Summary,
    pub memory_usage: Summary,
}

impl ReportSummary {
    pub fn of(records: &[MetricRecord]) -> Option<Self> {
        let cpu: Vec<f64> = records.iter().map(|r| r.cpu_usage_percent).collect();
        let memory: Vec<f64> = records.iter().map(|r| r.memory_usage_mb).collect();

        Some(Self {
            cpu_usage: Summary::of(&cpu)?,
            memory_usage: Summary::of(&memory)?,
        })
    }
}

/// Directory the running executable lives in.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or(ProcwatchError::ReportDirectory(exe))
}

/// Joins the report path, defaulting the directory to the executable's own.
///
/// Fails if the directory does not exist, so callers can check the
/// destination before collecting anything.
pub fn resolve_report_path(filename: &str, directory: Option<&Path>) -> Result<PathBuf> {
    let directory = match directory {
        Some(dir) => dir.to_path_buf(),
        None => executable_dir()?,
    };

    if !directory.is_dir() {
        return Err(ProcwatchError::ReportDirectory(directory));
    }

    Ok(directory.join(filename))
}

/// Resolves the report path, then writes `table` there with [`write_report`].
///
/// Returns the path written.
pub fn report(table: &RecordTable, filename: &str, directory: Option<&Path>) -> Result<PathBuf> {
    let path = resolve_report_path(filename, directory)?;
    write_report(table, &path)?;
    Ok(path)
}

/// Writes `table` as CSV to `path` and logs its summary statistics.
///
/// Records are sorted ascending by timestamp first. The file is truncated and
/// written in one go, so reporting the same table twice gives identical bytes.
/// An empty table produces a header-only file and a "no data" log line.
pub fn write_report(table: &RecordTable, path: &Path) -> Result<()> {
    let records = table.sorted();

    log_summary(&records);
    write_csv(path, &records)?;

    info!("Report written to {}", path.display());
    Ok(())
}

fn log_summary(records: &[MetricRecord]) {
    match ReportSummary::of(records) {
        Some(summary) => {
            let cpu = summary.cpu_usage;
            let mem = summary.memory_usage;
            info!(
                "CPU Usage(max: {}, min: {}, average: {}, median: {})",
                cpu.max, cpu.min, cpu.mean, cpu.median
            );
            info!(
                "Memory Usage(max: {}, min: {}, average: {}, median: {})",
                mem.max, mem.min, mem.mean, mem.median
            );
        }
        None => info!("CPU Usage: no data; Memory Usage: no data"),
    }
}

fn write_csv(path: &Path, records: &[MetricRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);

    if records.is_empty() {
        writer.write_record(["time", "memory_usage", "threads_used", "cpu_usage"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Local> {
        Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn table(rows: &[(i64, f64, f64, u64)]) -> RecordTable {
        rows.iter()
            .map(|&(t, mem, cpu, threads)| MetricRecord::new(at(t), mem, cpu, threads))
            .collect()
    }

    #[test]
    fn test_summary_even_length() {
        let summary = Summary::of(&[10.0, 20.0, 30.0, 40.0]).unwrap();

        assert_eq!(summary.max, 40.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.mean, 25.0);
        assert_eq!(summary.median, 25.0);
    }

    #[test]
    fn test_summary_odd_length_unsorted() {
        let summary = Summary::of(&[9.0, 1.0, 5.0]).unwrap();

        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.median, 5.0);
    }

    #[test]
    fn test_summary_single_value() {
        let summary = Summary::of(&[3.5]).unwrap();
        assert_eq!(summary.max, 3.5);
        assert_eq!(summary.min, 3.5);
        assert_eq!(summary.median, 3.5);
    }

    #[test]
    fn test_summary_empty() {
        assert!(Summary::of(&[]).is_none());
        assert!(ReportSummary::of(&[]).is_none());
    }

    #[test]
    fn test_report_summary_columns() {
        let t = table(&[
            (0, 100.0, 10.0, 1),
            (1, 200.0, 20.0, 1),
            (2, 300.0, 30.0, 1),
            (3, 400.0, 40.0, 1),
        ]);
        let summary = ReportSummary::of(t.records()).unwrap();

        assert_eq!(summary.cpu_usage.mean, 25.0);
        assert_eq!(summary.memory_usage.median, 250.0);
    }

    #[test]
    fn test_report_writes_sorted_csv() {
        let dir = TempDir::new().unwrap();
        let t = table(&[(2, 3.0, 30.0, 3), (0, 1.0, 10.0, 1), (1, 2.0, 20.0, 2)]);

        let path = report(&t, "out.csv", Some(dir.path())).unwrap();

        assert_eq!(path, dir.path().join("out.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "time,memory_usage,threads_used,cpu_usage");
        assert_eq!(lines.len(), 4);

        let threads: Vec<&str> = lines[1..]
            .iter()
            .map(|l| l.split(',').nth(2).unwrap())
            .collect();
        assert_eq!(threads, vec!["1", "2", "3"]);

        let first = lines[1].split(',').next().unwrap();
        assert_eq!(
            DateTime::parse_from_rfc3339(first).unwrap().timestamp(),
            at(0).timestamp()
        );
    }

    #[test]
    fn test_report_row_values() {
        let dir = TempDir::new().unwrap();
        let t = table(&[(0, 12.5, 3.25, 8)]);

        let path = report(&t, "one.csv", Some(dir.path())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row: Vec<&str> = content.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(&row[1..], &["12.5", "8", "3.25"]);
    }

    #[test]
    fn test_report_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let t = table(&[(1, 2.0, 20.0, 2), (0, 1.0, 10.0, 1)]);

        let path = report(&t, "same.csv", Some(dir.path())).unwrap();
        let first = std::fs::read(&path).unwrap();
        report(&t, "same.csv", Some(dir.path())).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_report_empty_table_writes_header_only() {
        let dir = TempDir::new().unwrap();

        let path = report(&RecordTable::new(), "empty.csv", Some(dir.path())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "time,memory_usage,threads_used,cpu_usage\n");
    }

    #[test]
    fn test_report_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = report(&RecordTable::new(), "r.csv", Some(&missing)).unwrap_err();
        assert!(matches!(err, ProcwatchError::ReportDirectory(p) if p == missing));
    }

    #[test]
    fn test_resolve_checks_directory_without_creating_file() {
        let dir = TempDir::new().unwrap();

        let path = resolve_report_path("later.csv", Some(dir.path())).unwrap();

        assert_eq!(path, dir.path().join("later.csv"));
        assert!(!path.exists());
        assert!(resolve_report_path("later.csv", Some(&dir.path().join("nope"))).is_err());
    }

    #[test]
    fn test_write_report_to_resolved_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("direct.csv");

        write_report(&table(&[(0, 1.0, 2.0, 3)]), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_resolve_defaults_to_executable_dir() {
        let path = resolve_report_path(DEFAULT_REPORT_NAME, None).unwrap();
        assert_eq!(path, executable_dir().unwrap().join("report.csv"));
    }
}
