//! Default process-level metrics.
//!
//! Registered once at startup under the configured name prefix and sampled
//! at render time, so the scrape always reflects current process state.
//! Memory and file-descriptor figures come from `/proc` and are therefore
//! absent on non-Linux targets; the start-time gauge is always present.

use std::fmt::Write;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct ProcessCollector {
    prefix: String,
    start_time_seconds: u64,
}

impl ProcessCollector {
    pub fn new(prefix: &str) -> Self {
        let start_time_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        ProcessCollector {
            prefix: prefix.to_string(),
            start_time_seconds,
        }
    }

    /// Append the process gauge lines to an already-rendered exposition body.
    pub fn render(&self, out: &mut String) {
        self.write_gauge(
            out,
            "process_start_time_seconds",
            "Start time of the process since unix epoch in seconds.",
            Some(self.start_time_seconds),
        );
        self.write_gauge(
            out,
            "process_resident_memory_bytes",
            "Resident memory size in bytes.",
            resident_memory_bytes(),
        );
        self.write_gauge(
            out,
            "process_open_fds",
            "Number of open file descriptors.",
            open_fds(),
        );
    }

    fn write_gauge(&self, out: &mut String, name: &str, help: &str, value: Option<u64>) {
        let Some(value) = value else { return };
        let _ = writeln!(out, "# HELP {}_{} {}", self.prefix, name, help);
        let _ = writeln!(out, "# TYPE {}_{} gauge", self.prefix, name);
        let _ = writeln!(out, "{}_{} {}", self.prefix, name, value);
    }
}

#[cfg(target_os = "linux")]
fn resident_memory_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_bytes() -> Option<u64> {
    None
}

#[cfg(target_os = "linux")]
fn open_fds() -> Option<u64> {
    Some(std::fs::read_dir("/proc/self/fd").ok()?.count() as u64)
}

#[cfg(not(target_os = "linux"))]
fn open_fds() -> Option<u64> {
    None
}
