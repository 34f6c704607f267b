//! Statistics snapshot of the exporter's own process.
//!
//! Served on `/api/stats` so the bridge can scrape itself. Fields with no
//! equivalent in this runtime (garbage collector, foreign calls) are
//! reported as zero.

use std::time::{SystemTime, UNIX_EPOCH};

use statbridge_metrics::StatisticsSnapshot;

const VERSION: &str = concat!("statbridge/", env!("CARGO_PKG_VERSION"));

/// Read the current process statistics.
pub fn local_snapshot() -> StatisticsSnapshot {
    let runtime = tokio::runtime::Handle::try_current()
        .ok()
        .map(|handle| handle.metrics());

    StatisticsSnapshot {
        time: unix_nanos(),
        go_version: VERSION.to_string(),
        go_os: std::env::consts::OS.to_string(),
        go_arch: std::env::consts::ARCH.to_string(),
        cpu_num: std::thread::available_parallelism()
            .map(|n| n.get() as u64)
            .unwrap_or(1),
        goroutine_num: runtime
            .as_ref()
            .map_or(0, |m| m.num_alive_tasks() as u64),
        gomaxprocs: runtime.as_ref().map_or(0, |m| m.num_workers() as u64),
        memory_sys: resident_bytes().unwrap_or(0),
        ..Default::default()
    }
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or_default()
}

#[cfg(target_os = "linux")]
fn resident_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_status_rss(&status)
}

#[cfg(not(target_os = "linux"))]
fn resident_bytes() -> Option<u64> {
    None
}

/// `VmRSS:` line of `/proc/<pid>/status`, reported in kB.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_status_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let mut fields = line["VmRSS:".len()..].split_whitespace();
    let kib: u64 = fields.next()?.parse().ok()?;
    match fields.next() {
        Some("kB") | None => kib.checked_mul(1024),
        Some(_) => None,
    }
}
