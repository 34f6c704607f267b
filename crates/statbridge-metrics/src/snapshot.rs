//! Statistics snapshot — the decoded source payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while decoding a source payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed stats payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// One point-in-time read of the target process's runtime state.
///
/// Every field except `gc_pause` must be present for the payload to
/// decode. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// Time of the read, in whatever unit the source reports.
    pub time: i64,
    pub go_version: String,
    pub go_os: String,
    pub go_arch: String,

    /// Logical CPU count.
    pub cpu_num: u64,
    /// Live concurrent tasks.
    pub goroutine_num: u64,
    /// Configured parallelism limit.
    pub gomaxprocs: u64,
    /// Foreign-function call count.
    pub cgo_call_num: u64,

    pub memory_alloc: u64,
    pub memory_total_alloc: u64,
    pub memory_sys: u64,
    pub memory_lookups: u64,
    pub memory_mallocs: u64,
    pub memory_frees: u64,
    pub memory_stack: u64,

    pub heap_alloc: u64,
    pub heap_sys: u64,
    pub heap_idle: u64,
    pub heap_inuse: u64,
    pub heap_released: u64,
    pub heap_objects: u64,

    /// Heap size that triggers the next collection.
    pub gc_next: u64,
    /// Timestamp of the last collection.
    pub gc_last: u64,
    pub gc_num: u64,
    /// Computed by the source; passed through untouched.
    pub gc_per_second: f64,
    /// Computed by the source; passed through untouched.
    pub gc_pause_per_second: f64,
    /// Recent pause durations. Decoded when present, never exposed.
    #[serde(default)]
    pub gc_pause: Vec<f64>,
}

impl StatisticsSnapshot {
    /// Decode a raw JSON payload. A key repeated in the payload keeps its
    /// last value.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        Ok(serde_json::from_value(value)?)
    }
}
