//! Static gauge table.
//!
//! Each entry pairs an exposed metric with the snapshot field it reads.
//! Entries without an accessor describe string identity fields: they are
//! part of `describe()` but never produce a sample.

use std::fmt;

use crate::snapshot::StatisticsSnapshot;

/// Namespace prefix for every exposed metric.
pub const NAMESPACE: &str = "golang";

/// Reads one numeric field out of a snapshot.
pub type Accessor = fn(&StatisticsSnapshot) -> f64;

/// Exposition type of a metric. Everything this bridge exposes is a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
        }
    }
}

/// One exposed metric.
#[derive(Clone, Copy)]
pub struct MetricDefinition {
    pub namespace: &'static str,
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    accessor: Option<Accessor>,
}

impl MetricDefinition {
    const fn gauge(name: &'static str, help: &'static str, accessor: Accessor) -> Self {
        Self {
            namespace: NAMESPACE,
            name,
            help,
            kind: MetricKind::Gauge,
            accessor: Some(accessor),
        }
    }

    const fn identity(name: &'static str, help: &'static str) -> Self {
        Self {
            namespace: NAMESPACE,
            name,
            help,
            kind: MetricKind::Gauge,
            accessor: None,
        }
    }

    /// `<namespace>_<name>`, the name written to the exposition.
    pub fn full_name(&self) -> String {
        format!("{}_{}", self.namespace, self.name)
    }

    /// Whether this definition produces a sample.
    pub fn is_numeric(&self) -> bool {
        self.accessor.is_some()
    }

    /// Current value of this metric in `snapshot`, or `None` for
    /// identity fields.
    pub fn value(&self, snapshot: &StatisticsSnapshot) -> Option<f64> {
        self.accessor.map(|read| read(snapshot))
    }
}

impl fmt::Debug for MetricDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricDefinition")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("numeric", &self.is_numeric())
            .finish()
    }
}

/// Every exposed metric, in exposition order.
pub static DEFINITIONS: [MetricDefinition; 26] = [
    MetricDefinition::gauge("up_time", "golang up time", |s| s.time as f64),
    MetricDefinition::identity("version", "golang version"),
    MetricDefinition::identity("os", "golang os"),
    MetricDefinition::identity("arch", "golang arch"),
    MetricDefinition::gauge("cpu_num", "cpu num", |s| s.cpu_num as f64),
    MetricDefinition::gauge("goroutine_num", "goroutine num", |s| s.goroutine_num as f64),
    MetricDefinition::gauge("gomaxproc", "golang max proc", |s| s.gomaxprocs as f64),
    MetricDefinition::gauge("cgo_call_num", "golang cgo call num", |s| s.cgo_call_num as f64),
    MetricDefinition::gauge("memory_alloc", "golang memory alloc", |s| s.memory_alloc as f64),
    MetricDefinition::gauge("memory_total_alloc", "golang memory total alloc", |s| {
        s.memory_total_alloc as f64
    }),
    MetricDefinition::gauge("memory_sys", "golang memory sys", |s| s.memory_sys as f64),
    MetricDefinition::gauge("memory_lookups", "golang memory lookups", |s| {
        s.memory_lookups as f64
    }),
    MetricDefinition::gauge("memory_mallocs", "golang memory mallocs", |s| {
        s.memory_mallocs as f64
    }),
    MetricDefinition::gauge("memory_free", "golang memory free", |s| s.memory_frees as f64),
    MetricDefinition::gauge("memory_stack", "golang memory stack", |s| s.memory_stack as f64),
    MetricDefinition::gauge("heap_alloc", "golang heap alloc", |s| s.heap_alloc as f64),
    MetricDefinition::gauge("heap_sys", "golang heap sys", |s| s.heap_sys as f64),
    MetricDefinition::gauge("heap_idle", "golang heap idle", |s| s.heap_idle as f64),
    MetricDefinition::gauge("heap_inuse", "golang heap inuse", |s| s.heap_inuse as f64),
    MetricDefinition::gauge("heap_released", "golang heap released", |s| {
        s.heap_released as f64
    }),
    MetricDefinition::gauge("heap_objects", "golang heap objects", |s| s.heap_objects as f64),
    MetricDefinition::gauge("gc_next", "golang gc next", |s| s.gc_next as f64),
    MetricDefinition::gauge("gc_last", "golang gc last", |s| s.gc_last as f64),
    MetricDefinition::gauge("gc_num", "golang gc num", |s| s.gc_num as f64),
    MetricDefinition::gauge("gc_per_second", "golang gc per second", |s| s.gc_per_second),
    MetricDefinition::gauge("gc_pause_per_second", "golang gc pause per second", |s| {
        s.gc_pause_per_second
    }),
];

/// The static definition table as a slice.
pub fn definitions() -> &'static [MetricDefinition] {
    &DEFINITIONS
}
