//! statbridge-metrics — republishes a runtime stats snapshot as gauges.
//!
//! Decodes the source's JSON payload into a [`StatisticsSnapshot`],
//! maps its numeric fields through a static gauge table, and renders
//! the result in Prometheus text format.
//!
//! # Architecture
//!
//! ```text
//! Registry (built once at startup)
//!   └── StatsCollector
//!         ├── describe() → static DEFINITIONS table
//!         └── collect()  → fetch → decode → Scrape → samples
//!
//! Prometheus exposition
//!   └── render_samples() → text/plain for /metrics endpoint
//! ```

pub mod collector;
pub mod definitions;
pub mod prometheus;
pub mod registry;
pub mod snapshot;

pub use collector::{Collector, Sample, Scrape, StatsCollector};
pub use definitions::{definitions, MetricDefinition, MetricKind, DEFINITIONS, NAMESPACE};
pub use prometheus::{render_samples, CONTENT_TYPE};
pub use registry::{Registry, RegistryError};
pub use snapshot::{DecodeError, StatisticsSnapshot};
