//! Scrape-time collector — fetch, decode, emit.
//!
//! Every call to [`Collector::collect`] is an independent scrape: one
//! fetch through the [`StatsSource`], one decode, and one sample per
//! numeric definition. Nothing is carried over between scrapes.

use tracing::{debug, warn};

use statbridge_fetch::{BoxFuture, FetchError, StatsSource};

use crate::definitions::{definitions, MetricDefinition};
use crate::snapshot::{DecodeError, StatisticsSnapshot};

/// One value emitted during a scrape.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub definition: &'a MetricDefinition,
    pub value: f64,
}

/// A source of metrics the registry can describe and scrape.
pub trait Collector: Send + Sync {
    /// Every metric this collector may emit, in a fixed order. Must not
    /// perform I/O.
    fn describe(&self) -> &[MetricDefinition];

    /// Run one scrape. Failures yield an empty vector, never an error.
    fn collect(&self) -> BoxFuture<'_, Vec<Sample<'_>>>;
}

/// Outcome of a single scrape.
#[derive(Debug)]
pub enum Scrape {
    /// The source could not be reached or did not answer 200.
    FetchFailed(FetchError),
    /// The source answered but the payload did not match the schema.
    DecodeFailed(DecodeError),
    /// The payload decoded; every numeric definition has a value.
    Populated(StatisticsSnapshot),
}

impl Scrape {
    pub fn is_populated(&self) -> bool {
        matches!(self, Scrape::Populated(_))
    }

    pub fn snapshot(&self) -> Option<&StatisticsSnapshot> {
        match self {
            Scrape::Populated(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Samples in definition order. Empty unless populated.
    pub fn samples(&self) -> impl Iterator<Item = Sample<'static>> + '_ {
        let snapshot = self.snapshot();
        definitions().iter().filter_map(move |definition| {
            let value = definition.value(snapshot?)?;
            Some(Sample { definition, value })
        })
    }
}

/// Collector that republishes a remote stats snapshot as gauges.
pub struct StatsCollector<S> {
    source: S,
}

impl<S: StatsSource> StatsCollector<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch and decode one snapshot.
    pub async fn scrape(&self) -> Scrape {
        let body = match self.source.fetch().await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "stats fetch failed, scrape is empty");
                return Scrape::FetchFailed(e);
            }
        };

        match StatisticsSnapshot::decode(&body) {
            Ok(snapshot) => Scrape::Populated(snapshot),
            Err(e) => {
                warn!(error = %e, bytes = body.len(), "stats payload decode failed, scrape is empty");
                Scrape::DecodeFailed(e)
            }
        }
    }
}

impl<S: StatsSource> Collector for StatsCollector<S> {
    fn describe(&self) -> &[MetricDefinition] {
        definitions()
    }

    fn collect(&self) -> BoxFuture<'_, Vec<Sample<'_>>> {
        Box::pin(async move {
            let scrape = self.scrape().await;
            let samples: Vec<Sample<'_>> = scrape.samples().collect();
            debug!(samples = samples.len(), "scrape complete");
            samples
        })
    }
}
