//! Collector registry.
//!
//! Built once during startup, then shared read-only with the server.
//! Registration validates metric identity so that two collectors can
//! never emit the same series.

use std::collections::HashSet;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::debug;

use crate::collector::{Collector, Sample};
use crate::prometheus::render_samples;

/// Errors that can occur while registering a collector.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate metric name: {0}")]
    Duplicate(String),

    #[error("invalid metric name: {0}")]
    InvalidName(String),
}

/// Owned set of collectors scraped on every `gather()`.
#[derive(Default)]
pub struct Registry {
    collectors: Vec<Box<dyn Collector>>,
    names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector. Nothing is registered if any of its
    /// metric names is invalid or already taken.
    pub fn register(&mut self, collector: impl Collector + 'static) -> Result<(), RegistryError> {
        let mut incoming = HashSet::new();
        for definition in collector.describe() {
            let name = definition.full_name();
            if !is_valid_metric_name(&name) {
                return Err(RegistryError::InvalidName(name));
            }
            if self.names.contains(&name) || !incoming.insert(name.clone()) {
                return Err(RegistryError::Duplicate(name));
            }
        }

        debug!(metrics = incoming.len(), "collector registered");
        self.names.extend(incoming);
        self.collectors.push(Box::new(collector));
        Ok(())
    }

    /// Number of registered collectors.
    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Whether a full metric name has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Scrape every collector concurrently and render the exposition.
    pub async fn gather(&self) -> String {
        let results = join_all(self.collectors.iter().map(|c| c.collect())).await;
        let samples: Vec<Sample<'_>> = results.into_iter().flatten().collect();
        render_samples(&samples)
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
