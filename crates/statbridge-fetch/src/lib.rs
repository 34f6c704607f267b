//! statbridge-fetch — retrieves the raw stats payload from the source.
//!
//! One call, one GET: no caching, no retries. The collector talks to the
//! network only through the [`StatsSource`] trait.
//!
//! # Architecture
//!
//! ```text
//! StatsSource (trait)
//!   └── StatsFetcher
//!         ├── hyper-util pooled client
//!         └── fetch() → Bytes | FetchError
//! ```

pub mod fetcher;

pub use fetcher::{BoxFuture, FetchError, StatsFetcher, StatsSource, MAX_REDIRECTS};
