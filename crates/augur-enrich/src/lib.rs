//! Background enrichment pipeline for augur.
//!
//! Fans out to the configured attribute providers, retries each call with a
//! bounded fixed-delay policy, folds the contributions into one aggregate
//! and hands it to the person store exactly once. Tasks are fire-and-forget
//! from the caller's perspective; the [`drain::DrainCoordinator`] lets the
//! host process wait for in-flight tasks during shutdown.

pub mod classify;
pub mod drain;
pub mod error;
pub mod orchestrator;
pub mod provider;

pub use drain::{DrainCoordinator, DrainGuard};
pub use error::{Error, Result};
pub use orchestrator::Enricher;
