//! Error types for `augur-enrich`.
//!
//! Everything here is terminal for the background task that produced it:
//! the original caller already received its acknowledgment, so these are
//! logged and dropped rather than surfaced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// A single attempt got a response outside the [200, 400) success band.
  #[error("provider answered with status {0}")]
  WrongStatus(u16),

  /// All attempts for one provider were exhausted. Not retried further by
  /// any caller.
  #[error("provider {endpoint} unavailable after {attempts} attempts")]
  ProviderUnavailable { endpoint: String, attempts: u32 },

  /// The ranked-candidate provider answered with an empty list.
  #[error("provider {endpoint} returned no candidates")]
  ClassificationAmbiguous { endpoint: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
