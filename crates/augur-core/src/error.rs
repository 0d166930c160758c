//! Error types for `augur-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("given name must not be empty")]
  MissingGivenName,

  #[error("family name must not be empty")]
  MissingFamilyName,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
