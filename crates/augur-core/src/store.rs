//! The `PersonStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `augur-store-sqlite`). Higher layers (`augur-api`, `augur-enrich`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  filters::ReadFilters,
  person::{AggregateAttributes, PersonRecord, Subject, UpdateRequest},
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// The distinct results of [`PersonStore::apply_update`].
///
/// `RowsUnaffected` (the write matched zero rows — possibly a race with a
/// concurrent soft-delete) and `IdentityConflict` (the merged name triple
/// collides with another row) are deliberately separate from `NotFound`;
/// the transport layer maps each to its own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
  Applied,
  NotFound,
  RowsUnaffected,
  IdentityConflict,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an augur person store backend.
///
/// Each operation is a single transactional unit; the backend reports a
/// zero-rows-affected write distinctly rather than folding it into a
/// generic error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert an enriched record keyed by the subject's name triple, with
  /// `is_deleted = false`.
  ///
  /// If a row with that key already exists and is soft-deleted, its
  /// age/gender/nationality/is_deleted are overwritten instead
  /// (resurrection). If it exists and is active, the write is a silent
  /// no-op — duplicate creations for an active identity are dropped.
  fn upsert_on_identity<'a>(
    &'a self,
    subject: &'a Subject,
    attributes: &'a AggregateAttributes,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Soft-delete a record by id. Returns the number of rows affected;
  /// zero means the id was absent or already deleted.
  fn soft_delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Read the previous row, merge `patch` into it field by field (see
  /// [`crate::merge`]) and write the result back under the same id.
  fn apply_update(
    &self,
    id: i64,
    patch: UpdateRequest,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Page through active (non-deleted) records ordered by id, with
  /// optional filters. `page` starts at 1.
  fn read<'a>(
    &'a self,
    page: u32,
    limit: u32,
    filters: &'a ReadFilters,
  ) -> impl Future<Output = Result<Vec<PersonRecord>, Self::Error>> + Send + 'a;

  /// Retrieve a record by id, including soft-deleted rows. Returns `None`
  /// if not found.
  fn fetch(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PersonRecord>, Self::Error>> + Send + '_;
}
