//! Partial-update merge rules.
//!
//! The policy functions here reproduce the upstream merge semantics
//! exactly. A zero value in the patch (empty string, zero integer) keeps
//! the previous value, which means a caller cannot explicitly reset a
//! field to empty or zero. That is a documented limitation of the patch
//! format, not something to repair here.
//!
//! The delete flag is tri-state: absent, true, or false. When the patch
//! carries no flag and no previous flag is supplied either, the flag
//! resolves to `true` — an update with no delete information implicitly
//! soft-deletes the record. Call sites must go through
//! [`resolve_delete_flag`] so a future explicit-presence patch format can
//! swap the policy without touching them.

use crate::person::{PersonRecord, UpdateRequest};

/// The final field values an update writes back, computed from the stored
/// row and the caller's patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedValues {
  pub given_name:  String,
  pub family_name: String,
  pub middle_name: String,
  pub age:         u32,
  pub gender:      String,
  pub nationality: String,
  pub is_deleted:  bool,
}

/// Compute the values to write back for an update of `previous`.
///
/// `previous_deleted` is the tri-state previous delete flag fed into
/// [`resolve_delete_flag`]; the store's update path passes `None`, so an
/// empty patch resolves the flag to `true`.
pub fn merge_update(
  previous: &PersonRecord,
  previous_deleted: Option<bool>,
  patch: UpdateRequest,
) -> MergedValues {
  MergedValues {
    given_name:  patch_or_previous_str(patch.given_name, &previous.given_name),
    family_name: patch_or_previous_str(patch.family_name, &previous.family_name),
    middle_name: patch_or_previous_str(patch.middle_name, &previous.middle_name),
    age:         patch_or_previous_int(patch.age, previous.age),
    gender:      patch_or_previous_str(patch.gender, &previous.gender),
    nationality: patch_or_previous_str(patch.nationality, &previous.nationality),
    is_deleted:  resolve_delete_flag(patch.is_deleted, previous_deleted),
  }
}

// ─── Policy functions ────────────────────────────────────────────────────────

/// Zero-value policy for strings: an empty patch value means "no change".
fn patch_or_previous_str(patch: String, previous: &str) -> String {
  if patch.is_empty() {
    previous.to_owned()
  } else {
    patch
  }
}

/// Zero-value policy for integers: a zero patch value means "no change".
fn patch_or_previous_int(patch: u32, previous: u32) -> u32 {
  if patch == 0 { previous } else { patch }
}

/// Tri-state delete flag resolution.
///
/// The patch wins when present; otherwise the previous flag wins when
/// present; otherwise the flag defaults to `true` (implicit soft-delete).
pub fn resolve_delete_flag(patch: Option<bool>, previous: Option<bool>) -> bool {
  patch.or(previous).unwrap_or(true)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
