//! Person domain types.
//!
//! A [`Subject`] is the minimal identity a caller submits: the name triple.
//! The enrichment pipeline turns it into [`AggregateAttributes`] and the
//! store persists the combination as a [`PersonRecord`].
//!
//! Throughout these types an empty string stands for "absent" on optional
//! string fields. This mirrors the partial-update merge policy (see
//! [`crate::merge`]), where a zero value is indistinguishable from "not
//! provided".

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The name triple being enriched. Immutable once an enrichment task has
/// been spawned for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subject {
  pub given_name:  String,
  pub family_name: String,
  /// Optional; empty means absent.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub middle_name: String,
}

impl Subject {
  /// Both the given and family names are required non-empty.
  pub fn validate(&self) -> Result<()> {
    if self.given_name.is_empty() {
      return Err(Error::MissingGivenName);
    }
    if self.family_name.is_empty() {
      return Err(Error::MissingFamilyName);
    }
    Ok(())
  }
}

/// The in-progress combined attribute set for one enrichment task.
///
/// Any field may remain absent while the task is running. Under the
/// fail-fast policy a record is only persisted once every configured
/// provider has contributed, so absent fields never normally reach the
/// store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateAttributes {
  pub age:         Option<u32>,
  pub gender:      Option<String>,
  pub nationality: Option<String>,
}

/// A persisted, enriched person row.
///
/// `id` is assigned by the store on creation and immutable afterwards.
/// `is_deleted` is a soft-delete flag; rows are never physically removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
  pub id:          i64,
  pub given_name:  String,
  pub family_name: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub middle_name: String,
  pub age:         u32,
  pub gender:      String,
  pub nationality: String,
  pub is_deleted:  bool,
}

/// A partial update for a stored record.
///
/// String and integer fields use the zero value to mean "no change"; the
/// delete flag is tri-state (absent / true / false). Unknown fields are
/// rejected at decode time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateRequest {
  pub given_name:  String,
  pub family_name: String,
  pub middle_name: String,
  pub age:         u32,
  pub gender:      String,
  pub nationality: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_deleted:  Option<bool>,
}
