//! Read-path filters.
//!
//! Range bounds are half-open: `min` is inclusive, `max` exclusive,
//! matching the upstream SQL (`>= $min AND < $max`). Equality filters on
//! an exact id or age are expressed by the caller as `[v, v + 1)`.

/// Optional filters applied by [`crate::store::PersonStore::read`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadFilters {
  pub id_min:      Option<i64>,
  pub id_max:      Option<i64>,
  pub age_min:     Option<u32>,
  pub age_max:     Option<u32>,
  pub given_name:  Option<String>,
  pub family_name: Option<String>,
  pub middle_name: Option<String>,
  pub gender:      Option<String>,
  pub nationality: Option<String>,
}

impl ReadFilters {
  /// Restrict ids to exactly `id`. At the top of the id domain the upper
  /// bound is left open; `[i64::MAX, ∞)` still matches only `i64::MAX`.
  pub fn with_id(mut self, id: i64) -> Self {
    self.id_min = Some(id);
    self.id_max = id.checked_add(1);
    self
  }

  /// Restrict ages to exactly `age`. Same open-upper-bound treatment as
  /// [`Self::with_id`] at `u32::MAX`.
  pub fn with_age(mut self, age: u32) -> Self {
    self.age_min = Some(age);
    self.age_max = age.checked_add(1);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exact_bounds_are_half_open() {
    let filters = ReadFilters::default().with_id(7).with_age(33);
    assert_eq!(filters.id_min, Some(7));
    assert_eq!(filters.id_max, Some(8));
    assert_eq!(filters.age_min, Some(33));
    assert_eq!(filters.age_max, Some(34));
  }

  #[test]
  fn exact_bounds_at_domain_maximum_do_not_overflow() {
    let filters =
      ReadFilters::default().with_id(i64::MAX).with_age(u32::MAX);
    assert_eq!(filters.id_min, Some(i64::MAX));
    assert_eq!(filters.id_max, None);
    assert_eq!(filters.age_min, Some(u32::MAX));
    assert_eq!(filters.age_max, None);
  }
}
