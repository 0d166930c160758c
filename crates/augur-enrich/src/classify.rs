//! Attribute classification.
//!
//! Turns one provider's raw payload into a single-field contribution,
//! dispatching on the provider's configured kind. For the ranked-candidate
//! shape the winner is the candidate at index 0 — the provider pre-sorts
//! by probability descending, and the classifier neither re-sorts nor
//! validates monotonicity. An empty list is a defined error rather than an
//! out-of-bounds fault.

use augur_core::person::AggregateAttributes;

use crate::{
  Error, Result,
  provider::{Provider, ProviderKind, ProviderPayload},
};

/// A single-field delta contributed by one provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDelta {
  Age(u32),
  Gender(String),
  Nationality(String),
}

/// Extract `provider`'s contribution from its decoded payload.
///
/// Absent scalar fields contribute the zero value, matching the upstream
/// decode of a null or missing JSON field.
pub fn classify(provider: &Provider, payload: ProviderPayload) -> Result<AttributeDelta> {
  match provider.kind {
    ProviderKind::Age => Ok(AttributeDelta::Age(payload.age.unwrap_or(0))),
    ProviderKind::Gender => {
      Ok(AttributeDelta::Gender(payload.gender.unwrap_or_default()))
    }
    ProviderKind::Nationality => payload
      .country
      .into_iter()
      .next()
      .map(|candidate| AttributeDelta::Nationality(candidate.country_id))
      .ok_or_else(|| Error::ClassificationAmbiguous {
        endpoint: provider.endpoint.clone(),
      }),
  }
}

/// Fold one contribution into the task's aggregate.
pub fn apply_delta(aggregate: &mut AggregateAttributes, delta: AttributeDelta) {
  match delta {
    AttributeDelta::Age(age) => aggregate.age = Some(age),
    AttributeDelta::Gender(gender) => aggregate.gender = Some(gender),
    AttributeDelta::Nationality(nationality) => {
      aggregate.nationality = Some(nationality)
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::CountryCandidate;

  fn provider(kind: ProviderKind) -> Provider {
    Provider { kind, endpoint: "https://example.test/".into() }
  }

  #[test]
  fn age_payload_classifies_to_numeric_delta() {
    let payload = ProviderPayload { age: Some(20), ..ProviderPayload::default() };
    let delta = classify(&provider(ProviderKind::Age), payload).unwrap();
    assert_eq!(delta, AttributeDelta::Age(20));
  }

  #[test]
  fn absent_scalar_fields_contribute_zero_values() {
    let delta =
      classify(&provider(ProviderKind::Age), ProviderPayload::default()).unwrap();
    assert_eq!(delta, AttributeDelta::Age(0));

    let delta =
      classify(&provider(ProviderKind::Gender), ProviderPayload::default()).unwrap();
    assert_eq!(delta, AttributeDelta::Gender(String::new()));
  }

  #[test]
  fn nationality_takes_index_zero_without_resorting() {
    // Deliberately not sorted by probability: index 0 still wins.
    let payload = ProviderPayload {
      country: vec![
        CountryCandidate { country_id: "QWE".into(), probability: 0.2 },
        CountryCandidate { country_id: "RTY".into(), probability: 0.9 },
      ],
      ..ProviderPayload::default()
    };
    let delta = classify(&provider(ProviderKind::Nationality), payload).unwrap();
    assert_eq!(delta, AttributeDelta::Nationality("QWE".into()));
  }

  #[test]
  fn empty_candidate_list_is_ambiguous() {
    let err = classify(&provider(ProviderKind::Nationality), ProviderPayload::default())
      .unwrap_err();
    assert!(matches!(err, Error::ClassificationAmbiguous { .. }));
  }

  #[test]
  fn deltas_fold_into_the_aggregate() {
    let mut aggregate = AggregateAttributes::default();
    apply_delta(&mut aggregate, AttributeDelta::Age(20));
    apply_delta(&mut aggregate, AttributeDelta::Gender("male".into()));
    apply_delta(&mut aggregate, AttributeDelta::Nationality("QWE".into()));

    assert_eq!(aggregate.age, Some(20));
    assert_eq!(aggregate.gender.as_deref(), Some("male"));
    assert_eq!(aggregate.nationality.as_deref(), Some("QWE"));
  }
}
