//! Provider registry and the HTTP client with its retry policy.
//!
//! Each configured provider carries an explicit [`ProviderKind`]; nothing
//! is inferred from the endpoint URL. The client performs up to
//! `attempts` sequential tries per fetch with a fixed delay in between —
//! no backoff multiplier. There is deliberately no per-attempt timeout
//! beyond the transport's own; a hanging provider stalls its task until
//! the transport gives up.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use augur_core::person::Subject;

use crate::{Error, Result};

// ─── Registry ────────────────────────────────────────────────────────────────

/// The attribute category a provider produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
  /// Scalar numeric response (`{"age": 20}`).
  Age,
  /// Scalar categorical response (`{"gender": "male"}`).
  Gender,
  /// Ranked-candidate list response (`{"country": [...]}`).
  Nationality,
}

/// One configured external attribute provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
  pub kind:     ProviderKind,
  pub endpoint: String,
}

impl Provider {
  /// The query token sent for `subject`. The nationality provider is
  /// keyed on the family name; the others on the given name.
  pub fn subject_token<'a>(&self, subject: &'a Subject) -> &'a str {
    match self.kind {
      ProviderKind::Nationality => &subject.family_name,
      ProviderKind::Age | ProviderKind::Gender => &subject.given_name,
    }
  }
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// Raw decoded provider response. A superset of the three shapes the
/// providers answer with; absent fields stay at their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPayload {
  pub age:    Option<u32>,
  pub gender: Option<String>,
  #[serde(default)]
  pub country: Vec<CountryCandidate>,
}

/// One entry of the ranked nationality list, probability in [0, 1].
#[derive(Debug, Clone, Deserialize)]
pub struct CountryCandidate {
  pub country_id:  String,
  pub probability: f64,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Bounded retry policy: `attempts` sequential tries, `delay` between them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
  pub attempts: u32,
  pub delay:    Duration,
}

/// Stateless HTTP client for provider lookups.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. Safe to
/// invoke concurrently for different providers.
#[derive(Clone)]
pub struct ProviderClient {
  http:  reqwest::Client,
  retry: RetryPolicy,
}

impl ProviderClient {
  pub fn new(retry: RetryPolicy) -> Result<Self> {
    let http = reqwest::Client::builder().build()?;
    Ok(Self { http, retry })
  }

  /// Fetch one provider's payload for `token`, applying the retry policy.
  ///
  /// A transport error, a status outside [200, 400), or a decode failure
  /// each consume one attempt. Exhausting all attempts yields the
  /// terminal [`Error::ProviderUnavailable`].
  pub async fn fetch(&self, provider: &Provider, token: &str) -> Result<ProviderPayload> {
    let attempts = self.retry.attempts.max(1);

    for attempt in 1..=attempts {
      match self.attempt(provider, token).await {
        Ok(payload) => {
          tracing::debug!(endpoint = %provider.endpoint, attempt, "provider answered");
          return Ok(payload);
        }
        Err(error) => {
          tracing::debug!(
            endpoint = %provider.endpoint,
            attempt,
            %error,
            "provider attempt failed"
          );
          if attempt < attempts {
            tokio::time::sleep(self.retry.delay).await;
          }
        }
      }
    }

    Err(Error::ProviderUnavailable {
      endpoint: provider.endpoint.clone(),
      attempts,
    })
  }

  async fn attempt(&self, provider: &Provider, token: &str) -> Result<ProviderPayload> {
    let response = self
      .http
      .get(&provider.endpoint)
      .query(&[("name", token)])
      .send()
      .await?;

    // Redirect statuses count as success for classification purposes.
    let status = response.status().as_u16();
    if !(200..400).contains(&status) {
      return Err(Error::WrongStatus(status));
    }

    Ok(response.json().await?)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn subject() -> Subject {
    Subject {
      given_name:  "Dmitriy".into(),
      family_name: "Sidorov".into(),
      middle_name: String::new(),
    }
  }

  #[test]
  fn nationality_is_keyed_on_family_name() {
    let provider = Provider {
      kind:     ProviderKind::Nationality,
      endpoint: "https://api.nationalize.io/".into(),
    };
    assert_eq!(provider.subject_token(&subject()), "Sidorov");
  }

  #[test]
  fn age_and_gender_are_keyed_on_given_name() {
    for kind in [ProviderKind::Age, ProviderKind::Gender] {
      let provider = Provider { kind, endpoint: String::new() };
      assert_eq!(provider.subject_token(&subject()), "Dmitriy");
    }
  }
}
