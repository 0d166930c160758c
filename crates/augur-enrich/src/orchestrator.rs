//! Enrichment orchestrator.
//!
//! One [`Enricher::spawn`] call submits one independent background task:
//! the caller is acknowledged immediately, the task registers with the
//! drain coordinator, runs provider fetch + classification in the
//! configured order and hands the aggregate to the store once. The first
//! provider failure aborts the whole task — nothing partial is ever
//! persisted — and is logged, never surfaced to the caller.

use std::sync::Arc;

use augur_core::{
  person::{AggregateAttributes, Subject},
  store::PersonStore,
};

use crate::{
  Error, Result,
  classify::{apply_delta, classify},
  drain::DrainCoordinator,
  provider::{Provider, ProviderClient},
};

/// Owns the provider registry, the HTTP client and the store handle for
/// all enrichment tasks.
pub struct Enricher<S> {
  client:    ProviderClient,
  providers: Vec<Provider>,
  store:     Arc<S>,
  drain:     DrainCoordinator,
}

impl<S> Enricher<S>
where
  S: PersonStore + 'static,
{
  pub fn new(
    client: ProviderClient,
    providers: Vec<Provider>,
    store: Arc<S>,
    drain: DrainCoordinator,
  ) -> Self {
    Self { client, providers, store, drain }
  }

  pub fn providers(&self) -> &[Provider] {
    &self.providers
  }

  /// Submit one background enrichment task for `subject` and return
  /// immediately.
  ///
  /// The task owns its own error handling; terminal failures are logged.
  /// Its drain registration is released when the task finishes, however
  /// it finishes.
  pub fn spawn(&self, subject: Subject) {
    let guard = self.drain.register();
    let client = self.client.clone();
    let providers = self.providers.clone();
    let store = Arc::clone(&self.store);

    tokio::spawn(async move {
      let _guard = guard;
      if let Err(error) = run(&client, &providers, &store, &subject).await {
        tracing::warn!(
          given = %subject.given_name,
          family = %subject.family_name,
          %error,
          "enrichment task aborted"
        );
      }
    });
  }

  /// Run one enrichment synchronously. `spawn` drives this on a
  /// background task; tests call it directly.
  pub async fn enrich(&self, subject: &Subject) -> Result<()> {
    run(&self.client, &self.providers, &self.store, subject).await
  }
}

/// Fetch and classify each provider in order, fold the contributions, and
/// upsert the result. Fail-fast: the first error short-circuits the rest.
async fn run<S>(
  client: &ProviderClient,
  providers: &[Provider],
  store: &Arc<S>,
  subject: &Subject,
) -> Result<()>
where
  S: PersonStore,
{
  let mut aggregate = AggregateAttributes::default();

  for provider in providers {
    let payload = client.fetch(provider, provider.subject_token(subject)).await?;
    let delta = classify(provider, payload)?;
    apply_delta(&mut aggregate, delta);
  }

  store
    .upsert_on_identity(subject, &aggregate)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::info!(
    given = %subject.given_name,
    family = %subject.family_name,
    "enriched record persisted"
  );
  Ok(())
}
