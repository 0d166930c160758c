//! Runtime server configuration, deserialised from `config.toml` layered
//! with `AUGUR_*` environment variables.
//!
//! Every field has a default, so the binary runs with no config file at
//! all: SQLite next to the binary, the three public attribute providers,
//! five attempts with 150 ms between them, a 5 second drain grace period.

use std::path::PathBuf;

use serde::Deserialize;

use augur_enrich::provider::{Provider, ProviderKind};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub providers:          Vec<Provider>,
  pub retry_attempts:     u32,
  pub retry_delay_ms:     u64,
  pub drain_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".into(),
      port:               8787,
      store_path:         PathBuf::from("augur.db"),
      providers:          default_providers(),
      retry_attempts:     5,
      retry_delay_ms:     150,
      drain_timeout_secs: 5,
    }
  }
}

fn default_providers() -> Vec<Provider> {
  vec![
    Provider {
      kind:     ProviderKind::Age,
      endpoint: "https://api.agify.io/".into(),
    },
    Provider {
      kind:     ProviderKind::Gender,
      endpoint: "https://api.genderize.io/".into(),
    },
    Provider {
      kind:     ProviderKind::Nationality,
      endpoint: "https://api.nationalize.io/".into(),
    },
  ]
}
