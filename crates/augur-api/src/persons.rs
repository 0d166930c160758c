//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/persons` | Body: name triple; answers 202 before enrichment runs |
//! | `DELETE` | `/persons/{id}` | Soft delete; 404 when nothing was affected |
//! | `PUT`    | `/persons/{id}` | Partial update; 404 / 409 per outcome |
//! | `GET`    | `/persons` | Paged read with filters; 204 when empty |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Deserialize;

use augur_core::{
  filters::ReadFilters,
  person::{Subject, UpdateRequest},
  store::{PersonStore, UpdateOutcome},
};

use crate::{AppState, error::ApiError};

const MAX_PAGE_SIZE: u32 = 50;

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /persons` — body: `{"given_name":"...","family_name":"..."}`
///
/// Answers 202 Accepted immediately; enrichment and persistence happen on
/// a background task. A read straight after may not observe the record
/// yet — eventual consistency by design.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(subject): Json<Subject>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + Clone + 'static,
{
  subject
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  state.enricher.spawn(subject);
  Ok(StatusCode::ACCEPTED)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /persons/{id}`
pub async fn delete_by_id<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let rows = state
    .store
    .soft_delete(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if rows == 0 {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }
  Ok(StatusCode::OK)
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /persons/{id}` — body: partial [`UpdateRequest`].
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<UpdateRequest>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let outcome = state
    .store
    .apply_update(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  match outcome {
    UpdateOutcome::Applied => Ok(StatusCode::OK),
    UpdateOutcome::NotFound => {
      Err(ApiError::NotFound(format!("person {id} not found")))
    }
    UpdateOutcome::RowsUnaffected => {
      Err(ApiError::NotFound(format!("update of person {id} affected no rows")))
    }
    UpdateOutcome::IdentityConflict => Err(ApiError::Conflict(
      "a person with that name triple already exists".into(),
    )),
  }
}

// ─── Read ────────────────────────────────────────────────────────────────────

/// Query parameters of `GET /persons`.
///
/// Range bounds follow the upstream convention: `*gt` is an inclusive
/// lower bound, `*lt` an exclusive upper bound, and an exact `id`/`age`
/// overwrites both.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReadParams {
  pub page:        Option<u32>,
  pub limit:       Option<u32>,
  pub idgt:        Option<i64>,
  pub idlt:        Option<i64>,
  pub id:          Option<i64>,
  pub agegt:       Option<u32>,
  pub agelt:       Option<u32>,
  pub age:         Option<u32>,
  pub given_name:  Option<String>,
  pub family_name: Option<String>,
  pub middle_name: Option<String>,
  pub gender:      Option<String>,
  pub nationality: Option<String>,
}

fn build_filters(params: &ReadParams) -> Result<ReadFilters, ApiError> {
  let mut filters = ReadFilters {
    id_min:      params.idgt,
    id_max:      params.idlt,
    age_min:     params.agegt,
    age_max:     params.agelt,
    given_name:  params.given_name.clone(),
    family_name: params.family_name.clone(),
    middle_name: params.middle_name.clone(),
    gender:      params.gender.clone(),
    nationality: params.nationality.clone(),
  };

  if let Some(id) = params.id {
    filters = filters.with_id(id);
  }
  if let Some(age) = params.age {
    filters = filters.with_age(age);
  }

  let id_range_inverted = matches!(
    (filters.id_min, filters.id_max),
    (Some(min), Some(max)) if max < min
  );
  let age_range_inverted = matches!(
    (filters.age_min, filters.age_max),
    (Some(min), Some(max)) if max < min
  );
  if id_range_inverted || age_range_inverted {
    return Err(ApiError::BadRequest("inverted range bounds".into()));
  }

  Ok(filters)
}

/// `GET /persons[?page=..&limit=..&<filters>]` — 204 when nothing matches.
pub async fn read<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ReadParams>,
) -> Result<Response, ApiError>
where
  S: PersonStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = params.page.unwrap_or(1);
  let limit = params.limit.unwrap_or(10);
  if page < 1 || limit < 1 || limit > MAX_PAGE_SIZE {
    return Err(ApiError::BadRequest("page or limit out of bounds".into()));
  }

  let filters = build_filters(&params)?;

  let persons = state
    .store
    .read(page, limit, &filters)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if persons.is_empty() {
    Ok(StatusCode::NO_CONTENT.into_response())
  } else {
    Ok(Json(persons).into_response())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bounds_map_to_half_open_ranges() {
    let params = ReadParams {
      idgt: Some(5),
      idlt: Some(10),
      agegt: Some(18),
      ..ReadParams::default()
    };
    let filters = build_filters(&params).unwrap();
    assert_eq!(filters.id_min, Some(5));
    assert_eq!(filters.id_max, Some(10));
    assert_eq!(filters.age_min, Some(18));
    assert_eq!(filters.age_max, None);
  }

  #[test]
  fn exact_id_overwrites_range_bounds() {
    let params = ReadParams {
      idgt: Some(1),
      idlt: Some(100),
      id: Some(7),
      ..ReadParams::default()
    };
    let filters = build_filters(&params).unwrap();
    assert_eq!(filters.id_min, Some(7));
    assert_eq!(filters.id_max, Some(8));
  }

  #[test]
  fn exact_age_overwrites_range_bounds() {
    let params = ReadParams {
      agegt: Some(10),
      agelt: Some(90),
      age: Some(33),
      ..ReadParams::default()
    };
    let filters = build_filters(&params).unwrap();
    assert_eq!(filters.age_min, Some(33));
    assert_eq!(filters.age_max, Some(34));
  }

  #[test]
  fn inverted_ranges_are_rejected() {
    let params =
      ReadParams { idgt: Some(10), idlt: Some(5), ..ReadParams::default() };
    assert!(build_filters(&params).is_err());

    let params =
      ReadParams { agegt: Some(60), agelt: Some(30), ..ReadParams::default() };
    assert!(build_filters(&params).is_err());
  }
}
