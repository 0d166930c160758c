//! [`SqlitePersonStore`] — the SQLite implementation of [`PersonStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use augur_core::{
  filters::ReadFilters,
  merge::merge_update,
  person::{AggregateAttributes, PersonRecord, Subject, UpdateRequest},
  store::{PersonStore, UpdateOutcome},
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An augur person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqlitePersonStore {
  conn: tokio_rusqlite::Connection,
}

impl SqlitePersonStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

const PERSON_COLUMNS: &str =
  "id, given_name, family_name, middle_name, age, gender, nationality, is_deleted";

fn row_to_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<PersonRecord> {
  Ok(PersonRecord {
    id:          row.get(0)?,
    given_name:  row.get(1)?,
    family_name: row.get(2)?,
    middle_name: row.get(3)?,
    age:         row.get(4)?,
    gender:      row.get(5)?,
    nationality: row.get(6)?,
    is_deleted:  row.get(7)?,
  })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqlitePersonStore {
  type Error = Error;

  async fn upsert_on_identity(
    &self,
    subject: &Subject,
    attributes: &AggregateAttributes,
  ) -> Result<()> {
    let given  = subject.given_name.clone();
    let family = subject.family_name.clone();
    let middle = subject.middle_name.clone();
    // Providers that answer without the field contribute the zero value,
    // matching the upstream decode of absent JSON fields.
    let age         = attributes.age.unwrap_or(0);
    let gender      = attributes.gender.clone().unwrap_or_default();
    let nationality = attributes.nationality.clone().unwrap_or_default();

    self
      .conn
      .call(move |conn| {
        // Resurrection rule: the conditional DO UPDATE only fires for a
        // soft-deleted row; an active duplicate is silently dropped.
        conn.execute(
          "INSERT INTO persons
             (given_name, family_name, middle_name, age, gender, nationality, is_deleted)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
           ON CONFLICT (given_name, family_name, middle_name) DO UPDATE SET
             age         = excluded.age,
             gender      = excluded.gender,
             nationality = excluded.nationality,
             is_deleted  = excluded.is_deleted
           WHERE persons.is_deleted = 1",
          rusqlite::params![given, family, middle, age, gender, nationality],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn soft_delete(&self, id: i64) -> Result<u64> {
    let rows = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "UPDATE persons SET is_deleted = 1 WHERE id = ?1 AND is_deleted != 1",
          rusqlite::params![id],
        )?;
        Ok(rows as u64)
      })
      .await?;
    Ok(rows)
  }

  async fn apply_update(&self, id: i64, patch: UpdateRequest) -> Result<UpdateOutcome> {
    let outcome = self
      .conn
      .call(move |conn| {
        let previous: Option<PersonRecord> = conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
            rusqlite::params![id],
            row_to_person,
          )
          .optional()?;

        let Some(previous) = previous else {
          return Ok(UpdateOutcome::NotFound);
        };

        // The previous delete flag is fed in as absent, so a patch with no
        // delete information resolves the flag to true (the documented
        // implicit soft-delete default).
        let merged = merge_update(&previous, None, patch);

        let result = conn.execute(
          "UPDATE persons SET
             given_name  = ?1,
             family_name = ?2,
             middle_name = ?3,
             age         = ?4,
             gender      = ?5,
             nationality = ?6,
             is_deleted  = ?7
           WHERE id = ?8",
          rusqlite::params![
            merged.given_name,
            merged.family_name,
            merged.middle_name,
            merged.age,
            merged.gender,
            merged.nationality,
            merged.is_deleted,
            id,
          ],
        );

        match result {
          Ok(0) => Ok(UpdateOutcome::RowsUnaffected),
          Ok(_) => Ok(UpdateOutcome::Applied),
          Err(ref e) if is_unique_violation(e) => Ok(UpdateOutcome::IdentityConflict),
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(outcome)
  }

  async fn read(
    &self,
    page: u32,
    limit: u32,
    filters: &ReadFilters,
  ) -> Result<Vec<PersonRecord>> {
    let id_min  = filters.id_min.unwrap_or(0);
    let id_max  = filters.id_max;
    let age_min = i64::from(filters.age_min.unwrap_or(0));
    let age_max = filters.age_max.map(i64::from);
    let given       = filters.given_name.clone();
    let family      = filters.family_name.clone();
    let middle      = filters.middle_name.clone();
    let gender      = filters.gender.clone();
    let nationality = filters.nationality.clone();
    let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);
    let limit  = i64::from(limit);

    let persons = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE id >= ?1 AND (?2 IS NULL OR id < ?2)
             AND age >= ?3 AND (?4 IS NULL OR age < ?4)
             AND (?5 IS NULL OR given_name  = ?5)
             AND (?6 IS NULL OR family_name = ?6)
             AND (?7 IS NULL OR middle_name = ?7)
             AND (?8 IS NULL OR gender      = ?8)
             AND (?9 IS NULL OR nationality = ?9)
             AND is_deleted != 1
           ORDER BY id
           LIMIT ?10 OFFSET ?11"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![
              id_min,
              id_max,
              age_min,
              age_max,
              given,
              family,
              middle,
              gender,
              nationality,
              limit,
              offset,
            ],
            row_to_person,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(persons)
  }

  async fn fetch(&self, id: i64) -> Result<Option<PersonRecord>> {
    let person = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
              rusqlite::params![id],
              row_to_person,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(person)
  }
}
