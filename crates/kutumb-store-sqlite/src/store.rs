//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`].
//!
//! The soft-delete visibility predicate lives in exactly one place
//! ([`VISIBLE`]) and is appended to every read path, so list, get, and
//! exists can never diverge on what "deleted" means.

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Transaction, params};

use kutumb_core::{
  family::{ChildDraft, ChildRecord, SpouseDraft, SpouseRecord},
  person::{IncomeRange, Occupation, Person, PersonDraft, PersonRecord},
  store::{Page, PageRequest, PersonStore},
};

use crate::{
  Error, Result,
  encode::{RawChild, RawPerson, RawSpouse, encode_date, encode_dt},
  schema::SCHEMA,
};

// ─── Predicates and column lists ─────────────────────────────────────────────

/// The visibility filter. Soft-deleted rows are invisible to every read.
const VISIBLE: &str = "is_deleted = 0";

/// Case-sensitive substring match over the four searchable columns.
/// SQLite `LIKE` is case-insensitive for ASCII, so `instr` is used instead.
/// `instr(NULL, ...)` is NULL, which is falsy — rows with no email or
/// aadhaar simply don't match on those columns.
const SEARCH_MATCH: &str = "(instr(full_name, ?1) > 0 \
   OR instr(phone_number, ?1) > 0 \
   OR instr(email, ?1) > 0 \
   OR instr(aadhaar_number, ?1) > 0)";

const PERSON_COLUMNS: &str = "id, full_name, phone_number, \
   residential_status, address, alternate_number, date_of_birth, \
   caste_group, aadhaar_number, qualification, marriage_date, blood_group, \
   occupation, occupation_detail, monthly_income, email, father_name, \
   father_occupation, father_death_year, mother_name, mother_occupation, \
   mother_death_year, declared_spouse_count, declared_child_count, \
   feedback, created_at, updated_at";

const SPOUSE_COLUMNS: &str = "id, name, date_of_birth, occupation, \
   native_place, caste, qualification, blood_group, marital_status, \
   created_at, updated_at";

const CHILD_COLUMNS: &str = "id, name, gender, date_of_birth, \
   qualification, marital_status, blood_group, physically_challenged, \
   created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
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

// ─── Row readers ─────────────────────────────────────────────────────────────

fn read_person_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    id:                    row.get(0)?,
    full_name:             row.get(1)?,
    phone_number:          row.get(2)?,
    residential_status:    row.get(3)?,
    address:               row.get(4)?,
    alternate_number:      row.get(5)?,
    date_of_birth:         row.get(6)?,
    caste_group:           row.get(7)?,
    aadhaar_number:        row.get(8)?,
    qualification:         row.get(9)?,
    marriage_date:         row.get(10)?,
    blood_group:           row.get(11)?,
    occupation:            row.get(12)?,
    occupation_detail:     row.get(13)?,
    monthly_income:        row.get(14)?,
    email:                 row.get(15)?,
    father_name:           row.get(16)?,
    father_occupation:     row.get(17)?,
    father_death_year:     row.get(18)?,
    mother_name:           row.get(19)?,
    mother_occupation:     row.get(20)?,
    mother_death_year:     row.get(21)?,
    declared_spouse_count: row.get(22)?,
    declared_child_count:  row.get(23)?,
    feedback:              row.get(24)?,
    created_at:            row.get(25)?,
    updated_at:            row.get(26)?,
  })
}

fn read_spouse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSpouse> {
  Ok(RawSpouse {
    id:             row.get(0)?,
    name:           row.get(1)?,
    date_of_birth:  row.get(2)?,
    occupation:     row.get(3)?,
    native_place:   row.get(4)?,
    caste:          row.get(5)?,
    qualification:  row.get(6)?,
    blood_group:    row.get(7)?,
    marital_status: row.get(8)?,
    created_at:     row.get(9)?,
    updated_at:     row.get(10)?,
  })
}

fn read_child_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawChild> {
  Ok(RawChild {
    id:                    row.get(0)?,
    name:                  row.get(1)?,
    gender:                row.get(2)?,
    date_of_birth:         row.get(3)?,
    qualification:         row.get(4)?,
    marital_status:        row.get(5)?,
    blood_group:           row.get(6)?,
    physically_challenged: row.get(7)?,
    created_at:            row.get(8)?,
    updated_at:            row.get(9)?,
  })
}

// ─── Hydration helpers ───────────────────────────────────────────────────────

type RawAggregate = (RawPerson, Vec<RawSpouse>, Vec<RawChild>);

fn load_members(
  conn: &rusqlite::Connection,
  person_id: i64,
) -> rusqlite::Result<(Vec<RawSpouse>, Vec<RawChild>)> {
  let spouses = conn
    .prepare(&format!(
      "SELECT {SPOUSE_COLUMNS} FROM spouses WHERE person_id = ?1"
    ))?
    .query_map([person_id], read_spouse_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let children = conn
    .prepare(&format!(
      "SELECT {CHILD_COLUMNS} FROM children WHERE person_id = ?1"
    ))?
    .query_map([person_id], read_child_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok((spouses, children))
}

/// Load the visible root row plus both member collections, or `None` if the
/// id is unknown or soft-deleted.
fn load_raw_aggregate(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawAggregate>> {
  let raw = conn
    .query_row(
      &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1 AND {VISIBLE}"),
      [id],
      read_person_row,
    )
    .optional()?;

  let Some(raw) = raw else { return Ok(None) };
  let (spouses, children) = load_members(conn, raw.id)?;
  Ok(Some((raw, spouses, children)))
}

fn decode_aggregate(
  (raw, spouses, children): RawAggregate,
) -> Result<Person> {
  let spouses = spouses
    .into_iter()
    .map(RawSpouse::into_spouse)
    .collect::<Result<Vec<_>>>()?;
  let children = children
    .into_iter()
    .map(RawChild::into_child)
    .collect::<Result<Vec<_>>>()?;
  raw.into_person(spouses, children)
}

// ─── Row writers ─────────────────────────────────────────────────────────────

fn insert_person_row(
  tx: &Transaction<'_>,
  record: &PersonRecord,
  now: &str,
) -> rusqlite::Result<i64> {
  tx.execute(
    "INSERT INTO persons (
       full_name, phone_number, residential_status, address,
       alternate_number, date_of_birth, caste_group, aadhaar_number,
       qualification, marriage_date, blood_group, occupation,
       occupation_detail, monthly_income, email, father_name,
       father_occupation, father_death_year, mother_name,
       mother_occupation, mother_death_year, declared_spouse_count,
       declared_child_count, feedback, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
               ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)",
    params![
      record.full_name,
      record.phone_number,
      record.residential_status.as_str(),
      record.address,
      record.alternate_number,
      record.date_of_birth.map(encode_date),
      record.caste_group,
      record.aadhaar_number,
      record.qualification,
      record.marriage_date.map(encode_date),
      record.blood_group,
      record.occupation.map(Occupation::as_str),
      record.occupation_detail,
      record.monthly_income.map(IncomeRange::as_str),
      record.email,
      record.father_name,
      record.father_occupation,
      record.father_death_year,
      record.mother_name,
      record.mother_occupation,
      record.mother_death_year,
      record.declared_spouse_count,
      record.declared_child_count,
      record.feedback,
      now,
    ],
  )?;
  Ok(tx.last_insert_rowid())
}

/// Overwrite every scalar column unconditionally and stamp `updated_at`.
/// `created_at` and the deletion columns are never touched here.
fn overwrite_person_row(
  tx: &Transaction<'_>,
  id: i64,
  record: &PersonRecord,
  now: &str,
) -> rusqlite::Result<()> {
  tx.execute(
    "UPDATE persons SET
       full_name = ?1, phone_number = ?2, residential_status = ?3,
       address = ?4, alternate_number = ?5, date_of_birth = ?6,
       caste_group = ?7, aadhaar_number = ?8, qualification = ?9,
       marriage_date = ?10, blood_group = ?11, occupation = ?12,
       occupation_detail = ?13, monthly_income = ?14, email = ?15,
       father_name = ?16, father_occupation = ?17, father_death_year = ?18,
       mother_name = ?19, mother_occupation = ?20, mother_death_year = ?21,
       declared_spouse_count = ?22, declared_child_count = ?23,
       feedback = ?24, updated_at = ?25
     WHERE id = ?26",
    params![
      record.full_name,
      record.phone_number,
      record.residential_status.as_str(),
      record.address,
      record.alternate_number,
      record.date_of_birth.map(encode_date),
      record.caste_group,
      record.aadhaar_number,
      record.qualification,
      record.marriage_date.map(encode_date),
      record.blood_group,
      record.occupation.map(Occupation::as_str),
      record.occupation_detail,
      record.monthly_income.map(IncomeRange::as_str),
      record.email,
      record.father_name,
      record.father_occupation,
      record.father_death_year,
      record.mother_name,
      record.mother_occupation,
      record.mother_death_year,
      record.declared_spouse_count,
      record.declared_child_count,
      record.feedback,
      now,
      id,
    ],
  )?;
  Ok(())
}

fn insert_spouse_row(
  tx: &Transaction<'_>,
  person_id: i64,
  record: &SpouseRecord,
  now: &str,
) -> rusqlite::Result<i64> {
  tx.execute(
    "INSERT INTO spouses (
       person_id, name, date_of_birth, occupation, native_place, caste,
       qualification, blood_group, marital_status, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    params![
      person_id,
      record.name,
      encode_date(record.date_of_birth),
      record.occupation,
      record.native_place,
      record.caste,
      record.qualification,
      record.blood_group,
      record.marital_status.as_str(),
      now,
    ],
  )?;
  Ok(tx.last_insert_rowid())
}

fn overwrite_spouse_row(
  tx: &Transaction<'_>,
  id: i64,
  record: &SpouseRecord,
  now: &str,
) -> rusqlite::Result<()> {
  tx.execute(
    "UPDATE spouses SET
       name = ?1, date_of_birth = ?2, occupation = ?3, native_place = ?4,
       caste = ?5, qualification = ?6, blood_group = ?7,
       marital_status = ?8, updated_at = ?9
     WHERE id = ?10",
    params![
      record.name,
      encode_date(record.date_of_birth),
      record.occupation,
      record.native_place,
      record.caste,
      record.qualification,
      record.blood_group,
      record.marital_status.as_str(),
      now,
      id,
    ],
  )?;
  Ok(())
}

fn insert_child_row(
  tx: &Transaction<'_>,
  person_id: i64,
  record: &ChildRecord,
  now: &str,
) -> rusqlite::Result<i64> {
  tx.execute(
    "INSERT INTO children (
       person_id, name, gender, date_of_birth, qualification,
       marital_status, blood_group, physically_challenged, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    params![
      person_id,
      record.name,
      record.gender.as_str(),
      encode_date(record.date_of_birth),
      record.qualification,
      record.marital_status.as_str(),
      record.blood_group,
      record.physically_challenged,
      now,
    ],
  )?;
  Ok(tx.last_insert_rowid())
}

fn overwrite_child_row(
  tx: &Transaction<'_>,
  id: i64,
  record: &ChildRecord,
  now: &str,
) -> rusqlite::Result<()> {
  tx.execute(
    "UPDATE children SET
       name = ?1, gender = ?2, date_of_birth = ?3, qualification = ?4,
       marital_status = ?5, blood_group = ?6, physically_challenged = ?7,
       updated_at = ?8
     WHERE id = ?9",
    params![
      record.name,
      record.gender.as_str(),
      encode_date(record.date_of_birth),
      record.qualification,
      record.marital_status.as_str(),
      record.blood_group,
      record.physically_challenged,
      now,
      id,
    ],
  )?;
  Ok(())
}

// ─── Reconciliation ──────────────────────────────────────────────────────────

// Both reconcilers are an explicit two-set comparison on member identity:
// current ids not in the supplied set are deleted, supplied drafts with an
// id are overwritten in place, drafts without one are inserted. A supplied
// id outside the current set is reported back so the caller can abort the
// transaction.

fn reconcile_spouses(
  tx: &Transaction<'_>,
  person_id: i64,
  drafts: &[SpouseDraft],
  now: &str,
) -> rusqlite::Result<Option<i64>> {
  let current: HashSet<i64> = tx
    .prepare("SELECT id FROM spouses WHERE person_id = ?1")?
    .query_map([person_id], |row| row.get(0))?
    .collect::<rusqlite::Result<_>>()?;
  let supplied: HashSet<i64> = drafts.iter().filter_map(|d| d.id).collect();

  if let Some(foreign) = supplied.difference(&current).next() {
    return Ok(Some(*foreign));
  }
  for removed in current.difference(&supplied) {
    tx.execute("DELETE FROM spouses WHERE id = ?1", [removed])?;
  }
  for draft in drafts {
    match draft.id {
      Some(id) => overwrite_spouse_row(tx, id, &draft.record, now)?,
      None => {
        insert_spouse_row(tx, person_id, &draft.record, now)?;
      }
    }
  }
  Ok(None)
}

fn reconcile_children(
  tx: &Transaction<'_>,
  person_id: i64,
  drafts: &[ChildDraft],
  now: &str,
) -> rusqlite::Result<Option<i64>> {
  let current: HashSet<i64> = tx
    .prepare("SELECT id FROM children WHERE person_id = ?1")?
    .query_map([person_id], |row| row.get(0))?
    .collect::<rusqlite::Result<_>>()?;
  let supplied: HashSet<i64> = drafts.iter().filter_map(|d| d.id).collect();

  if let Some(foreign) = supplied.difference(&current).next() {
    return Ok(Some(*foreign));
  }
  for removed in current.difference(&supplied) {
    tx.execute("DELETE FROM children WHERE id = ?1", [removed])?;
  }
  for draft in drafts {
    match draft.id {
      Some(id) => overwrite_child_row(tx, id, &draft.record, now)?,
      None => {
        insert_child_row(tx, person_id, &draft.record, now)?;
      }
    }
  }
  Ok(None)
}

/// Result of the update transaction, resolved to an error or `None` outside
/// the connection closure. Any non-`Done` outcome leaves the transaction
/// uncommitted, so dropping it rolls everything back.
enum UpdateOutcome {
  Done(RawAggregate),
  NotFound,
  ForeignSpouse(i64),
  ForeignChild(i64),
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_page(&self, request: PageRequest) -> Result<Page> {
    let term = request
      .search
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_owned);
    let limit = i64::from(request.page_size);
    // u32::MAX * u32::MAX exceeds i64; saturate rather than wrap, so an
    // absurd page number yields an empty page instead of page 1.
    let offset = (u64::from(request.page_number) - 1)
      .saturating_mul(u64::from(request.page_size))
      .min(i64::MAX as u64) as i64;

    let (raws, total) = self
      .conn
      .call(move |conn| {
        let (total, raw_persons): (i64, Vec<RawPerson>) = match &term {
          Some(t) => {
            let total = conn.query_row(
              &format!(
                "SELECT COUNT(*) FROM persons WHERE {VISIBLE} AND {SEARCH_MATCH}"
              ),
              params![t],
              |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
              "SELECT {PERSON_COLUMNS} FROM persons
               WHERE {VISIBLE} AND {SEARCH_MATCH}
               ORDER BY created_at DESC, id DESC
               LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt
              .query_map(params![t, limit, offset], read_person_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            (total, rows)
          }
          None => {
            let total = conn.query_row(
              &format!("SELECT COUNT(*) FROM persons WHERE {VISIBLE}"),
              [],
              |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
              "SELECT {PERSON_COLUMNS} FROM persons
               WHERE {VISIBLE}
               ORDER BY created_at DESC, id DESC
               LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt
              .query_map(params![limit, offset], read_person_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            (total, rows)
          }
        };

        let mut hydrated = Vec::with_capacity(raw_persons.len());
        for raw in raw_persons {
          let (spouses, children) = load_members(conn, raw.id)?;
          hydrated.push((raw, spouses, children));
        }
        Ok((hydrated, total))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(decode_aggregate)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page {
      items,
      total_count: total as u64,
    })
  }

  async fn get_person(&self, id: i64) -> Result<Option<Person>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_raw_aggregate(conn, id)?))
      .await?;
    raw.map(decode_aggregate).transpose()
  }

  async fn person_exists(&self, id: i64) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT 1 FROM persons WHERE id = ?1 AND {VISIBLE}"),
              [id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_person(&self, draft: PersonDraft) -> Result<Person> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = insert_person_row(&tx, &draft.record, &now)?;
        for spouse in &draft.spouses {
          insert_spouse_row(&tx, person_id, &spouse.record, &now)?;
        }
        for child in &draft.children {
          insert_child_row(&tx, person_id, &child.record, &now)?;
        }
        // Read back through the transaction so the returned aggregate is
        // exactly what was committed.
        let hydrated = load_raw_aggregate(&tx, person_id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(hydrated)
      })
      .await?;

    decode_aggregate(raw)
  }

  async fn update_person(
    &self,
    id: i64,
    draft: PersonDraft,
  ) -> Result<Option<Person>> {
    let now = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let visible: bool = tx
          .query_row(
            &format!("SELECT 1 FROM persons WHERE id = ?1 AND {VISIBLE}"),
            [id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !visible {
          return Ok(UpdateOutcome::NotFound);
        }

        overwrite_person_row(&tx, id, &draft.record, &now)?;
        if let Some(foreign) = reconcile_spouses(&tx, id, &draft.spouses, &now)?
        {
          return Ok(UpdateOutcome::ForeignSpouse(foreign));
        }
        if let Some(foreign) =
          reconcile_children(&tx, id, &draft.children, &now)?
        {
          return Ok(UpdateOutcome::ForeignChild(foreign));
        }

        let hydrated = load_raw_aggregate(&tx, id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(UpdateOutcome::Done(hydrated))
      })
      .await?;

    match outcome {
      UpdateOutcome::Done(raw) => decode_aggregate(raw).map(Some),
      UpdateOutcome::NotFound => Ok(None),
      UpdateOutcome::ForeignSpouse(spouse_id) => Err(Error::ForeignSpouse {
        spouse_id,
        person_id: id,
      }),
      UpdateOutcome::ForeignChild(child_id) => Err(Error::ForeignChild {
        child_id,
        person_id: id,
      }),
    }
  }

  async fn delete_person(&self, id: i64) -> Result<bool> {
    let now = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!(
            "UPDATE persons SET is_deleted = 1, deleted_at = ?1
             WHERE id = ?2 AND {VISIBLE}"
          ),
          params![now, id],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
