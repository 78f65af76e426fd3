//! Person — the root entity of the registry aggregate.
//!
//! A person owns its spouse and child collections exclusively: member rows
//! exist only as part of a person and are written only through a person
//! create or update. The scalar payload lives in [`PersonRecord`] so that the
//! persisted shape ([`Person`]) and the write shape ([`PersonDraft`]) share
//! one field list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  family::{Child, ChildDraft, Spouse, SpouseDraft},
};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Housing situation at the registered address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResidentialStatus {
  Owned,
  Rented,
  Ancestral,
  Other,
}

impl ResidentialStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Owned => "owned",
      Self::Rented => "rented",
      Self::Ancestral => "ancestral",
      Self::Other => "other",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "owned" => Ok(Self::Owned),
      "rented" => Ok(Self::Rented),
      "ancestral" => Ok(Self::Ancestral),
      "other" => Ok(Self::Other),
      other => Err(Error::UnknownVariant {
        field: "residential_status",
        value: other.to_owned(),
      }),
    }
  }
}

/// Broad occupation category; free-text detail lives in
/// [`PersonRecord::occupation_detail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Occupation {
  Salaried,
  Business,
  SelfEmployed,
  Agriculture,
  Student,
  Homemaker,
  Retired,
  Unemployed,
  Other,
}

impl Occupation {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Salaried => "salaried",
      Self::Business => "business",
      Self::SelfEmployed => "self-employed",
      Self::Agriculture => "agriculture",
      Self::Student => "student",
      Self::Homemaker => "homemaker",
      Self::Retired => "retired",
      Self::Unemployed => "unemployed",
      Self::Other => "other",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "salaried" => Ok(Self::Salaried),
      "business" => Ok(Self::Business),
      "self-employed" => Ok(Self::SelfEmployed),
      "agriculture" => Ok(Self::Agriculture),
      "student" => Ok(Self::Student),
      "homemaker" => Ok(Self::Homemaker),
      "retired" => Ok(Self::Retired),
      "unemployed" => Ok(Self::Unemployed),
      "other" => Ok(Self::Other),
      other => Err(Error::UnknownVariant {
        field: "occupation",
        value: other.to_owned(),
      }),
    }
  }
}

/// Declared monthly income bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeRange {
  #[serde(rename = "below-10k")]
  Below10K,
  #[serde(rename = "10k-25k")]
  From10KTo25K,
  #[serde(rename = "25k-50k")]
  From25KTo50K,
  #[serde(rename = "50k-1l")]
  From50KTo1L,
  #[serde(rename = "above-1l")]
  Above1L,
}

impl IncomeRange {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Below10K => "below-10k",
      Self::From10KTo25K => "10k-25k",
      Self::From25KTo50K => "25k-50k",
      Self::From50KTo1L => "50k-1l",
      Self::Above1L => "above-1l",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "below-10k" => Ok(Self::Below10K),
      "10k-25k" => Ok(Self::From10KTo25K),
      "25k-50k" => Ok(Self::From25KTo50K),
      "50k-1l" => Ok(Self::From50KTo1L),
      "above-1l" => Ok(Self::Above1L),
      other => Err(Error::UnknownVariant {
        field: "monthly_income",
        value: other.to_owned(),
      }),
    }
  }
}

// ─── Scalar payload ──────────────────────────────────────────────────────────

/// Every scalar field on the root row. Mandatory fields first, then the
/// optional block in the order the registration form asks for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
  pub full_name:             String,
  pub phone_number:          String,
  pub residential_status:    ResidentialStatus,
  pub address:               String,

  pub alternate_number:      Option<String>,
  pub date_of_birth:         Option<NaiveDate>,
  pub caste_group:           Option<String>,
  pub aadhaar_number:        Option<String>,
  pub qualification:         Option<String>,
  pub marriage_date:         Option<NaiveDate>,
  pub blood_group:           Option<String>,
  pub occupation:            Option<Occupation>,
  pub occupation_detail:     Option<String>,
  pub monthly_income:        Option<IncomeRange>,
  pub email:                 Option<String>,
  pub father_name:           Option<String>,
  pub father_occupation:     Option<String>,
  pub father_death_year:     Option<i32>,
  pub mother_name:           Option<String>,
  pub mother_occupation:     Option<String>,
  pub mother_death_year:     Option<i32>,
  /// Self-declared counts; the actual collections are authoritative.
  pub declared_spouse_count: Option<u32>,
  pub declared_child_count:  Option<u32>,
  pub feedback:              Option<String>,
}

// ─── Persisted aggregate ─────────────────────────────────────────────────────

/// A fully hydrated person aggregate as returned by every read path.
///
/// `created_at` is stamped once at insert and never changes; `updated_at` is
/// absent until the first update and then strictly increases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:         i64,
  #[serde(flatten)]
  pub record:     PersonRecord,
  pub spouses:    Vec<Spouse>,
  pub children:   Vec<Child>,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

// ─── Write shape ─────────────────────────────────────────────────────────────

/// Caller-supplied aggregate for create and update.
///
/// On update the member drafts drive reconciliation: a draft with an `id` is
/// keep/modify, a draft without one is an insert, and any current member
/// whose id is absent from the list is removed. On create all member ids are
/// ignored — the engine assigns every identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDraft {
  #[serde(flatten)]
  pub record:   PersonRecord,
  #[serde(default)]
  pub spouses:  Vec<SpouseDraft>,
  #[serde(default)]
  pub children: Vec<ChildDraft>,
}
