//! Spouse and child member entities.
//!
//! Members reference their parent person by foreign key only; there is no
//! back-pointer in the object graph. They are never addressable on their own
//! — every write goes through a person create or update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
  Single,
  Married,
  Widowed,
  Divorced,
  Separated,
}

impl MaritalStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Single => "single",
      Self::Married => "married",
      Self::Widowed => "widowed",
      Self::Divorced => "divorced",
      Self::Separated => "separated",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "single" => Ok(Self::Single),
      "married" => Ok(Self::Married),
      "widowed" => Ok(Self::Widowed),
      "divorced" => Ok(Self::Divorced),
      "separated" => Ok(Self::Separated),
      other => Err(Error::UnknownVariant {
        field: "marital_status",
        value: other.to_owned(),
      }),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  Other,
}

impl Gender {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Male => "male",
      Self::Female => "female",
      Self::Other => "other",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "male" => Ok(Self::Male),
      "female" => Ok(Self::Female),
      "other" => Ok(Self::Other),
      other => Err(Error::UnknownVariant {
        field: "gender",
        value: other.to_owned(),
      }),
    }
  }
}

// ─── Spouse ──────────────────────────────────────────────────────────────────

/// Scalar fields of a spouse row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpouseRecord {
  pub name:           String,
  pub date_of_birth:  NaiveDate,
  pub occupation:     String,
  pub native_place:   String,
  pub caste:          String,
  pub qualification:  String,
  pub blood_group:    String,
  pub marital_status: MaritalStatus,
}

/// A persisted spouse, hydrated as part of its parent person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spouse {
  pub id:         i64,
  #[serde(flatten)]
  pub record:     SpouseRecord,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// Caller-supplied spouse. `id` present means keep/modify the matching
/// current member; absent means insert a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpouseDraft {
  #[serde(default)]
  pub id:     Option<i64>,
  #[serde(flatten)]
  pub record: SpouseRecord,
}

// ─── Child ───────────────────────────────────────────────────────────────────

/// Scalar fields of a child row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildRecord {
  pub name:                  String,
  pub gender:                Gender,
  pub date_of_birth:         NaiveDate,
  pub qualification:         String,
  pub marital_status:        MaritalStatus,
  pub blood_group:           String,
  #[serde(default)]
  pub physically_challenged: bool,
}

/// A persisted child, hydrated as part of its parent person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
  pub id:         i64,
  #[serde(flatten)]
  pub record:     ChildRecord,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// Caller-supplied child; same id semantics as [`SpouseDraft`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildDraft {
  #[serde(default)]
  pub id:     Option<i64>,
  #[serde(flatten)]
  pub record: ChildRecord,
}
