//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! enums as their lowercase string form. RFC 3339 UTC strings sort
//! lexicographically in chronological order, which the list ordering uses.

use chrono::{DateTime, NaiveDate, Utc};
use kutumb_core::{
  family::{
    Child, ChildRecord, Gender, MaritalStatus, Spouse, SpouseRecord,
  },
  person::{
    IncomeRange, Occupation, Person, PersonRecord, ResidentialStatus,
  },
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values read from a `persons` row, before decoding the
/// string-encoded fields.
pub struct RawPerson {
  pub id:                    i64,
  pub full_name:             String,
  pub phone_number:          String,
  pub residential_status:    String,
  pub address:               String,
  pub alternate_number:      Option<String>,
  pub date_of_birth:         Option<String>,
  pub caste_group:           Option<String>,
  pub aadhaar_number:        Option<String>,
  pub qualification:         Option<String>,
  pub marriage_date:         Option<String>,
  pub blood_group:           Option<String>,
  pub occupation:            Option<String>,
  pub occupation_detail:     Option<String>,
  pub monthly_income:        Option<String>,
  pub email:                 Option<String>,
  pub father_name:           Option<String>,
  pub father_occupation:     Option<String>,
  pub father_death_year:     Option<i32>,
  pub mother_name:           Option<String>,
  pub mother_occupation:     Option<String>,
  pub mother_death_year:     Option<i32>,
  pub declared_spouse_count: Option<u32>,
  pub declared_child_count:  Option<u32>,
  pub feedback:              Option<String>,
  pub created_at:            String,
  pub updated_at:            Option<String>,
}

impl RawPerson {
  /// Decode into a hydrated [`Person`] with the given member collections.
  pub fn into_person(
    self,
    spouses: Vec<Spouse>,
    children: Vec<Child>,
  ) -> Result<Person> {
    let record = PersonRecord {
      full_name:             self.full_name,
      phone_number:          self.phone_number,
      residential_status:    ResidentialStatus::parse(
        &self.residential_status,
      )?,
      address:               self.address,
      alternate_number:      self.alternate_number,
      date_of_birth:         self
        .date_of_birth
        .as_deref()
        .map(decode_date)
        .transpose()?,
      caste_group:           self.caste_group,
      aadhaar_number:        self.aadhaar_number,
      qualification:         self.qualification,
      marriage_date:         self
        .marriage_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      blood_group:           self.blood_group,
      occupation:            self
        .occupation
        .as_deref()
        .map(Occupation::parse)
        .transpose()?,
      occupation_detail:     self.occupation_detail,
      monthly_income:        self
        .monthly_income
        .as_deref()
        .map(IncomeRange::parse)
        .transpose()?,
      email:                 self.email,
      father_name:           self.father_name,
      father_occupation:     self.father_occupation,
      father_death_year:     self.father_death_year,
      mother_name:           self.mother_name,
      mother_occupation:     self.mother_occupation,
      mother_death_year:     self.mother_death_year,
      declared_spouse_count: self.declared_spouse_count,
      declared_child_count:  self.declared_child_count,
      feedback:              self.feedback,
    };

    Ok(Person {
      id: self.id,
      record,
      spouses,
      children,
      created_at: decode_dt(&self.created_at)?,
      updated_at: self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw column values read from a `spouses` row.
pub struct RawSpouse {
  pub id:             i64,
  pub name:           String,
  pub date_of_birth:  String,
  pub occupation:     String,
  pub native_place:   String,
  pub caste:          String,
  pub qualification:  String,
  pub blood_group:    String,
  pub marital_status: String,
  pub created_at:     String,
  pub updated_at:     Option<String>,
}

impl RawSpouse {
  pub fn into_spouse(self) -> Result<Spouse> {
    Ok(Spouse {
      id:         self.id,
      record:     SpouseRecord {
        name:           self.name,
        date_of_birth:  decode_date(&self.date_of_birth)?,
        occupation:     self.occupation,
        native_place:   self.native_place,
        caste:          self.caste,
        qualification:  self.qualification,
        blood_group:    self.blood_group,
        marital_status: MaritalStatus::parse(&self.marital_status)?,
      },
      created_at: decode_dt(&self.created_at)?,
      updated_at: self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw column values read from a `children` row.
pub struct RawChild {
  pub id:                    i64,
  pub name:                  String,
  pub gender:                String,
  pub date_of_birth:         String,
  pub qualification:         String,
  pub marital_status:        String,
  pub blood_group:           String,
  pub physically_challenged: bool,
  pub created_at:            String,
  pub updated_at:            Option<String>,
}

impl RawChild {
  pub fn into_child(self) -> Result<Child> {
    Ok(Child {
      id:         self.id,
      record:     ChildRecord {
        name:                  self.name,
        gender:                Gender::parse(&self.gender)?,
        date_of_birth:         decode_date(&self.date_of_birth)?,
        qualification:         self.qualification,
        marital_status:        MaritalStatus::parse(&self.marital_status)?,
        blood_group:           self.blood_group,
        physically_challenged: self.physically_challenged,
      },
      created_at: decode_dt(&self.created_at)?,
      updated_at: self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
