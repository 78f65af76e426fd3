//! SQL schema for the Kutumb SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.
//!
//! `AUTOINCREMENT` keeps identities monotonic and never reused, which the
//! list ordering relies on for its tie-break. Member tables cascade on a
//! hard delete of the parent row; a soft delete (`is_deleted = 1`) leaves
//! them untouched — they simply become unreachable through the parent's
//! filtered view.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name             TEXT NOT NULL CHECK (length(full_name) <= 100),
    phone_number          TEXT NOT NULL CHECK (length(phone_number) <= 10),
    residential_status    TEXT NOT NULL,
    address               TEXT NOT NULL CHECK (length(address) <= 500),
    alternate_number      TEXT CHECK (alternate_number IS NULL OR length(alternate_number) <= 10),
    date_of_birth         TEXT,              -- YYYY-MM-DD
    caste_group           TEXT CHECK (caste_group IS NULL OR length(caste_group) <= 50),
    aadhaar_number        TEXT CHECK (aadhaar_number IS NULL OR length(aadhaar_number) <= 12),
    qualification         TEXT CHECK (qualification IS NULL OR length(qualification) <= 50),
    marriage_date         TEXT,              -- YYYY-MM-DD
    blood_group           TEXT CHECK (blood_group IS NULL OR length(blood_group) <= 10),
    occupation            TEXT,              -- lowercase Occupation variant
    occupation_detail     TEXT CHECK (occupation_detail IS NULL OR length(occupation_detail) <= 200),
    monthly_income        TEXT,              -- lowercase IncomeRange variant
    email                 TEXT CHECK (email IS NULL OR length(email) <= 100),
    father_name           TEXT CHECK (father_name IS NULL OR length(father_name) <= 100),
    father_occupation     TEXT CHECK (father_occupation IS NULL OR length(father_occupation) <= 100),
    father_death_year     INTEGER,
    mother_name           TEXT CHECK (mother_name IS NULL OR length(mother_name) <= 100),
    mother_occupation     TEXT CHECK (mother_occupation IS NULL OR length(mother_occupation) <= 100),
    mother_death_year     INTEGER,
    declared_spouse_count INTEGER,
    declared_child_count  INTEGER,
    feedback              TEXT CHECK (feedback IS NULL OR length(feedback) <= 1000),
    created_at            TEXT NOT NULL,     -- RFC 3339 UTC; store-assigned
    updated_at            TEXT,
    is_deleted            INTEGER NOT NULL DEFAULT 0,
    deleted_at            TEXT
);

CREATE TABLE IF NOT EXISTS spouses (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id      INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    name           TEXT NOT NULL CHECK (length(name) <= 100),
    date_of_birth  TEXT NOT NULL,
    occupation     TEXT NOT NULL CHECK (length(occupation) <= 100),
    native_place   TEXT NOT NULL CHECK (length(native_place) <= 100),
    caste          TEXT NOT NULL CHECK (length(caste) <= 50),
    qualification  TEXT NOT NULL CHECK (length(qualification) <= 50),
    blood_group    TEXT NOT NULL CHECK (length(blood_group) <= 10),
    marital_status TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    updated_at     TEXT,
    is_deleted     INTEGER NOT NULL DEFAULT 0,
    deleted_at     TEXT
);

CREATE TABLE IF NOT EXISTS children (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id             INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    name                  TEXT NOT NULL CHECK (length(name) <= 100),
    gender                TEXT NOT NULL,
    date_of_birth         TEXT NOT NULL,
    qualification         TEXT NOT NULL CHECK (length(qualification) <= 50),
    marital_status        TEXT NOT NULL,
    blood_group           TEXT NOT NULL CHECK (length(blood_group) <= 10),
    physically_challenged INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT NOT NULL,
    updated_at            TEXT,
    is_deleted            INTEGER NOT NULL DEFAULT 0,
    deleted_at            TEXT
);

CREATE INDEX IF NOT EXISTS spouses_person_idx  ON spouses(person_id);
CREATE INDEX IF NOT EXISTS children_person_idx ON children(person_id);
CREATE INDEX IF NOT EXISTS persons_created_idx ON persons(created_at);

PRAGMA user_version = 1;
";
