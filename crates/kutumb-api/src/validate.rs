//! Field-level validation for caller-supplied drafts.
//!
//! Runs before anything reaches the store, so the repository only ever sees
//! shapes that satisfy the schema bounds. All violations are collected and
//! reported together rather than failing on the first.

use kutumb_core::{
  family::{ChildDraft, SpouseDraft},
  person::{PersonDraft, PersonRecord},
};

use crate::error::ApiError;

/// Validate a draft for create or update.
pub fn check_draft(draft: &PersonDraft) -> Result<(), ApiError> {
  let mut problems = Vec::new();

  check_record(&draft.record, &mut problems);

  // Declared counts, when present alongside a member list, must agree.
  if let Some(declared) = draft.record.declared_spouse_count
    && !draft.spouses.is_empty()
    && draft.spouses.len() != declared as usize
  {
    problems
      .push("spouse list length must match declared_spouse_count".into());
  }
  if let Some(declared) = draft.record.declared_child_count
    && !draft.children.is_empty()
    && draft.children.len() != declared as usize
  {
    problems.push("child list length must match declared_child_count".into());
  }

  for (i, spouse) in draft.spouses.iter().enumerate() {
    check_spouse(i, spouse, &mut problems);
  }
  for (i, child) in draft.children.iter().enumerate() {
    check_child(i, child, &mut problems);
  }

  if problems.is_empty() {
    Ok(())
  } else {
    Err(ApiError::Validation(problems))
  }
}

fn check_record(record: &PersonRecord, problems: &mut Vec<String>) {
  if record.full_name.trim().is_empty() {
    problems.push("full name is required".into());
  }
  if record.full_name.chars().count() > 100 {
    problems.push("full name cannot exceed 100 characters".into());
  }
  if !is_digits(&record.phone_number, 10) {
    problems.push("phone number must be exactly 10 digits".into());
  }
  if record.address.trim().is_empty() {
    problems.push("address is required".into());
  }
  if record.address.chars().count() > 500 {
    problems.push("address cannot exceed 500 characters".into());
  }

  if let Some(alternate) = &record.alternate_number
    && !is_digits(alternate, 10)
  {
    problems.push("alternate number must be exactly 10 digits".into());
  }
  if let Some(aadhaar) = &record.aadhaar_number
    && !is_digits(aadhaar, 12)
  {
    problems.push("aadhaar number must be exactly 12 digits".into());
  }
  if let Some(email) = &record.email {
    if !plausible_email(email) {
      problems.push("invalid email format".into());
    }
    if email.chars().count() > 100 {
      problems.push("email cannot exceed 100 characters".into());
    }
  }

  bounded(problems, "caste/group", record.caste_group.as_deref(), 50);
  bounded(problems, "qualification", record.qualification.as_deref(), 50);
  bounded(problems, "blood group", record.blood_group.as_deref(), 10);
  bounded(
    problems,
    "occupation detail",
    record.occupation_detail.as_deref(),
    200,
  );
  bounded(problems, "father's name", record.father_name.as_deref(), 100);
  bounded(
    problems,
    "father's occupation",
    record.father_occupation.as_deref(),
    100,
  );
  bounded(problems, "mother's name", record.mother_name.as_deref(), 100);
  bounded(
    problems,
    "mother's occupation",
    record.mother_occupation.as_deref(),
    100,
  );
  bounded(problems, "feedback", record.feedback.as_deref(), 1000);

  if let Some(count) = record.declared_spouse_count
    && !(1..=2).contains(&count)
  {
    problems.push("declared spouse count must be between 1 and 2".into());
  }
  if let Some(count) = record.declared_child_count
    && count > 4
  {
    problems.push("declared child count must be between 0 and 4".into());
  }
}

fn check_spouse(index: usize, spouse: &SpouseDraft, problems: &mut Vec<String>) {
  let record = &spouse.record;
  if record.name.trim().is_empty() {
    problems.push(format!("spouse {index}: name is required"));
  }
  if record.name.chars().count() > 100 {
    problems.push(format!("spouse {index}: name cannot exceed 100 characters"));
  }
  if record.occupation.chars().count() > 100 {
    problems
      .push(format!("spouse {index}: occupation cannot exceed 100 characters"));
  }
  if record.blood_group.chars().count() > 10 {
    problems
      .push(format!("spouse {index}: blood group cannot exceed 10 characters"));
  }
}

fn check_child(index: usize, child: &ChildDraft, problems: &mut Vec<String>) {
  let record = &child.record;
  if record.name.trim().is_empty() {
    problems.push(format!("child {index}: name is required"));
  }
  if record.name.chars().count() > 100 {
    problems.push(format!("child {index}: name cannot exceed 100 characters"));
  }
  if record.blood_group.chars().count() > 10 {
    problems
      .push(format!("child {index}: blood group cannot exceed 10 characters"));
  }
}

fn bounded(
  problems: &mut Vec<String>,
  label: &str,
  value: Option<&str>,
  max: usize,
) {
  if let Some(v) = value
    && v.chars().count() > max
  {
    problems.push(format!("{label} cannot exceed {max} characters"));
  }
}

fn is_digits(s: &str, len: usize) -> bool {
  s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn plausible_email(s: &str) -> bool {
  matches!(s.split_once('@'), Some((local, domain))
    if !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
}
