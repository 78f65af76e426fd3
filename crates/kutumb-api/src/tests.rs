//! Service-layer tests against an in-memory SQLite store.

use std::sync::Arc;

use chrono::NaiveDate;
use kutumb_core::{
  family::{ChildDraft, ChildRecord, Gender, MaritalStatus},
  person::{PersonDraft, PersonRecord, ResidentialStatus},
};
use kutumb_store_sqlite::SqliteStore;

use crate::{ApiError, PersonService, validate};

async fn service() -> PersonService<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  PersonService::new(Arc::new(store))
}

fn draft(full_name: &str) -> PersonDraft {
  PersonDraft {
    record:   PersonRecord {
      full_name:             full_name.to_owned(),
      phone_number:          "9876543210".to_owned(),
      residential_status:    ResidentialStatus::Rented,
      address:               "7 Market Road, Hubballi".to_owned(),
      alternate_number:      None,
      date_of_birth:         None,
      caste_group:           None,
      aadhaar_number:        None,
      qualification:         None,
      marriage_date:         None,
      blood_group:           None,
      occupation:            None,
      occupation_detail:     None,
      monthly_income:        None,
      email:                 None,
      father_name:           None,
      father_occupation:     None,
      father_death_year:     None,
      mother_name:           None,
      mother_occupation:     None,
      mother_death_year:     None,
      declared_spouse_count: None,
      declared_child_count:  None,
      feedback:              None,
    },
    spouses:  vec![],
    children: vec![],
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_rejects_non_positive_page_inputs() {
  let svc = service().await;

  let err = svc.list(0, 10, None).await.unwrap_err();
  assert!(matches!(err, ApiError::BadRequest(_)));

  let err = svc.list(1, 0, None).await.unwrap_err();
  assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn page_view_carries_request_numbers() {
  let svc = service().await;
  for name in ["A", "B", "C"] {
    svc.create(draft(name)).await.unwrap();
  }

  let page = svc.list(2, 2, None).await.unwrap();
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.total_records, 3);
  assert_eq!(page.page_number, 2);
  assert_eq!(page.page_size, 2);
}

// ─── NotFound propagation ────────────────────────────────────────────────────

#[tokio::test]
async fn get_unknown_person_is_not_found() {
  let svc = service().await;
  let err = svc.get(12).await.unwrap_err();
  assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn update_unknown_person_is_not_found() {
  let svc = service().await;
  let err = svc.update(12, draft("Ghost")).await.unwrap_err();
  assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn delete_reports_prior_visibility() {
  let svc = service().await;
  let p = svc.create(draft("Temp")).await.unwrap();

  assert!(svc.delete(p.id).await.unwrap());
  assert!(!svc.delete(p.id).await.unwrap());
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_rejects_malformed_phone() {
  let svc = service().await;

  let mut input = draft("Bad Phone");
  input.record.phone_number = "12345".to_owned();

  let err = svc.create(input).await.unwrap_err();
  match err {
    ApiError::Validation(details) => {
      assert!(details.iter().any(|d| d.contains("phone number")));
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[test]
fn validation_collects_every_problem() {
  let mut input = draft("");
  input.record.phone_number = "abc".to_owned();
  input.record.aadhaar_number = Some("123".to_owned());
  input.record.email = Some("not-an-email".to_owned());

  let err = validate::check_draft(&input).unwrap_err();
  match err {
    ApiError::Validation(details) => {
      assert!(details.len() >= 4);
      assert!(details.iter().any(|d| d.contains("full name")));
      assert!(details.iter().any(|d| d.contains("aadhaar")));
      assert!(details.iter().any(|d| d.contains("email")));
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[test]
fn declared_counts_must_match_supplied_lists() {
  let mut input = draft("Mismatch");
  input.record.declared_child_count = Some(2);
  input.children.push(ChildDraft {
    id:     None,
    record: ChildRecord {
      name:                  "Only".to_owned(),
      gender:                Gender::Male,
      date_of_birth:         NaiveDate::from_ymd_opt(2010, 3, 2).unwrap(),
      qualification:         "School".to_owned(),
      marital_status:        MaritalStatus::Single,
      blood_group:           "B+".to_owned(),
      physically_challenged: false,
    },
  });

  let err = validate::check_draft(&input).unwrap_err();
  match err {
    ApiError::Validation(details) => {
      assert!(details.iter().any(|d| d.contains("declared_child_count")));
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[test]
fn valid_draft_passes() {
  let mut input = draft("Fine Person");
  input.record.aadhaar_number = Some("123456789012".to_owned());
  input.record.email = Some("fine@example.in".to_owned());
  assert!(validate::check_draft(&input).is_ok());
}
