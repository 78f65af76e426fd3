//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use kutumb_core::{
  family::{
    ChildDraft, ChildRecord, Gender, MaritalStatus, SpouseDraft, SpouseRecord,
  },
  person::{PersonDraft, PersonRecord, ResidentialStatus},
  store::{PageRequest, PersonStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn record(full_name: &str) -> PersonRecord {
  PersonRecord {
    full_name:             full_name.to_owned(),
    phone_number:          "9876543210".to_owned(),
    residential_status:    ResidentialStatus::Owned,
    address:               "14 Temple Street, Mysuru".to_owned(),
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
  }
}

fn draft(full_name: &str) -> PersonDraft {
  PersonDraft {
    record:   record(full_name),
    spouses:  vec![],
    children: vec![],
  }
}

fn spouse(name: &str) -> SpouseDraft {
  SpouseDraft {
    id:     None,
    record: SpouseRecord {
      name:           name.to_owned(),
      date_of_birth:  NaiveDate::from_ymd_opt(1975, 6, 14).unwrap(),
      occupation:     "Teacher".to_owned(),
      native_place:   "Hassan".to_owned(),
      caste:          "General".to_owned(),
      qualification:  "BA".to_owned(),
      blood_group:    "O+".to_owned(),
      marital_status: MaritalStatus::Married,
    },
  }
}

fn child(name: &str) -> ChildDraft {
  ChildDraft {
    id:     None,
    record: ChildRecord {
      name:                  name.to_owned(),
      gender:                Gender::Female,
      date_of_birth:         NaiveDate::from_ymd_opt(2002, 1, 9).unwrap(),
      qualification:         "BSc".to_owned(),
      marital_status:        MaritalStatus::Single,
      blood_group:           "A+".to_owned(),
      physically_challenged: false,
    },
  }
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_hydrated() {
  let s = store().await;

  let mut input = draft("Arun Mehta");
  input.spouses.push(spouse("Lata"));
  input.children.push(child("Meera"));

  let created = s.create_person(input).await.unwrap();
  assert!(created.id > 0);
  assert_eq!(created.record.full_name, "Arun Mehta");
  assert_eq!(created.spouses.len(), 1);
  assert_eq!(created.children.len(), 1);
  assert!(created.spouses[0].id > 0);
  assert!(created.updated_at.is_none());

  let fetched = s.get_person(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, created.id);
  assert_eq!(fetched.record.full_name, "Arun Mehta");
  assert_eq!(fetched.spouses[0].record.name, "Lata");
  assert_eq!(fetched.children[0].record.name, "Meera");
  assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(42).await.unwrap().is_none());
}

#[tokio::test]
async fn exists_reflects_visibility() {
  let s = store().await;
  let p = s.create_person(draft("Kavita Rao")).await.unwrap();

  assert!(s.person_exists(p.id).await.unwrap());
  assert!(!s.person_exists(9999).await.unwrap());
}

#[tokio::test]
async fn create_ignores_member_ids() {
  let s = store().await;

  let mut input = draft("Suresh Patil");
  let mut sp = spouse("Anita");
  sp.id = Some(999);
  input.spouses.push(sp);

  let created = s.create_person(input).await.unwrap();
  assert_eq!(created.spouses.len(), 1);
  assert_ne!(created.spouses[0].id, 999);
}

#[tokio::test]
async fn create_rejects_overlong_field() {
  let s = store().await;

  let mut input = draft("x");
  input.record.full_name = "x".repeat(101);

  let err = s.create_person(input).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

// ─── Soft delete / visibility ────────────────────────────────────────────────

#[tokio::test]
async fn delete_hides_from_every_read_path() {
  let s = store().await;
  let mut input = draft("Ravi Kumar");
  input.children.push(child("Asha"));
  let p = s.create_person(input).await.unwrap();

  assert!(s.delete_person(p.id).await.unwrap());

  assert!(s.get_person(p.id).await.unwrap().is_none());
  assert!(!s.person_exists(p.id).await.unwrap());

  let page = s
    .list_page(PageRequest {
      page_number: 1,
      page_size:   10,
      search:      None,
    })
    .await
    .unwrap();
  assert!(page.items.iter().all(|item| item.id != p.id));
  assert_eq!(page.total_count, 0);

  // Update treats a soft-deleted person like a never-existing one.
  let outcome = s.update_person(p.id, draft("Ravi Kumar")).await.unwrap();
  assert!(outcome.is_none());
}

#[tokio::test]
async fn delete_is_idempotent_and_keeps_first_timestamp() {
  let s = store().await;
  let p = s.create_person(draft("Gopal Nair")).await.unwrap();
  let id = p.id;

  assert!(s.delete_person(id).await.unwrap());

  let first: Option<String> = s
    .conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT deleted_at FROM persons WHERE id = ?1",
        [id],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert!(first.is_some());

  assert!(!s.delete_person(id).await.unwrap());

  let second: Option<String> = s
    .conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT deleted_at FROM persons WHERE id = ?1",
        [id],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn soft_delete_leaves_member_rows_in_place() {
  let s = store().await;
  let mut input = draft("Mohan Das");
  input.children.push(child("Kiran"));
  let p = s.create_person(input).await.unwrap();
  let id = p.id;

  s.delete_person(id).await.unwrap();

  // Member rows are untouched; they are only unreachable through the
  // parent's filtered view.
  let remaining: i64 = s
    .conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM children WHERE person_id = ?1",
        [id],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(remaining, 1);
}

// ─── Update: scalars and timestamps ──────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_scalars() {
  let s = store().await;
  let p = s.create_person(draft("Prakash Joshi")).await.unwrap();

  let mut replacement = draft("Prakash V Joshi");
  replacement.record.phone_number = "9123456780".to_owned();
  replacement.record.email = Some("prakash@example.in".to_owned());

  let updated = s.update_person(p.id, replacement).await.unwrap().unwrap();
  assert_eq!(updated.record.full_name, "Prakash V Joshi");
  assert_eq!(updated.record.phone_number, "9123456780");
  assert_eq!(updated.record.email.as_deref(), Some("prakash@example.in"));
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let outcome = s.update_person(77, draft("Nobody")).await.unwrap();
  assert!(outcome.is_none());
}

#[tokio::test]
async fn timestamps_are_monotonic() {
  let s = store().await;
  let p = s.create_person(draft("Vijay Shetty")).await.unwrap();
  assert!(p.updated_at.is_none());

  let first = s
    .update_person(p.id, draft("Vijay Shetty"))
    .await
    .unwrap()
    .unwrap();
  let first_stamp = first.updated_at.unwrap();
  assert!(first_stamp > p.created_at);
  assert_eq!(first.created_at, p.created_at);

  let second = s
    .update_person(p.id, draft("Vijay Shetty"))
    .await
    .unwrap()
    .unwrap();
  let second_stamp = second.updated_at.unwrap();
  assert!(second_stamp > first_stamp);
  assert_eq!(second.created_at, p.created_at);
}

// ─── Update: reconciliation ──────────────────────────────────────────────────

#[tokio::test]
async fn reconciliation_removes_omitted_members() {
  let s = store().await;
  let mut input = draft("Dinesh Gowda");
  input.children.push(child("Ramesh"));
  input.children.push(child("Suma"));
  let p = s.create_person(input).await.unwrap();
  assert_eq!(p.children.len(), 2);

  let keep = &p.children[0];
  let mut replacement = draft("Dinesh Gowda");
  replacement.children.push(ChildDraft {
    id:     Some(keep.id),
    record: keep.record.clone(),
  });

  let updated = s.update_person(p.id, replacement).await.unwrap().unwrap();
  assert_eq!(updated.children.len(), 1);
  assert_eq!(updated.children[0].id, keep.id);
}

#[tokio::test]
async fn reconciliation_modifies_kept_and_inserts_new() {
  let s = store().await;
  let mut input = draft("Harish Bhat");
  input.children.push(child("Deepa"));
  let p = s.create_person(input).await.unwrap();
  let existing = &p.children[0];

  let mut renamed = existing.record.clone();
  renamed.name = "Deepa H".to_owned();

  let mut replacement = draft("Harish Bhat");
  replacement.children.push(ChildDraft {
    id:     Some(existing.id),
    record: renamed,
  });
  replacement.children.push(child("Tejas"));

  let updated = s.update_person(p.id, replacement).await.unwrap().unwrap();
  assert_eq!(updated.children.len(), 2);

  let kept = updated
    .children
    .iter()
    .find(|c| c.id == existing.id)
    .unwrap();
  assert_eq!(kept.record.name, "Deepa H");

  let added = updated
    .children
    .iter()
    .find(|c| c.id != existing.id)
    .unwrap();
  assert_eq!(added.record.name, "Tejas");
  assert!(added.id > existing.id);
}

#[tokio::test]
async fn reconciliation_clears_collection_on_empty_list() {
  let s = store().await;
  let mut input = draft("Naveen Reddy");
  input.spouses.push(spouse("Shilpa"));
  let p = s.create_person(input).await.unwrap();

  let updated = s
    .update_person(p.id, draft("Naveen Reddy"))
    .await
    .unwrap()
    .unwrap();
  assert!(updated.spouses.is_empty());
}

#[tokio::test]
async fn collections_reconcile_independently() {
  let s = store().await;
  let mut input = draft("Sanjay Kulkarni");
  input.spouses.push(spouse("Pooja"));
  input.children.push(child("Rohan"));
  let p = s.create_person(input).await.unwrap();
  let kept_spouse = &p.spouses[0];

  // Replace children, keep the spouse untouched.
  let mut replacement = draft("Sanjay Kulkarni");
  replacement.spouses.push(SpouseDraft {
    id:     Some(kept_spouse.id),
    record: kept_spouse.record.clone(),
  });

  let updated = s.update_person(p.id, replacement).await.unwrap().unwrap();
  assert!(updated.children.is_empty());
  assert_eq!(updated.spouses.len(), 1);
  assert_eq!(updated.spouses[0].id, kept_spouse.id);
  assert_eq!(updated.spouses[0].record.name, "Pooja");
}

#[tokio::test]
async fn foreign_spouse_id_rolls_back_whole_update() {
  let s = store().await;
  let mut input = draft("Umesh Hegde");
  input.children.push(child("Sneha"));
  let p = s.create_person(input).await.unwrap();

  let mut replacement = draft("Someone Else");
  let mut sp = spouse("Intruder");
  sp.id = Some(9999);
  replacement.spouses.push(sp);

  let err = s.update_person(p.id, replacement).await.unwrap_err();
  assert!(matches!(err, Error::ForeignSpouse { spouse_id: 9999, .. }));

  // Nothing from the failed update is observable.
  let after = s.get_person(p.id).await.unwrap().unwrap();
  assert_eq!(after.record.full_name, "Umesh Hegde");
  assert!(after.updated_at.is_none());
  assert_eq!(after.children.len(), 1);
  assert!(after.spouses.is_empty());
}

#[tokio::test]
async fn foreign_child_id_rolls_back_earlier_steps() {
  let s = store().await;
  let mut input = draft("Ashok Pai");
  input.spouses.push(spouse("Rekha"));
  let p = s.create_person(input).await.unwrap();
  let existing = &p.spouses[0];

  // The spouse reconciliation would succeed; the child step then fails and
  // must take the spouse rename down with it.
  let mut renamed = existing.record.clone();
  renamed.name = "Rekha A".to_owned();

  let mut replacement = draft("Ashok Pai");
  replacement.spouses.push(SpouseDraft {
    id:     Some(existing.id),
    record: renamed,
  });
  let mut ch = child("Ghost");
  ch.id = Some(4242);
  replacement.children.push(ch);

  let err = s.update_person(p.id, replacement).await.unwrap_err();
  assert!(matches!(err, Error::ForeignChild { child_id: 4242, .. }));

  let after = s.get_person(p.id).await.unwrap().unwrap();
  assert_eq!(after.spouses[0].record.name, "Rekha");
  assert!(after.updated_at.is_none());
}

// ─── List: pagination ────────────────────────────────────────────────────────

#[tokio::test]
async fn pagination_slices_are_disjoint_and_ordered() {
  let s = store().await;
  for name in ["P1", "P2", "P3", "P4", "P5"] {
    s.create_person(draft(name)).await.unwrap();
  }

  let mut seen = Vec::new();
  for page_number in 1..=3 {
    let page = s
      .list_page(PageRequest {
        page_number,
        page_size: 2,
        search: None,
      })
      .await
      .unwrap();
    assert_eq!(page.total_count, 5);
    seen.extend(page.items.into_iter().map(|p| p.record.full_name));
  }

  // Most recently created first; concatenated pages cover the full set.
  assert_eq!(seen, ["P5", "P4", "P3", "P2", "P1"]);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
  let s = store().await;
  s.create_person(draft("Solo")).await.unwrap();

  let page = s
    .list_page(PageRequest {
      page_number: 3,
      page_size:   10,
      search:      None,
    })
    .await
    .unwrap();
  assert!(page.items.is_empty());
  assert_eq!(page.total_count, 1);
}

#[tokio::test]
async fn extreme_page_numbers_do_not_overflow() {
  let s = store().await;
  s.create_person(draft("Solo")).await.unwrap();

  let page = s
    .list_page(PageRequest {
      page_number: u32::MAX,
      page_size:   u32::MAX,
      search:      None,
    })
    .await
    .unwrap();
  assert!(page.items.is_empty());
  assert_eq!(page.total_count, 1);
}

// ─── List: search ────────────────────────────────────────────────────────────

async fn seed_searchable(s: &SqliteStore) -> (i64, i64) {
  let mut a = draft("Arun Mehta");
  a.record.phone_number = "9000000001".to_owned();
  a.record.email = Some("arun@example.in".to_owned());
  a.record.aadhaar_number = Some("111122223333".to_owned());
  let a = s.create_person(a).await.unwrap();

  let mut b = draft("Brinda Shah");
  b.record.phone_number = "8000000002".to_owned();
  b.record.email = Some("brinda@example.in".to_owned());
  b.record.aadhaar_number = Some("444455556666".to_owned());
  let b = s.create_person(b).await.unwrap();

  (a.id, b.id)
}

async fn search(s: &SqliteStore, term: &str) -> Vec<i64> {
  s.list_page(PageRequest {
    page_number: 1,
    page_size:   10,
    search:      Some(term.to_owned()),
  })
  .await
  .unwrap()
  .items
  .into_iter()
  .map(|p| p.id)
  .collect()
}

#[tokio::test]
async fn search_matches_each_field() {
  let s = store().await;
  let (a, b) = seed_searchable(&s).await;

  assert_eq!(search(&s, "Arun").await, vec![a]);
  assert_eq!(search(&s, "8000").await, vec![b]);
  assert_eq!(search(&s, "brinda@").await, vec![b]);
  assert_eq!(search(&s, "1111").await, vec![a]);
}

#[tokio::test]
async fn search_is_case_sensitive() {
  let s = store().await;
  let (a, _) = seed_searchable(&s).await;

  assert_eq!(search(&s, "Arun").await, vec![a]);
  assert!(search(&s, "arun M").await.is_empty());
}

#[tokio::test]
async fn blank_search_term_returns_everything() {
  let s = store().await;
  seed_searchable(&s).await;

  let page = s
    .list_page(PageRequest {
      page_number: 1,
      page_size:   10,
      search:      Some("   ".to_owned()),
    })
    .await
    .unwrap();
  assert_eq!(page.items.len(), 2);
  assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn search_total_counts_all_matches() {
  let s = store().await;
  for i in 0..4 {
    let mut d = draft(&format!("Match {i}"));
    d.record.phone_number = format!("90000000{i}0");
    s.create_person(d).await.unwrap();
  }
  s.create_person(draft("Unrelated")).await.unwrap();

  let page = s
    .list_page(PageRequest {
      page_number: 1,
      page_size:   2,
      search:      Some("Match".to_owned()),
    })
    .await
    .unwrap();
  assert_eq!(page.items.len(), 2);
  assert_eq!(page.total_count, 4);
}
