//! Integration tests for `SqliteStore` against an in-memory database.

use ordnance_core::{store::WeaponStore, version::VersionMarker, weapon::Weapon};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn weapon(name: &str, category: &str, mass: &str) -> Weapon {
  let mut w = Weapon::new(name, category);
  w.params.mass = Some(mass.to_string());
  w.ensure_identity();
  w
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_inserts_new_records() {
  let s = store().await;

  let counts = s
    .upsert_weapons(vec![
      weapon("AIM-9B", "aam-ir", "75"),
      weapon("R-3S", "aam-ir", "75.3"),
    ])
    .await
    .unwrap();

  assert_eq!(counts.upserted, 2);
  assert_eq!(counts.matched, 0);
  assert_eq!(counts.modified, 0);
  assert_eq!(s.weapon_count().await.unwrap(), 2);
}

#[tokio::test]
async fn upsert_same_batch_twice_is_idempotent() {
  let s = store().await;
  let batch = vec![
    weapon("AIM-9B", "aam-ir", "75"),
    weapon("R-3S", "aam-ir", "75.3"),
  ];

  s.upsert_weapons(batch.clone()).await.unwrap();
  let before = s.weapons_by_category("aam-ir").await.unwrap();

  let counts = s.upsert_weapons(batch).await.unwrap();
  assert_eq!(counts.matched, 2);
  assert_eq!(counts.modified, 0);
  assert_eq!(counts.upserted, 0);

  let after = s.weapons_by_category("aam-ir").await.unwrap();
  assert_eq!(before, after);
  assert_eq!(s.weapon_count().await.unwrap(), 2);
}

#[tokio::test]
async fn upsert_replaces_changed_attributes() {
  let s = store().await;
  s.upsert_weapons(vec![weapon("AIM-9B", "aam-ir", "75")])
    .await
    .unwrap();

  // Attributes do not feed the identity, so the record is replaced in place.
  let counts = s
    .upsert_weapons(vec![weapon("AIM-9B", "aam-ir", "76")])
    .await
    .unwrap();
  assert_eq!(counts.matched, 1);
  assert_eq!(counts.modified, 1);
  assert_eq!(counts.upserted, 0);

  let stored = s.weapons_by_category("aam-ir").await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].params.mass.as_deref(), Some("76"));
}

#[tokio::test]
async fn upsert_replaces_rather_than_merges() {
  let s = store().await;
  let mut first = weapon("AIM-9B", "aam-ir", "75");
  first.params.caliber = Some("127".into());
  s.upsert_weapons(vec![first]).await.unwrap();

  s.upsert_weapons(vec![weapon("AIM-9B", "aam-ir", "75")])
    .await
    .unwrap();

  let stored = s.weapons_by_category("aam-ir").await.unwrap();
  assert_eq!(stored[0].params.caliber, None);
}

#[tokio::test]
async fn upsert_new_notes_create_a_new_record() {
  let s = store().await;
  s.upsert_weapons(vec![weapon("AIM-9B", "aam-ir", "75")])
    .await
    .unwrap();

  let mut noted = Weapon::new("AIM-9B", "aam-ir");
  noted.notes = "Late production".into();
  noted.ensure_identity();
  let counts = s.upsert_weapons(vec![noted]).await.unwrap();

  assert_eq!(counts.upserted, 1);
  assert_eq!(s.weapon_count().await.unwrap(), 2);
}

#[tokio::test]
async fn upsert_rejects_missing_identity() {
  let s = store().await;
  let result = s.upsert_weapons(vec![Weapon::new("AIM-9B", "aam-ir")]).await;
  assert!(matches!(result, Err(Error::MissingIdentity { .. })));
  assert_eq!(s.weapon_count().await.unwrap(), 0);
}

#[tokio::test]
async fn upsert_empty_batch_is_a_no_op() {
  let s = store().await;
  let counts = s.upsert_weapons(vec![]).await.unwrap();
  assert_eq!(counts, Default::default());
}

// ─── Category reads ──────────────────────────────────────────────────────────

#[tokio::test]
async fn weapons_by_category_filters_and_round_trips() {
  let s = store().await;
  let mut sarh = weapon("AIM-7E", "aam-sarh", "197");
  sarh.notes = "Early".into();
  sarh.identity.clear();
  sarh.ensure_identity();
  s.upsert_weapons(vec![sarh.clone(), weapon("AIM-9B", "aam-ir", "75")])
    .await
    .unwrap();

  let got = s.weapons_by_category("aam-sarh").await.unwrap();
  assert_eq!(got, vec![sarh]);
}

#[tokio::test]
async fn weapons_by_category_unknown_is_empty() {
  let s = store().await;
  s.upsert_weapons(vec![weapon("AIM-9B", "aam-ir", "75")])
    .await
    .unwrap();
  assert!(s.weapons_by_category("agm").await.unwrap().is_empty());
}

// ─── Name search ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_is_case_insensitive_substring() {
  let s = store().await;
  s.upsert_weapons(vec![
    weapon("AIM-9B", "aam-ir", "75"),
    weapon("AIM-7E", "aam-sarh", "197"),
    weapon("R-3S", "aam-ir", "75.3"),
  ])
  .await
  .unwrap();

  let hits = s.search_by_name("aim").await.unwrap();
  let names: Vec<_> = hits.iter().map(|h| h.name.as_str()).collect();
  assert_eq!(names, vec!["AIM-7E", "AIM-9B"]);
  assert_eq!(hits[0].category, "aam-sarh");
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.upsert_weapons(vec![
    weapon("100% HE", "bombs", "250"),
    weapon("1000lb", "bombs", "453"),
    weapon("GBU_8", "bombs", "1017"),
    weapon("GBU-8", "bombs", "1017"),
  ])
  .await
  .unwrap();

  let pct = s.search_by_name("0%").await.unwrap();
  assert_eq!(pct.len(), 1);
  assert_eq!(pct[0].name, "100% HE");

  let underscore = s.search_by_name("U_8").await.unwrap();
  assert_eq!(underscore.len(), 1);
  assert_eq!(underscore[0].name, "GBU_8");
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
  let s = store().await;
  s.upsert_weapons(vec![
    weapon("Ödön Mk.1", "agm-tv", "210"),
    weapon("Robot 15", "agm-arh", "600"),
  ])
  .await
  .unwrap();

  let hits = s.search_by_name("ödön").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Ödön Mk.1");

  assert_eq!(s.search_by_name("ÖDÖN MK").await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_empty_store_returns_nothing() {
  let s = store().await;
  assert!(s.search_by_name("aim").await.unwrap().is_empty());
}

// ─── Version marker ──────────────────────────────────────────────────────────

#[tokio::test]
async fn current_version_absent_on_fresh_store() {
  let s = store().await;
  assert!(s.current_version().await.unwrap().is_none());
}

#[tokio::test]
async fn write_version_overwrites_singleton() {
  let s = store().await;

  s.write_version(VersionMarker::from("2.47.0.123"))
    .await
    .unwrap();
  let written = s
    .write_version(VersionMarker::from("2.49.0.7"))
    .await
    .unwrap();

  let current = s.current_version().await.unwrap().expect("marker stored");
  assert_eq!(current.version.as_str(), "2.49.0.7");
  assert_eq!(current, written);
}
