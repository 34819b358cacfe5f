//! [`SqliteStore`], the SQLite implementation of [`WeaponStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use ordnance_core::{
  store::{UpsertCounts, WeaponStore},
  version::{VersionMarker, VersionRecord},
  weapon::{SearchResult, Weapon},
};

use crate::{
  Result,
  encode::{RawVersion, RawWeapon, encode_dt, fold_name, like_contains},
  schema::{CURRENT_VERSION_KEY, MIGRATE_V1, SCHEMA, UPSERT_WEAPON},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A weapon store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
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
        let version: i64 =
          conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        if version == 1 {
          migrate_v1(conn)?;
        }
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Total number of stored weapons across all categories.
  pub async fn weapon_count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM weapons", [], |r| r.get(0))?)
      })
      .await?;
    Ok(u64::try_from(count).unwrap_or_default())
  }
}

fn migrate_v1(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
  let tx = conn.transaction()?;
  tx.execute_batch(MIGRATE_V1)?;
  {
    let mut select = tx.prepare("SELECT identity, name FROM weapons")?;
    let names = select
      .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    let mut update =
      tx.prepare("UPDATE weapons SET name_folded = ?2 WHERE identity = ?1")?;
    for (identity, name) in names {
      update.execute(rusqlite::params![identity, fold_name(&name)])?;
    }
  }
  tx.commit()?;
  tracing::info!("migrated weapon store schema from version 1");
  Ok(())
}

// ─── WeaponStore impl ────────────────────────────────────────────────────────

impl WeaponStore for SqliteStore {
  type Error = crate::Error;

  async fn upsert_weapons(&self, weapons: Vec<Weapon>) -> Result<UpsertCounts> {
    let rows = weapons
      .iter()
      .map(RawWeapon::from_weapon)
      .collect::<Result<Vec<_>>>()?;
    let now = encode_dt(Utc::now());
    let total = rows.len();

    // Each statement autocommits, so a failure part-way leaves the records
    // before it in place.
    let counts = self
      .conn
      .call(move |conn| {
        let mut counts = UpsertCounts::default();
        let mut exists =
          conn.prepare_cached("SELECT 1 FROM weapons WHERE identity = ?1")?;
        let mut upsert = conn.prepare_cached(UPSERT_WEAPON)?;

        for row in &rows {
          let existed = exists.exists(rusqlite::params![row.identity])?;
          let changed = upsert.execute(rusqlite::params![
            row.identity,
            row.category,
            row.name,
            row.name_folded,
            row.notes,
            row.params_json,
            now,
          ])?;

          match (existed, changed) {
            (false, _) => counts.upserted += 1,
            (true, 0) => counts.matched += 1,
            (true, _) => {
              counts.matched += 1;
              counts.modified += 1;
            }
          }
        }
        Ok(counts)
      })
      .await?;

    tracing::debug!(
      total,
      matched = counts.matched,
      modified = counts.modified,
      upserted = counts.upserted,
      "upserted weapons"
    );
    Ok(counts)
  }

  async fn write_version(&self, version: VersionMarker) -> Result<VersionRecord> {
    let recorded_at = Utc::now();
    let value = version.as_str().to_owned();
    let at_str = encode_dt(recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO markers (key, value, recorded_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (key) DO UPDATE SET
             value       = excluded.value,
             recorded_at = excluded.recorded_at",
          rusqlite::params![CURRENT_VERSION_KEY, value, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(VersionRecord { version, recorded_at })
  }

  async fn weapons_by_category<'a>(
    &'a self,
    category: &'a str,
  ) -> Result<Vec<Weapon>> {
    let category = category.to_owned();

    let raws: Vec<RawWeapon> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT identity, category, name, name_folded, notes, params_json
           FROM weapons
           WHERE category = ?1
           ORDER BY name, identity",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![category], |r| {
            Ok(RawWeapon {
              identity:    r.get(0)?,
              category:    r.get(1)?,
              name:        r.get(2)?,
              name_folded: r.get(3)?,
              notes:       r.get(4)?,
              params_json: r.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWeapon::into_weapon).collect()
  }

  async fn search_by_name<'a>(
    &'a self,
    query: &'a str,
  ) -> Result<Vec<SearchResult>> {
    let pattern = like_contains(&fold_name(query));

    let results = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT name, category
           FROM weapons
           WHERE name_folded LIKE ?1 ESCAPE '\\'
           ORDER BY name, category",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], |r| {
            Ok(SearchResult {
              name:     r.get(0)?,
              category: r.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(results)
  }

  async fn current_version(&self) -> Result<Option<VersionRecord>> {
    let raw: Option<RawVersion> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT value, recorded_at FROM markers WHERE key = ?1",
              rusqlite::params![CURRENT_VERSION_KEY],
              |r| {
                Ok(RawVersion {
                  value:       r.get(0)?,
                  recorded_at: r.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVersion::into_record).transpose()
  }
}
