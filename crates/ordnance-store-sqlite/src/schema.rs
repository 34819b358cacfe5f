//! SQL schema for the Ordnance SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Fixed key of the singleton version-marker row.
pub const CURRENT_VERSION_KEY: &str = "current_version";

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per weapon, keyed by its content-derived identity.
-- Rows are replaced in place on re-ingestion and never deleted.
CREATE TABLE IF NOT EXISTS weapons (
    identity     TEXT PRIMARY KEY,
    category     TEXT NOT NULL,
    name         TEXT NOT NULL,
    name_folded  TEXT NOT NULL DEFAULT '',  -- lowercased name, the search key
    notes        TEXT NOT NULL DEFAULT '',
    params_json  TEXT NOT NULL,   -- WeaponParams, unset attributes omitted
    updated_at   TEXT NOT NULL    -- ISO 8601 UTC of the last content change
);

CREATE INDEX IF NOT EXISTS weapons_category_idx ON weapons(category);
CREATE INDEX IF NOT EXISTS weapons_name_folded_idx ON weapons(name_folded);

-- Singleton markers, addressed by fixed keys ('current_version').
CREATE TABLE IF NOT EXISTS markers (
    key          TEXT PRIMARY KEY,
    value        TEXT NOT NULL,
    recorded_at  TEXT NOT NULL
);

PRAGMA user_version = 2;
";

/// Brings a version 1 database up to the current layout. The folded names are
/// backfilled separately, since SQLite's `lower()` only folds ASCII.
pub const MIGRATE_V1: &str = "
ALTER TABLE weapons ADD COLUMN name_folded TEXT NOT NULL DEFAULT '';
DROP INDEX IF EXISTS weapons_name_idx;
";

/// Insert a weapon, or replace the stored row with the same identity when its
/// content differs. Reports zero changes for an identical row.
pub const UPSERT_WEAPON: &str = "
INSERT INTO weapons (identity, category, name, name_folded, notes, params_json, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT (identity) DO UPDATE SET
    category    = excluded.category,
    name        = excluded.name,
    name_folded = excluded.name_folded,
    notes       = excluded.notes,
    params_json = excluded.params_json,
    updated_at  = excluded.updated_at
WHERE weapons.category    IS NOT excluded.category
   OR weapons.name        IS NOT excluded.name
   OR weapons.notes       IS NOT excluded.notes
   OR weapons.params_json IS NOT excluded.params_json
";
