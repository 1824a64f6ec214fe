//! SQL schema for the Hearth SQLite store.
//!
//! Run as one batch every time a store is opened. Each statement is
//! idempotent, so reopening an existing file leaves its data alone. The batch
//! stamps `PRAGMA user_version` but nothing reads it yet.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rows are created and deleted only by the consolidation engine.
CREATE TABLE IF NOT EXISTS families (
    family_id     TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    surname       TEXT NOT NULL,
    display_name  TEXT,
    notes         TEXT
);

CREATE TABLE IF NOT EXISTS people (
    person_id    TEXT PRIMARY KEY,
    created_at   TEXT NOT NULL,
    kind         TEXT NOT NULL,   -- 'member' | 'visitor'
    given_name   TEXT NOT NULL,
    family_name  TEXT NOT NULL,
    phone        TEXT,
    email        TEXT,
    family_id    TEXT REFERENCES families(family_id),
    family_role  TEXT             -- label, e.g. 'Cabeza de Familia', 'Hijo/a'
);

-- `kind` is what person_b is to person_a. pair_low/pair_high hold the two
-- endpoints in sorted order so each unordered pair appears at most once.
CREATE TABLE IF NOT EXISTS relationships (
    relationship_id    TEXT PRIMARY KEY,
    person_a           TEXT NOT NULL REFERENCES people(person_id),
    person_b           TEXT NOT NULL REFERENCES people(person_id),
    pair_low           TEXT NOT NULL,
    pair_high          TEXT NOT NULL,
    kind               TEXT NOT NULL,
    inverse_kind       TEXT NOT NULL,
    symmetric          INTEGER NOT NULL,
    context_family_id  TEXT REFERENCES families(family_id) ON DELETE SET NULL,
    created_at         TEXT NOT NULL,
    UNIQUE (pair_low, pair_high),
    CHECK  (person_a != person_b)
);

CREATE INDEX IF NOT EXISTS people_family_idx       ON people(family_id);
CREATE INDEX IF NOT EXISTS relationships_a_idx     ON relationships(person_a);
CREATE INDEX IF NOT EXISTS relationships_b_idx     ON relationships(person_b);
CREATE INDEX IF NOT EXISTS relationships_context_idx
    ON relationships(context_family_id);

PRAGMA user_version = 1;
";
