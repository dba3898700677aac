//! SQL schema for the Aarambh SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Static catalog; seeded out of band, never updated.
CREATE TABLE IF NOT EXISTS achievements (
    achievement_id  TEXT PRIMARY KEY,
    title           TEXT NOT NULL UNIQUE,
    description     TEXT NOT NULL DEFAULT '',
    icon            TEXT,
    category        TEXT NOT NULL,
    required_points INTEGER NOT NULL,
    points          INTEGER NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- lower-cased
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- No foreign key to accounts: awards may credit a user whose profile
-- row does not exist yet, in which case it is created zeroed.
CREATE TABLE IF NOT EXISTS profiles (
    user_id           TEXT PRIMARY KEY,
    full_name         TEXT NOT NULL DEFAULT '',
    -- An i64 overflow in an increment yields a REAL; reject it.
    total_points      INTEGER NOT NULL DEFAULT 0 CHECK (typeof(total_points) = 'integer'),
    achievement_count INTEGER NOT NULL DEFAULT 0 CHECK (typeof(achievement_count) = 'integer'),
    updated_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_progress (
    user_id    TEXT NOT NULL,
    category   TEXT NOT NULL,
    points     INTEGER NOT NULL CHECK (typeof(points) = 'integer'),
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, category)
);

-- Awards are immutable. The UNIQUE constraint is what makes concurrent
-- awards of the same achievement safe.
CREATE TABLE IF NOT EXISTS user_achievements (
    user_achievement_id TEXT PRIMARY KEY,
    user_id             TEXT NOT NULL,
    achievement_id      TEXT NOT NULL REFERENCES achievements(achievement_id),
    earned_at           TEXT NOT NULL,
    UNIQUE (user_id, achievement_id)
);

CREATE TABLE IF NOT EXISTS bookmarks (
    bookmark_id   TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    resource_type TEXT NOT NULL,
    resource_id   TEXT NOT NULL,
    title         TEXT NOT NULL,
    description   TEXT,
    thumbnail_url TEXT,
    created_at    TEXT NOT NULL,
    UNIQUE (user_id, resource_type, resource_id)
);

CREATE TABLE IF NOT EXISTS calendar_events (
    event_id    TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    summary     TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    location    TEXT NOT NULL DEFAULT '',
    start_time  TEXT NOT NULL,
    end_time    TEXT NOT NULL,
    timezone    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS achievements_category_idx ON achievements(category, required_points);
CREATE INDEX IF NOT EXISTS user_achievements_user_idx ON user_achievements(user_id, earned_at);
CREATE INDEX IF NOT EXISTS profiles_points_idx ON profiles(total_points);
CREATE INDEX IF NOT EXISTS bookmarks_user_idx ON bookmarks(user_id, created_at);
CREATE INDEX IF NOT EXISTS calendar_events_user_idx ON calendar_events(user_id, start_time);

PRAGMA user_version = 1;
";
