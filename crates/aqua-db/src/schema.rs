//! SQL schema definitions.

/// Complete schema for the v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Owners & tanks
-- ============================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform_user_id INTEGER NOT NULL UNIQUE,
    username TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS aquariums (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK (length(name) > 0),
    description TEXT,
    volume_l REAL CHECK (volume_l IS NULL OR volume_l > 0),
    created_at INTEGER NOT NULL,
    UNIQUE (user_id, name)
);

CREATE INDEX IF NOT EXISTS idx_aquariums_user ON aquariums(user_id);

CREATE TABLE IF NOT EXISTS inhabitants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    aquarium_id INTEGER NOT NULL REFERENCES aquariums(id) ON DELETE CASCADE,
    kind TEXT NOT NULL CHECK (kind IN ('fish', 'plant')),
    species TEXT NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity > 0 AND quantity <= 4294967295),
    added_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_inhabitants_aquarium ON inhabitants(aquarium_id);

-- ============================================================
-- Water quality
-- ============================================================

CREATE TABLE IF NOT EXISTS measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    aquarium_id INTEGER NOT NULL REFERENCES aquariums(id) ON DELETE CASCADE,
    measured_at INTEGER NOT NULL,
    ph REAL,
    kh REAL CHECK (kh IS NULL OR kh >= 0),
    gh REAL CHECK (gh IS NULL OR gh >= 0),
    no2 REAL CHECK (no2 IS NULL OR no2 >= 0),
    no3 REAL CHECK (no3 IS NULL OR no3 >= 0),
    tan_mg_l REAL CHECK (tan_mg_l IS NULL OR tan_mg_l >= 0),
    po4 REAL CHECK (po4 IS NULL OR po4 >= 0),
    temp_c REAL,
    nh3_fraction REAL CHECK (nh3_fraction IS NULL OR (nh3_fraction >= 0 AND nh3_fraction <= 1)),
    nh3_mg_l REAL CHECK (nh3_mg_l IS NULL OR nh3_mg_l >= 0),
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_measurements_aquarium_time ON measurements(aquarium_id, measured_at);

-- ============================================================
-- Water changes
-- ============================================================

CREATE TABLE IF NOT EXISTS water_settings (
    aquarium_id INTEGER PRIMARY KEY REFERENCES aquariums(id) ON DELETE CASCADE,
    change_volume_pct REAL NOT NULL CHECK (change_volume_pct > 0 AND change_volume_pct <= 100),
    period_days INTEGER NOT NULL CHECK (period_days > 0),
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS water_changes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    aquarium_id INTEGER NOT NULL REFERENCES aquariums(id) ON DELETE CASCADE,
    changed_at INTEGER NOT NULL,
    volume_pct REAL NOT NULL CHECK (volume_pct > 0 AND volume_pct <= 100)
);

CREATE INDEX IF NOT EXISTS idx_water_changes_aquarium_time ON water_changes(aquarium_id, changed_at);

-- ============================================================
-- Species reference catalog
-- ============================================================

CREATE TABLE IF NOT EXISTS species (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL CHECK (kind IN ('fish', 'plant')),
    ph_min REAL,
    ph_max REAL,
    temp_min_c REAL,
    temp_max_c REAL,
    kh_min REAL,
    kh_max REAL,
    gh_min REAL,
    gh_max REAL,
    no3_max REAL,
    nh3_max_mg_l REAL,
    CHECK (ph_min IS NULL OR ph_max IS NULL OR ph_min <= ph_max),
    CHECK (temp_min_c IS NULL OR temp_max_c IS NULL OR temp_min_c <= temp_max_c),
    CHECK (kh_min IS NULL OR kh_max IS NULL OR kh_min <= kh_max),
    CHECK (gh_min IS NULL OR gh_max IS NULL OR gh_min <= gh_max)
);

-- ============================================================
-- Application settings
-- ============================================================

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
