//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    if current_version > SCHEMA_VERSION {
        tracing::warn!(
            current_version,
            expected = SCHEMA_VERSION,
            "Database schema is newer than this build"
        );
    }

    Ok(())
}

/// Get the current schema version (0 for a fresh database)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: profiles and food log
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- One row per user: biometrics, goal, tracking routine
        -- ============================================
        CREATE TABLE profiles (
            user_id TEXT PRIMARY KEY,
            name TEXT,
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female')),
            age_years INTEGER NOT NULL,
            height_cm INTEGER NOT NULL,
            current_weight_kg REAL NOT NULL,
            goal_weight_kg REAL NOT NULL,
            target_weeks INTEGER NOT NULL,
            tracking TEXT NOT NULL,              -- JSON TrackingMode
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD ENTRIES
        -- Numeric columns hold the raw text as logged;
        -- parsing happens on read
        -- ============================================
        CREATE TABLE food_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            meal_label TEXT NOT NULL,
            name TEXT NOT NULL,
            amount TEXT,
            calories TEXT,
            carbs TEXT,
            protein TEXT,
            fat TEXT,
            logged_at TEXT NOT NULL,             -- local wall clock, YYYY-MM-DDTHH:MM:SS
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_entries_user_logged ON food_entries(user_id, logged_at);
        CREATE INDEX idx_food_entries_user_meal ON food_entries(user_id, meal_label);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_exist() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('profiles', 'food_entries')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }
}
