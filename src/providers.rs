//! Store seams
//!
//! The budget and aggregation code only needs two lookups: a profile by
//! user and that user's food log. The SQLite [`Database`] provides both;
//! tests and other front ends can supply their own.

use crate::db::{Database, DbResult};
use crate::models::{FoodEntry, FoodFilter, ProfileRecord};

pub trait ProfileProvider {
    fn get_profile(&self, user_id: &str) -> DbResult<Option<ProfileRecord>>;
}

pub trait FoodLogProvider {
    /// Entries for a user matching `filter`, oldest first
    fn get_food_entries(&self, user_id: &str, filter: &FoodFilter) -> DbResult<Vec<FoodEntry>>;
}

impl ProfileProvider for Database {
    fn get_profile(&self, user_id: &str) -> DbResult<Option<ProfileRecord>> {
        self.with_conn(|conn| ProfileRecord::get(conn, user_id))
    }
}

impl FoodLogProvider for Database {
    fn get_food_entries(&self, user_id: &str, filter: &FoodFilter) -> DbResult<Vec<FoodEntry>> {
        self.with_conn(|conn| FoodEntry::list(conn, user_id, filter))
    }
}

/// In-memory log, for callers that already hold the entries
impl FoodLogProvider for [FoodEntry] {
    fn get_food_entries(&self, user_id: &str, filter: &FoodFilter) -> DbResult<Vec<FoodEntry>> {
        let mut entries: Vec<FoodEntry> = self
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.logged_at.cmp(&b.logged_at));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{FoodEntryCreate, Profile, ProfileUpsert, Sex, TrackingMode};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    fn create(user: &str, meal: &str, logged_at: &str) -> FoodEntryCreate {
        FoodEntryCreate {
            user_id: user.to_string(),
            meal_label: meal.to_string(),
            name: "Oats".to_string(),
            amount: Some("80".to_string()),
            calories: Some("300".to_string()),
            carbs: Some("54".to_string()),
            protein: Some("10".to_string()),
            fat: Some("5".to_string()),
            logged_at: at(logged_at),
        }
    }

    fn database() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    #[test]
    fn test_database_profile_provider() {
        let db = database();
        assert!(db.get_profile("u1").unwrap().is_none());

        db.with_conn(|conn| {
            ProfileRecord::upsert(
                conn,
                &ProfileUpsert {
                    user_id: "u1".to_string(),
                    name: None,
                    profile: Profile {
                        sex: Sex::Male,
                        age_years: 30,
                        height_cm: 180,
                        current_weight_kg: 80.0,
                        goal_weight_kg: 75.0,
                        target_weeks: 10,
                    },
                    tracking: TrackingMode::default(),
                },
            )
        })
        .unwrap();

        let record = db.get_profile("u1").unwrap().unwrap();
        assert_eq!(record.profile.sex, Sex::Male);
    }

    #[test]
    fn test_database_and_slice_agree() {
        let db = database();
        let mut stored = Vec::new();
        for (user, meal, when) in [
            ("u1", "Breakfast", "2024-05-01T08:00"),
            ("u1", "Dinner", "2024-05-01T23:59"),
            ("u1", "Breakfast", "2024-05-02T00:01"),
            ("u2", "Breakfast", "2024-05-01T08:00"),
        ] {
            let entry = db
                .with_conn(|conn| FoodEntry::create(conn, &create(user, meal, when)))
                .unwrap();
            stored.push(entry);
        }

        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let filter = FoodFilter::on(day);

        let from_db = db.get_food_entries("u1", &filter).unwrap();
        let from_slice = stored.as_slice().get_food_entries("u1", &filter).unwrap();
        assert_eq!(from_db, from_slice);
        assert_eq!(from_db.len(), 2);
    }
}
