//! Food Entry model
//!
//! One logged food. Numeric fields are kept as the raw text that was logged
//! (the way a loosely typed document store hands them back) and parsed on
//! read, so a malformed field degrades one value instead of the whole record.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::Macros;
use crate::db::DbResult;
use crate::nutrition::units::parse_quantity;

/// Storage and wire format for `logged_at` (local wall clock, no offset)
pub const LOGGED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A logged food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub user_id: String,
    pub meal_label: String,
    pub name: String,
    pub amount: Option<String>,
    pub calories: Option<String>,
    pub carbs: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
    /// Local wall-clock time the food was eaten
    pub logged_at: NaiveDateTime,
    pub created_at: String,
}

/// Data for logging a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntryCreate {
    pub user_id: String,
    pub meal_label: String,
    pub name: String,
    pub amount: Option<String>,
    pub calories: Option<String>,
    pub carbs: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
    pub logged_at: NaiveDateTime,
}

/// Which entries a query or aggregation covers. Both axes are optional and
/// compose: meal on a day, a day across meals, or a meal across all time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodFilter {
    pub date: Option<NaiveDate>,
    pub meal_label: Option<String>,
}

impl FoodFilter {
    /// Everything
    pub fn all() -> Self {
        Self::default()
    }

    /// One local calendar day, all meals
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            meal_label: None,
        }
    }

    /// One meal label, all days
    pub fn meal(label: impl Into<String>) -> Self {
        Self {
            date: None,
            meal_label: Some(label.into()),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_meal(mut self, label: impl Into<String>) -> Self {
        self.meal_label = Some(label.into());
        self
    }

    /// Same calendar day of the local `logged_at`, exact label equality
    pub fn matches(&self, entry: &FoodEntry) -> bool {
        let date_ok = self.date.map_or(true, |d| entry.logged_on() == d);
        let meal_ok = self
            .meal_label
            .as_deref()
            .map_or(true, |label| entry.meal_label == label);
        date_ok && meal_ok
    }

    /// Borrow the matching entries
    pub fn apply<'a>(&self, entries: &'a [FoodEntry]) -> Vec<&'a FoodEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

impl FoodEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id: i64 = row.get("id")?;
        let logged_at_idx = row.as_ref().column_index("logged_at")?;
        let logged_at: String = row.get(logged_at_idx)?;
        let logged_at = NaiveDateTime::parse_from_str(&logged_at, LOGGED_AT_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(logged_at_idx, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: id.to_string(),
            user_id: row.get("user_id")?,
            meal_label: row.get("meal_label")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            calories: row.get("calories")?,
            carbs: row.get("carbs")?,
            protein: row.get("protein")?,
            fat: row.get("fat")?,
            logged_at,
            created_at: row.get("created_at")?,
        })
    }

    /// Local calendar day the food was eaten
    pub fn logged_on(&self) -> NaiveDate {
        self.logged_at.date()
    }

    pub fn amount_grams(&self) -> Option<f64> {
        parse_field(self.amount.as_deref())
    }

    pub fn calories_kcal(&self) -> Option<f64> {
        parse_field(self.calories.as_deref())
    }

    /// All three macros, or `None` if any one of them is missing or
    /// malformed. Entries never contribute a partial macro triple.
    pub fn macros(&self) -> Option<Macros> {
        let carbs = parse_field(self.carbs.as_deref())?;
        let protein = parse_field(self.protein.as_deref())?;
        let fat = parse_field(self.fat.as_deref())?;
        Some(Macros::new(carbs, protein, fat))
    }

    /// Log a food
    pub fn create(conn: &Connection, data: &FoodEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_entries (
                user_id, meal_label, name, amount, calories, carbs, protein, fat, logged_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.user_id,
                data.meal_label,
                data.name,
                data.amount,
                data.calories,
                data.carbs,
                data.protein,
                data.fat,
                data.logged_at.format(LOGGED_AT_FORMAT).to_string(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(user_id = %data.user_id, id, meal = %data.meal_label, "Food entry logged");

        Self::get_by_id(conn, &id.to_string())?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an entry by ID. Ids that are not ours simply don't match.
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let Ok(rowid) = id.trim().parse::<i64>() else {
            return Ok(None);
        };

        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE id = ?1")?;

        let result = stmt.query_row([rowid], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's entries matching the filter, oldest first
    pub fn list(conn: &Connection, user_id: &str, filter: &FoodFilter) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM food_entries WHERE user_id = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(date) = filter.date {
            params_vec.push(Box::new(day_start(date)));
            sql.push_str(&format!(" AND logged_at >= ?{}", params_vec.len()));

            if let Some(next) = date.succ_opt() {
                params_vec.push(Box::new(day_start(next)));
                sql.push_str(&format!(" AND logged_at < ?{}", params_vec.len()));
            }
        }

        if let Some(ref label) = filter.meal_label {
            params_vec.push(Box::new(label.clone()));
            sql.push_str(&format!(" AND meal_label = ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY logged_at ASC, id ASC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete one of a user's entries
    pub fn delete(conn: &Connection, user_id: &str, id: &str) -> DbResult<bool> {
        let Ok(rowid) = id.trim().parse::<i64>() else {
            return Ok(false);
        };

        let rows = conn.execute(
            "DELETE FROM food_entries WHERE id = ?1 AND user_id = ?2",
            params![rowid, user_id],
        )?;

        if rows > 0 {
            tracing::info!(user_id, id = rowid, "Food entry deleted");
        }
        Ok(rows > 0)
    }
}

fn day_start(date: NaiveDate) -> String {
    format!("{}T00:00:00", date.format("%Y-%m-%d"))
}

fn parse_field(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    let parsed = parse_quantity(raw);
    if parsed.is_none() {
        tracing::debug!(value = raw, "Skipping malformed numeric field");
    }
    parsed
}
