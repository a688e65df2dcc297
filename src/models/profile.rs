//! Profile model
//!
//! Biometrics and weight goal for one user, plus their tracking routine.

use std::ops::RangeInclusive;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Type, ValueRef};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TrackingMode;
use crate::db::{DbError, DbResult};

/// Accepted age range, years
pub const AGE_RANGE: RangeInclusive<u32> = 13..=99;
/// Accepted height range, cm
pub const HEIGHT_RANGE: RangeInclusive<u32> = 52..=299;
/// Accepted body-weight range for current and goal weight, kg
pub const WEIGHT_RANGE: RangeInclusive<f64> = 41.0..=224.0;

/// Biological sex, selects the BMR constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Age must be between 13 and 99, got {0}")]
    Age(u32),

    #[error("Height must be between 52 and 299 cm, got {0}")]
    Height(u32),

    #[error("Weight must be between 41 and 224 kg, got {0}")]
    Weight(f64),

    #[error("Goal weight must be between 41 and 224 kg, got {0}")]
    GoalWeight(f64),

    #[error("Weight and goal weight cannot be the same")]
    GoalEqualsCurrent,

    #[error("Target duration must be at least one week")]
    ZeroTargetWeeks,

    #[error("Unknown sex '{0}', expected male or female")]
    Sex(String),
}

/// The six inputs of the budget calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: u32,
    pub current_weight_kg: f64,
    pub goal_weight_kg: f64,
    pub target_weeks: u32,
}

impl Profile {
    /// Onboarding rules. The calculator itself only guards the two
    /// arithmetic preconditions; ranges are enforced before storage.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !AGE_RANGE.contains(&self.age_years) {
            return Err(ProfileError::Age(self.age_years));
        }
        if !HEIGHT_RANGE.contains(&self.height_cm) {
            return Err(ProfileError::Height(self.height_cm));
        }
        if !WEIGHT_RANGE.contains(&self.current_weight_kg) {
            return Err(ProfileError::Weight(self.current_weight_kg));
        }
        if !WEIGHT_RANGE.contains(&self.goal_weight_kg) {
            return Err(ProfileError::GoalWeight(self.goal_weight_kg));
        }
        if self.goal_weight_kg == self.current_weight_kg {
            return Err(ProfileError::GoalEqualsCurrent);
        }
        if self.target_weeks == 0 {
            return Err(ProfileError::ZeroTargetWeeks);
        }
        Ok(())
    }
}

/// A stored profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: String,
    pub name: Option<String>,
    pub profile: Profile,
    pub tracking: TrackingMode,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or replacing a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpsert {
    pub user_id: String,
    pub name: Option<String>,
    pub profile: Profile,
    #[serde(default)]
    pub tracking: TrackingMode,
}

impl FromSql for Sex {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Sex::from_str(s).ok_or_else(|| FromSqlError::Other(ProfileError::Sex(s.to_string()).into()))
    }
}

impl ProfileRecord {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let tracking_idx = row.as_ref().column_index("tracking")?;
        let tracking: String = row.get(tracking_idx)?;
        let tracking = serde_json::from_str(&tracking).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(tracking_idx, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            profile: Profile {
                sex: row.get("sex")?,
                age_years: row.get("age_years")?,
                height_cm: row.get("height_cm")?,
                current_weight_kg: row.get("current_weight_kg")?,
                goal_weight_kg: row.get("goal_weight_kg")?,
                target_weeks: row.get("target_weeks")?,
            },
            tracking,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile for a user
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or replace a user's profile. Callers validate first.
    pub fn upsert(conn: &Connection, data: &ProfileUpsert) -> DbResult<Self> {
        let tracking = serde_json::to_string(&data.tracking)
            .map_err(|e| DbError::Encode(format!("tracking: {}", e)))?;
        let p = &data.profile;

        conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, name, sex, age_years, height_cm,
                current_weight_kg, goal_weight_kg, target_weeks, tracking
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                sex = excluded.sex,
                age_years = excluded.age_years,
                height_cm = excluded.height_cm,
                current_weight_kg = excluded.current_weight_kg,
                goal_weight_kg = excluded.goal_weight_kg,
                target_weeks = excluded.target_weeks,
                tracking = excluded.tracking,
                updated_at = datetime('now')
            "#,
            params![
                data.user_id,
                data.name,
                p.sex.as_str(),
                p.age_years,
                p.height_cm,
                p.current_weight_kg,
                p.goal_weight_kg,
                p.target_weeks,
                tracking,
            ],
        )?;

        tracing::info!(user_id = %data.user_id, "Profile saved");

        Self::get(conn, &data.user_id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}
