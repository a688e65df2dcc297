//! Profile MCP Tools
//!
//! Onboarding: store biometrics, goal and tracking routine for a user.

use serde::Serialize;

use super::DecimalInput;
use crate::db::Database;
use crate::models::{Profile, ProfileError, ProfileRecord, ProfileUpsert, Sex, TrackingMode};
use crate::nutrition::{DailyBudget, GoalDirection};
use crate::providers::ProfileProvider;

/// Profile fields as they arrive from a client
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub user_id: String,
    pub name: Option<String>,
    pub sex: String,
    pub age_years: u32,
    pub height_cm: u32,
    pub current_weight_kg: DecimalInput,
    pub goal_weight_kg: DecimalInput,
    pub target_weeks: u32,
    /// Meal-based routine when non-empty
    pub meals: Option<Vec<String>>,
    /// Label for meal-free tracking
    pub meal_free_label: Option<String>,
}

/// Stored profile plus what it implies
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub record: ProfileRecord,
    pub goal: Option<&'static str>,
    pub meal_labels: Vec<String>,
    /// Budget with nothing eaten yet
    pub budget: Option<DailyBudget>,
}

impl ProfileResponse {
    fn from_record(record: ProfileRecord) -> Self {
        let p = &record.profile;
        let goal = GoalDirection::between(p.current_weight_kg, p.goal_weight_kg).map(|d| d.text());
        let budget = DailyBudget::compute(p, 0.0).ok();
        let meal_labels = record.tracking.labels().iter().map(|l| l.to_string()).collect();

        Self {
            record,
            goal,
            meal_labels,
            budget,
        }
    }
}

fn build_upsert(input: ProfileInput) -> Result<ProfileUpsert, String> {
    let user_id = input.user_id.trim();
    if user_id.is_empty() {
        return Err("user_id cannot be empty".to_string());
    }

    let sex = Sex::from_str(&input.sex).ok_or_else(|| ProfileError::Sex(input.sex.clone()).to_string())?;

    let profile = Profile {
        sex,
        age_years: input.age_years,
        height_cm: input.height_cm,
        current_weight_kg: input.current_weight_kg.require("current_weight_kg")?,
        goal_weight_kg: input.goal_weight_kg.require("goal_weight_kg")?,
        target_weeks: input.target_weeks,
    };
    profile.validate().map_err(|e| e.to_string())?;

    let tracking = match input.meals.filter(|m| !m.is_empty()) {
        Some(meals) => TrackingMode::meal_based(meals.as_slice()),
        None => match input.meal_free_label.as_deref() {
            Some(label) => TrackingMode::meal_free(label),
            None => Ok(TrackingMode::default()),
        },
    }
    .map_err(|e| e.to_string())?;

    Ok(ProfileUpsert {
        user_id: user_id.to_string(),
        name: input.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        profile,
        tracking,
    })
}

/// Validate and store a profile, replacing any previous one
pub fn set_profile(db: &Database, input: ProfileInput) -> Result<ProfileResponse, String> {
    let data = build_upsert(input)?;

    let record = db
        .with_conn(|conn| ProfileRecord::upsert(conn, &data))
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    Ok(ProfileResponse::from_record(record))
}

pub fn get_profile<P>(store: &P, user_id: &str) -> Result<Option<ProfileResponse>, String>
where
    P: ProfileProvider + ?Sized,
{
    let record = store
        .get_profile(user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(record.map(ProfileResponse::from_record))
}
