//! Goal planning MCP Tool

use serde::Serialize;

use crate::db::Database;
use crate::models::{ProfileRecord, ProfileUpsert};
use crate::nutrition::{DailyBudget, GoalPlan};
use crate::providers::ProfileProvider;

/// Response for plan_goal
#[derive(Debug, Serialize)]
pub struct PlanGoalResponse {
    #[serde(flatten)]
    pub plan: GoalPlan,
    pub text: &'static str,
    pub rate_min: f64,
    pub rate_max: f64,
    /// Set when the plan was written to the user's profile
    pub applied: bool,
    pub budget: Option<DailyBudget>,
}

/// Work out `target_weeks` for a pace. `current_weight_kg` falls back to the
/// stored profile; with `apply` the goal and duration are saved to it.
pub fn plan_goal(
    db: &Database,
    user_id: Option<&str>,
    current_weight_kg: Option<f64>,
    goal_weight_kg: f64,
    rate_kg_per_week: Option<f64>,
    apply: bool,
) -> Result<PlanGoalResponse, String> {
    let record = match user_id {
        Some(id) => db
            .get_profile(id)
            .map_err(|e| format!("Failed to get profile: {}", e))?,
        None => None,
    };

    let current = current_weight_kg
        .or_else(|| record.as_ref().map(|r| r.profile.current_weight_kg))
        .ok_or("current_weight_kg is required when the user has no profile")?;

    let plan = GoalPlan::new(current, goal_weight_kg, rate_kg_per_week).map_err(|e| e.to_string())?;
    let range = plan.direction.rate_range();

    let mut applied = false;
    let mut budget = None;

    if apply {
        let record = record.ok_or("apply needs an existing profile for user_id")?;

        let mut profile = record.profile.clone();
        profile.current_weight_kg = current;
        profile.goal_weight_kg = goal_weight_kg;
        profile.target_weeks = plan.target_weeks;
        profile.validate().map_err(|e| e.to_string())?;

        let data = ProfileUpsert {
            user_id: record.user_id,
            name: record.name,
            profile,
            tracking: record.tracking,
        };
        let saved = db
            .with_conn(|conn| ProfileRecord::upsert(conn, &data))
            .map_err(|e| format!("Failed to save profile: {}", e))?;

        tracing::info!(user_id = %saved.user_id, weeks = plan.target_weeks, "Goal plan applied");
        budget = DailyBudget::compute(&saved.profile, 0.0).ok();
        applied = true;
    }

    Ok(PlanGoalResponse {
        text: plan.text(),
        rate_min: *range.start(),
        rate_max: *range.end(),
        plan,
        applied,
        budget,
    })
}
