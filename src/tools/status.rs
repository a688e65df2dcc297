//! Status Tool
//!
//! Runtime status and the diary usage guide for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::build_info::BuildInfo;

/// Food diary instructions for AI assistants
pub const DIARY_INSTRUCTIONS: &str = r#"
# Weight Manager Diary Instructions

## 1. Set up the profile first

`set_profile` stores the six budget inputs plus the tracking routine:

- `sex`: "male" or "female"
- `age_years`: 13-99
- `height_cm`: 52-299
- `current_weight_kg`, `goal_weight_kg`: 41-224, and not equal
- `target_weeks`: at least 1. If the user gives a pace instead
  ("half a kilo a week"), call `plan_goal` and use its `target_weeks`.
- `meals` (optional): meal-based tracking, e.g.
  `["Breakfast", "Lunch", "Dinner", "Afternoon Snack"]`. At least two of
  Breakfast, Lunch and Dinner. Omit it for meal-free tracking.

Weights accept a comma as decimal separator ("70,5").

## 2. Log food

Two ways:

- `search_foods` then `log_searched_food` with the `description` of the
  chosen hit and the grams eaten. Values are scaled per gram. Only hits
  whose serving is a weight ("Per 100g", "Per 2 oz") can be scaled.
- `log_food` with values the user supplies directly.

`meal_label` must be one of the user's configured meals. `logged_at` is
local time `YYYY-MM-DDTHH:MM:SS`; omit it for "now".

## 3. Read back

- `get_daily_report`: budget, what is left or over, and per-meal totals.
- `get_totals`: calories and macros for a date and/or meal.
- `list_food_entries` / `delete_food_entry`.

An entry whose carbs, protein or fat is not a number still counts toward
calories but is left out of the macro totals.

## 4. Suggestions

`check_suggestions` takes recipe ids (see `get_recipe`) and says whether
their combined calories still fit under the daily budget.
"#;

/// Status information returned by wm_status
#[derive(Debug, Serialize)]
pub struct WmStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub food_search_configured: bool,

    pub uptime_seconds: u64,
    pub process_id: u32,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    food_search_configured: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, food_search_configured: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            food_search_configured,
        }
    }

    pub fn get_status(&self) -> WmStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        WmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            food_search_configured: self.food_search_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: std::process::id(),
        }
    }
}
