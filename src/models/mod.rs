//! Data models
//!
//! Profile and food-log records, plus the shared nutrition totals.

mod food_entry;
mod nutrition;
mod profile;
mod tracking;

pub use food_entry::{FoodEntry, FoodEntryCreate, FoodFilter, LOGGED_AT_FORMAT};
pub use nutrition::{Macros, NutritionTotals};
pub use profile::{
    Profile, ProfileError, ProfileRecord, ProfileUpsert, Sex, AGE_RANGE, HEIGHT_RANGE,
    WEIGHT_RANGE,
};
pub use tracking::{
    TrackingError, TrackingMode, MAIN_MEALS, MEAL_FREE_LABEL, MEAL_OPTIONS, MIN_MAIN_MEALS,
};
