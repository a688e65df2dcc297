//! Tracking routine
//!
//! Users either log everything under one label (meal-free) or bucket food
//! under a chosen set of meals (meal-based). The two modes are exclusive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every meal a meal-based routine may include, in display order
pub const MEAL_OPTIONS: [&str; 6] = [
    "Breakfast",
    "Morning Snack",
    "Lunch",
    "Afternoon Snack",
    "Dinner",
    "Evening Snack",
];

/// Meals that count toward the main-meal minimum
pub const MAIN_MEALS: [&str; 3] = ["Breakfast", "Lunch", "Dinner"];

/// Minimum number of main meals in a meal-based routine
pub const MIN_MAIN_MEALS: usize = 2;

/// Default label for meal-free logging
pub const MEAL_FREE_LABEL: &str = "Meal-Free";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    #[error("Unknown meal '{0}'")]
    UnknownMeal(String),

    #[error("Meal '{0}' selected more than once")]
    DuplicateMeal(String),

    #[error("Choose at least 2 main meals (Breakfast, Lunch, Dinner); got {0}")]
    TooFewMainMeals(usize),

    #[error("Meal-free label must not be empty")]
    EmptyLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TrackingMode {
    MealFree { label: String },
    MealBased { meals: Vec<String> },
}

impl Default for TrackingMode {
    fn default() -> Self {
        TrackingMode::MealFree {
            label: MEAL_FREE_LABEL.to_string(),
        }
    }
}

impl TrackingMode {
    /// Meal-free routine with a custom label
    pub fn meal_free(label: &str) -> Result<Self, TrackingError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TrackingError::EmptyLabel);
        }
        Ok(TrackingMode::MealFree {
            label: label.to_string(),
        })
    }

    /// Meal-based routine; meals are matched case-insensitively against
    /// [`MEAL_OPTIONS`] and stored in canonical spelling and order
    pub fn meal_based<S: AsRef<str>>(meals: &[S]) -> Result<Self, TrackingError> {
        let mut selected: Vec<&'static str> = Vec::with_capacity(meals.len());

        for meal in meals {
            let wanted = meal.as_ref().trim();
            let canonical = MEAL_OPTIONS
                .iter()
                .copied()
                .find(|option| option.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| TrackingError::UnknownMeal(wanted.to_string()))?;

            if selected.contains(&canonical) {
                return Err(TrackingError::DuplicateMeal(canonical.to_string()));
            }
            selected.push(canonical);
        }

        let main_count = selected.iter().filter(|m| MAIN_MEALS.contains(*m)).count();
        if main_count < MIN_MAIN_MEALS {
            return Err(TrackingError::TooFewMainMeals(main_count));
        }

        let meals = MEAL_OPTIONS
            .iter()
            .filter(|option| selected.contains(*option))
            .map(|option| option.to_string())
            .collect();

        Ok(TrackingMode::MealBased { meals })
    }

    /// Labels food is bucketed under, in display order
    pub fn labels(&self) -> Vec<&str> {
        match self {
            TrackingMode::MealFree { label } => vec![label.as_str()],
            TrackingMode::MealBased { meals } => meals.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_meal_based(&self) -> bool {
        matches!(self, TrackingMode::MealBased { .. })
    }

    /// Whether food may be logged under this label
    pub fn accepts(&self, label: &str) -> bool {
        self.labels().iter().any(|l| *l == label)
    }
}
