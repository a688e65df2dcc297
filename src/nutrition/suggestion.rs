//! Recipe suggestions
//!
//! Suggestions keep coming while the suggested recipes add up to less than
//! the day's budget.

use serde::Serialize;

use super::budget::{daily_min_calorie, BudgetError};
use super::units::parse_quantity;
use crate::models::Profile;
use crate::search::Recipe;

/// Where a set of suggested recipes stands against the budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionCheck {
    pub recipe_count: usize,
    pub total_calories: f64,
    /// `None` when the budget is undefined for the profile
    pub daily_min_calorie: Option<f64>,
    pub can_suggest_more: bool,
}

/// Calories per serving across recipes; unparseable values count as zero
pub fn total_recipe_calories(recipes: &[Recipe]) -> f64 {
    recipes
        .iter()
        .filter_map(|r| r.calories.as_deref().and_then(parse_quantity))
        .sum()
}

/// Another suggestion is allowed only while the total is under the budget
pub fn can_suggest_more(total_calories: f64, budget: Result<f64, BudgetError>) -> bool {
    match budget {
        Ok(daily_min) => total_calories < daily_min,
        Err(_) => false,
    }
}

impl SuggestionCheck {
    pub fn evaluate(profile: &Profile, recipes: &[Recipe]) -> Self {
        let total_calories = total_recipe_calories(recipes);
        let budget = daily_min_calorie(profile);
        if let Err(e) = &budget {
            tracing::debug!(error = %e, "Suggestions disabled, no budget");
        }

        Self {
            recipe_count: recipes.len(),
            total_calories,
            daily_min_calorie: budget.as_ref().ok().copied(),
            can_suggest_more: can_suggest_more(total_calories, budget),
        }
    }
}
