//! Nutrition calculation module
//!
//! Calorie budget, aggregation of logged food, goal planning and the
//! per-gram scaling of searched foods.

pub mod aggregate;
pub mod budget;
pub mod goal;
pub mod serving;
pub mod suggestion;
pub mod units;

pub use aggregate::{total_calories, total_macros, totals, DayTotals, MealTotals};
pub use budget::{
    basal_metabolic_rate, daily_delta_kcal, daily_min_calorie, maintenance_calories,
    total_delta_kcal, BudgetError, BudgetStatus, DailyBudget, ACTIVITY_MULTIPLIER, KCAL_PER_KG,
};
pub use goal::{GoalDirection, GoalError, GoalPlan, DEFAULT_RATE};
pub use serving::{parse_description, PerGram, ServingError, ServingNutrition};
pub use suggestion::{can_suggest_more, total_recipe_calories, SuggestionCheck};
pub use units::{parse_decimal_input, parse_quantity, weight_to_grams};
