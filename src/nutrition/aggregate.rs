//! Nutrition aggregation
//!
//! Reduces logged entries to calorie and macro totals. Malformed fields are
//! skipped, never surfaced: an entry with parseable calories but a broken
//! macro still counts toward calories.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{FoodEntry, FoodFilter, Macros, NutritionTotals, TrackingMode};

/// Sum of parseable calories
pub fn total_calories<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a FoodEntry>,
{
    entries
        .into_iter()
        .filter_map(FoodEntry::calories_kcal)
        .sum()
}

/// Element-wise macro sum over entries whose three macros all parse
pub fn total_macros<'a, I>(entries: I) -> Macros
where
    I: IntoIterator<Item = &'a FoodEntry>,
{
    entries.into_iter().filter_map(FoodEntry::macros).sum()
}

/// Calories, macros and count for the entries a filter selects
pub fn totals(entries: &[FoodEntry], filter: &FoodFilter) -> NutritionTotals {
    let selected = filter.apply(entries);

    NutritionTotals {
        calories: total_calories(selected.iter().copied()),
        macros: total_macros(selected.iter().copied()),
        entry_count: selected.len(),
    }
}

/// Totals for one meal label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealTotals {
    pub meal_label: String,
    /// False when the label is not part of the user's tracking routine
    pub configured: bool,
    pub totals: NutritionTotals,
}

/// One day broken down by meal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub meals: Vec<MealTotals>,
    pub day: NutritionTotals,
}

impl DayTotals {
    /// Every configured label gets a row, in routine order, even when empty.
    /// Labels logged on the day but outside the routine follow in order of
    /// first appearance so nothing eaten is hidden from the day total.
    pub fn compute(entries: &[FoodEntry], date: NaiveDate, tracking: &TrackingMode) -> Self {
        let day_filter = FoodFilter::on(date);
        let on_day = day_filter.apply(entries);

        let mut labels: Vec<(String, bool)> = tracking
            .labels()
            .into_iter()
            .map(|l| (l.to_string(), true))
            .collect();
        for entry in &on_day {
            if !labels.iter().any(|(l, _)| *l == entry.meal_label) {
                labels.push((entry.meal_label.clone(), false));
            }
        }

        let meals = labels
            .into_iter()
            .map(|(meal_label, configured)| {
                let filter = day_filter.clone().with_meal(meal_label.clone());
                MealTotals {
                    totals: totals(entries, &filter),
                    meal_label,
                    configured,
                }
            })
            .collect();

        Self {
            date,
            meals,
            day: totals(entries, &day_filter),
        }
    }

    pub fn meal(&self, label: &str) -> Option<&MealTotals> {
        self.meals.iter().find(|m| m.meal_label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn entry(meal: &str, logged_at: &str, calories: &str, macros: [&str; 3]) -> FoodEntry {
        FoodEntry {
            id: "1".to_string(),
            user_id: "u1".to_string(),
            meal_label: meal.to_string(),
            name: "food".to_string(),
            amount: Some("100".to_string()),
            calories: Some(calories.to_string()),
            carbs: Some(macros[0].to_string()),
            protein: Some(macros[1].to_string()),
            fat: Some(macros[2].to_string()),
            logged_at: NaiveDateTime::parse_from_str(logged_at, "%Y-%m-%dT%H:%M").unwrap(),
            created_at: String::new(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_empty_is_zero() {
        let entries: Vec<FoodEntry> = Vec::new();
        assert_eq!(total_calories(&entries), 0.0);
        assert_eq!(total_macros(&entries), Macros::zero());

        let t = totals(&entries, &FoodFilter::all());
        assert_eq!(t.entry_count, 0);
        assert_eq!(t.calories, 0.0);
    }

    #[test]
    fn test_bad_macro_still_counts_calories() {
        let entries = vec![
            entry("Lunch", "2024-05-01T12:00", "250", ["abc", "10", "5"]),
            entry("Lunch", "2024-05-01T12:30", "100", ["20", "3", "1"]),
        ];

        assert!((total_calories(&entries) - 350.0).abs() < 1e-9);
        assert_eq!(total_macros(&entries), Macros::new(20.0, 3.0, 1.0));
    }

    #[test]
    fn test_comma_grouped_values_are_malformed() {
        let entries = vec![entry("Dinner", "2024-05-01T19:00", "1,200", ["1,5", "10", "5"])];

        assert_eq!(total_calories(&entries), 0.0);
        assert_eq!(total_macros(&entries), Macros::zero());
    }

    #[test]
    fn test_bad_calories_still_count_macros() {
        let entries = vec![entry("Lunch", "2024-05-01T12:00", "", ["20", "3", "1"])];

        assert_eq!(total_calories(&entries), 0.0);
        assert_eq!(total_macros(&entries), Macros::new(20.0, 3.0, 1.0));
        assert_eq!(totals(&entries, &FoodFilter::all()).entry_count, 1);
    }

    #[test]
    fn test_date_filter_local_day() {
        let entries = vec![
            entry("Dinner", "2024-05-01T23:59", "500", ["50", "30", "20"]),
            entry("Breakfast", "2024-05-02T00:01", "300", ["40", "10", "10"]),
        ];

        let t = totals(&entries, &FoodFilter::on(day(1)));
        assert_eq!(t.entry_count, 1);
        assert!((t.calories - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let mut entries = vec![
            entry("Lunch", "2024-05-01T12:00", "250.5", ["10.25", "5", "2"]),
            entry("Dinner", "2024-05-01T19:00", "610", ["70", "31.5", "22"]),
            entry("Snack", "2024-05-01T16:00", "95", ["20", "1", "0.5"]),
        ];
        let forward = totals(&entries, &FoodFilter::all());
        entries.reverse();
        let backward = totals(&entries, &FoodFilter::all());

        assert!((forward.calories - backward.calories).abs() < 1e-9);
        assert!((forward.macros.carbs - backward.macros.carbs).abs() < 1e-9);
    }

    #[test]
    fn test_day_totals_per_meal() {
        let tracking = TrackingMode::meal_based(&["Breakfast", "Lunch", "Dinner"]).unwrap();
        let entries = vec![
            entry("Breakfast", "2024-05-01T08:00", "300", ["40", "10", "10"]),
            entry("Breakfast", "2024-05-01T09:00", "100", ["10", "5", "2"]),
            entry("Dinner", "2024-05-01T19:00", "700", ["80", "40", "20"]),
            entry("Late Snack", "2024-05-01T23:00", "150", ["15", "2", "8"]),
            entry("Lunch", "2024-05-02T12:00", "999", ["1", "1", "1"]),
        ];

        let report = DayTotals::compute(&entries, day(1), &tracking);

        let labels: Vec<&str> = report.meals.iter().map(|m| m.meal_label.as_str()).collect();
        assert_eq!(labels, vec!["Breakfast", "Lunch", "Dinner", "Late Snack"]);

        let breakfast = report.meal("Breakfast").unwrap();
        assert!((breakfast.totals.calories - 400.0).abs() < 1e-9);
        assert_eq!(breakfast.totals.entry_count, 2);

        let lunch = report.meal("Lunch").unwrap();
        assert_eq!(lunch.totals.entry_count, 0);
        assert_eq!(lunch.totals.calories, 0.0);

        let snack = report.meal("Late Snack").unwrap();
        assert!(!snack.configured);

        assert!((report.day.calories - 1250.0).abs() < 1e-9);
        assert_eq!(report.day.entry_count, 4);
    }

    #[test]
    fn test_day_totals_meal_free() {
        let tracking = TrackingMode::default();
        let entries = vec![entry(
            crate::models::MEAL_FREE_LABEL,
            "2024-05-01T10:00",
            "200",
            ["1", "2", "3"],
        )];

        let report = DayTotals::compute(&entries, day(1), &tracking);
        assert_eq!(report.meals.len(), 1);
        assert!(report.meals[0].configured);
        assert!((report.day.calories - 200.0).abs() < 1e-9);
    }
}
