//! Serving descriptions from food search
//!
//! Search hits describe nutrition as a single line:
//! `Per 100g - Calories: 165kcal | Fat: 3.57g | Carbs: 0.00g | Protein: 31.02g`.
//! This module parses that line and scales it to the amount actually eaten.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use super::units::{parse_decimal_input, parse_quantity, weight_to_grams};
use crate::models::{FoodEntryCreate, Macros};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServingError {
    #[error("Description has no 'Per <serving> - ' prefix: {0}")]
    MissingServing(String),

    #[error("Description is missing the {0} value")]
    MissingField(&'static str),

    #[error("Serving '{0}' is not a weight, cannot scale per gram")]
    NotWeighable(String),

    #[error("Serving size is zero grams")]
    ZeroServing,

    #[error("Amount '{0}' is not a valid number of grams")]
    InvalidAmount(String),
}

/// Nutrition for one serving as the search result reports it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServingNutrition {
    /// Serving text, e.g. "100g" or "1 cup"
    pub serving: String,
    /// Serving weight when the serving is a weight
    pub serving_grams: Option<f64>,
    pub calories: f64,
    pub macros: Macros,
}

/// Nutrition in one gram of the food
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerGram {
    pub calories: f64,
    pub macros: Macros,
}

impl PerGram {
    pub fn scale(&self, grams: f64) -> (f64, Macros) {
        (self.calories * grams, self.macros.scale(grams))
    }
}

/// Parse a search description line
pub fn parse_description(description: &str) -> Result<ServingNutrition, ServingError> {
    let (head, facts) = description
        .split_once(" - ")
        .ok_or_else(|| ServingError::MissingServing(description.to_string()))?;

    let serving = head
        .trim()
        .strip_prefix("Per ")
        .ok_or_else(|| ServingError::MissingServing(description.to_string()))?
        .trim()
        .to_string();

    let mut calories = None;
    let mut fat = None;
    let mut carbs = None;
    let mut protein = None;

    for fact in facts.split('|') {
        let Some((key, value)) = fact.split_once(':') else {
            continue;
        };
        let value = strip_unit(value);
        match key.trim().to_lowercase().as_str() {
            "calories" => calories = parse_quantity(value),
            "fat" => fat = parse_quantity(value),
            "carbs" => carbs = parse_quantity(value),
            "protein" => protein = parse_quantity(value),
            _ => {}
        }
    }

    Ok(ServingNutrition {
        serving_grams: weight_to_grams(&serving),
        serving,
        calories: calories.ok_or(ServingError::MissingField("calories"))?,
        macros: Macros::new(
            carbs.ok_or(ServingError::MissingField("carbs"))?,
            protein.ok_or(ServingError::MissingField("protein"))?,
            fat.ok_or(ServingError::MissingField("fat"))?,
        ),
    })
}

/// "165kcal" -> "165", "3.57g" -> "3.57"
fn strip_unit(value: &str) -> &str {
    value
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim()
}

impl ServingNutrition {
    pub fn per_gram(&self) -> Result<PerGram, ServingError> {
        let grams = self
            .serving_grams
            .ok_or_else(|| ServingError::NotWeighable(self.serving.clone()))?;
        if grams <= 0.0 {
            return Err(ServingError::ZeroServing);
        }

        Ok(PerGram {
            calories: self.calories / grams,
            macros: self.macros.scale(1.0 / grams),
        })
    }

    /// Build the log entry for `amount` grams of this food
    pub fn to_entry(
        &self,
        user_id: &str,
        meal_label: &str,
        name: &str,
        amount: &str,
        logged_at: NaiveDateTime,
    ) -> Result<FoodEntryCreate, ServingError> {
        let grams = parse_decimal_input(amount)
            .ok_or_else(|| ServingError::InvalidAmount(amount.to_string()))?;
        let (calories, macros) = self.per_gram()?.scale(grams);

        tracing::debug!(name, grams, calories, "Scaled searched food");

        Ok(FoodEntryCreate {
            user_id: user_id.to_string(),
            meal_label: meal_label.to_string(),
            name: name.to_string(),
            amount: Some(format_value(grams)),
            calories: Some(format_value(calories)),
            carbs: Some(format_value(macros.carbs)),
            protein: Some(format_value(macros.protein)),
            fat: Some(format_value(macros.fat)),
            logged_at,
        })
    }
}

/// Two decimals, trailing zeros dropped ("150", "49.5", "4.67")
pub fn format_value(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHICKEN: &str =
        "Per 100g - Calories: 165kcal | Fat: 3.57g | Carbs: 0.00g | Protein: 31.02g";

    #[test]
    fn test_parse_description() {
        let s = parse_description(CHICKEN).unwrap();
        assert_eq!(s.serving, "100g");
        assert_eq!(s.serving_grams, Some(100.0));
        assert!((s.calories - 165.0).abs() < 1e-9);
        assert_eq!(s.macros, Macros::new(0.0, 31.02, 3.57));
    }

    #[test]
    fn test_parse_non_weight_serving() {
        let s = parse_description(
            "Per 1 medium - Calories: 105kcal | Fat: 0.39g | Carbs: 26.95g | Protein: 1.29g",
        )
        .unwrap();
        assert_eq!(s.serving, "1 medium");
        assert_eq!(s.serving_grams, None);
        assert_eq!(
            s.per_gram(),
            Err(ServingError::NotWeighable("1 medium".to_string()))
        );
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_description("Per 100g - Calories: 165kcal | Fat: 3.57g").unwrap_err();
        assert_eq!(err, ServingError::MissingField("carbs"));

        assert!(matches!(
            parse_description("Calories: 165kcal"),
            Err(ServingError::MissingServing(_))
        ));
    }

    #[test]
    fn test_per_gram_scaling() {
        let s = parse_description(CHICKEN).unwrap();
        let per_gram = s.per_gram().unwrap();
        assert!((per_gram.calories - 1.65).abs() < 1e-9);

        let (calories, macros) = per_gram.scale(150.0);
        assert!((calories - 247.5).abs() < 1e-9);
        assert!((macros.protein - 46.53).abs() < 1e-9);
    }

    #[test]
    fn test_to_entry_formats_values() {
        let s = parse_description(CHICKEN).unwrap();
        let at = NaiveDateTime::parse_from_str("2024-05-01T12:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let entry = s.to_entry("u1", "Lunch", "Chicken Breast", "200", at).unwrap();

        assert_eq!(entry.amount.as_deref(), Some("200"));
        assert_eq!(entry.calories.as_deref(), Some("330"));
        assert_eq!(entry.carbs.as_deref(), Some("0"));
        assert_eq!(entry.protein.as_deref(), Some("62.04"));
        assert_eq!(entry.fat.as_deref(), Some("7.14"));
        assert_eq!(entry.meal_label, "Lunch");
    }

    #[test]
    fn test_to_entry_rejects_bad_amount() {
        let s = parse_description(CHICKEN).unwrap();
        let at = NaiveDateTime::parse_from_str("2024-05-01T12:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert_eq!(
            s.to_entry("u1", "Lunch", "Chicken", "lots", at),
            Err(ServingError::InvalidAmount("lots".to_string()))
        );
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(150.0), "150");
        assert_eq!(format_value(49.5), "49.5");
        assert_eq!(format_value(4.666), "4.67");
        assert_eq!(format_value(0.0), "0");
    }
}
