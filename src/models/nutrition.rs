//! Shared nutrition totals
//!
//! Used by the aggregator, the serving scaler and the tool responses.

use serde::{Deserialize, Serialize};

/// Macro-nutrient grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub carbs: f64,   // grams
    pub protein: f64, // grams
    pub fat: f64,     // grams
}

impl Macros {
    pub fn new(carbs: f64, protein: f64, fat: f64) -> Self {
        Self { carbs, protein, fat }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every field by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            carbs: self.carbs * multiplier,
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            carbs: self.carbs + other.carbs,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
        }
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

/// Calories plus macros for a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub macros: Macros,
    /// Entries in the set, including ones that contributed nothing
    pub entry_count: usize,
}
