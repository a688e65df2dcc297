//! Goal planning
//!
//! Turns a goal weight and a weekly pace into the target duration the
//! budget calculator distributes the energy delta over.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weekly pace bounds when losing, kg/week
pub const LOSE_RATE_RANGE: RangeInclusive<f64> = 0.2..=1.0;
/// Weekly pace bounds when gaining, kg/week
pub const GAIN_RATE_RANGE: RangeInclusive<f64> = 0.2..=0.6;
pub const RATE_STEP: f64 = 0.1;
pub const DEFAULT_RATE: f64 = 0.4;

/// Absorbs float noise so that e.g. 0.6 / 0.2 plans 3 weeks, not 2
const WEEKS_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    #[error("Goal weight equals current weight")]
    NoChange,

    #[error("Rate {rate} kg/week is outside {min}..={max} for {direction}")]
    RateOutOfRange {
        rate: f64,
        min: f64,
        max: f64,
        direction: &'static str,
    },

    #[error("A {difference} kg change at {rate} kg/week is less than one week")]
    TooShort { difference: f64, rate: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Lose,
    Gain,
}

impl GoalDirection {
    /// Direction from current to goal weight; `None` when they are equal
    pub fn between(current_kg: f64, goal_kg: f64) -> Option<Self> {
        if goal_kg < current_kg {
            Some(GoalDirection::Lose)
        } else if goal_kg > current_kg {
            Some(GoalDirection::Gain)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalDirection::Lose => "lose",
            GoalDirection::Gain => "gain",
        }
    }

    /// Display text shown next to the goal
    pub fn text(&self) -> &'static str {
        match self {
            GoalDirection::Lose => "Lose Weight",
            GoalDirection::Gain => "Gain Weight",
        }
    }

    pub fn rate_range(&self) -> RangeInclusive<f64> {
        match self {
            GoalDirection::Lose => LOSE_RATE_RANGE,
            GoalDirection::Gain => GAIN_RATE_RANGE,
        }
    }
}

/// A pace and the duration it implies
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalPlan {
    pub direction: GoalDirection,
    pub difference_kg: f64,
    pub rate_kg_per_week: f64,
    pub target_weeks: u32,
}

/// Snap a rate to the 0.1 kg/week grid
pub fn snap_rate(rate: f64) -> f64 {
    (rate / RATE_STEP).round() * RATE_STEP
}

impl GoalPlan {
    /// Plan at `rate` kg/week (default pace when `None`)
    pub fn new(current_kg: f64, goal_kg: f64, rate: Option<f64>) -> Result<Self, GoalError> {
        let direction = GoalDirection::between(current_kg, goal_kg).ok_or(GoalError::NoChange)?;
        let rate = snap_rate(rate.unwrap_or(DEFAULT_RATE));

        let range = direction.rate_range();
        // compare on the grid so 0.6000000000000001 is still in range
        let in_range = rate >= range.start() - WEEKS_EPSILON && rate <= range.end() + WEEKS_EPSILON;
        if !in_range {
            return Err(GoalError::RateOutOfRange {
                rate,
                min: *range.start(),
                max: *range.end(),
                direction: direction.as_str(),
            });
        }

        let difference_kg = (current_kg - goal_kg).abs();
        let weeks = (difference_kg / rate + WEEKS_EPSILON).floor();
        if weeks < 1.0 {
            return Err(GoalError::TooShort {
                difference: difference_kg,
                rate,
            });
        }

        Ok(Self {
            direction,
            difference_kg,
            rate_kg_per_week: rate,
            target_weeks: weeks as u32,
        })
    }

    pub fn text(&self) -> &'static str {
        self.direction.text()
    }
}
