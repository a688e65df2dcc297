//! Daily calorie budget
//!
//! Mifflin-St Jeor BMR, scaled by a fixed "lightly active" multiplier, plus
//! an even daily share of the energy needed to move from the current weight
//! to the goal weight within the target duration.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Profile, Sex};

/// "Lightly active" activity multiplier
pub const ACTIVITY_MULTIPLIER: f64 = 1.375;
/// Energy density of body mass change (kcal per kg)
pub const KCAL_PER_KG: f64 = 7700.0;
pub const DAYS_PER_WEEK: f64 = 7.0;

/// Sex-specific Mifflin-St Jeor constant
const MALE_CONSTANT: f64 = 5.0;
const FEMALE_CONSTANT: f64 = -161.0;

/// Inputs the budget is undefined for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BudgetError {
    #[error("Target duration is zero weeks")]
    ZeroTargetWeeks,

    #[error("Goal weight equals current weight; there is no trajectory to plan")]
    GoalEqualsCurrent,
}

/// Whether the user still has room today
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "kcal", rename_all = "lowercase")]
pub enum BudgetStatus {
    Left(f64),
    Over(f64),
}

/// Every step of the budget calculation for one profile and day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyBudget {
    pub bmr: f64,
    pub maintenance_calories: f64,
    pub total_delta_kcal: f64,
    pub daily_delta_kcal: f64,
    /// Budget before anything eaten today is subtracted
    pub daily_min_calorie: f64,
    pub consumed_today: f64,
    /// Remaining allowance; negative when over budget
    pub daily_calorie: f64,
}

/// Basal metabolic rate, kcal/day
pub fn basal_metabolic_rate(sex: Sex, weight_kg: f64, height_cm: f64, age_years: f64) -> f64 {
    let constant = match sex {
        Sex::Male => MALE_CONSTANT,
        Sex::Female => FEMALE_CONSTANT,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + constant
}

/// Calories needed to hold the current weight
pub fn maintenance_calories(profile: &Profile) -> f64 {
    bmr_for(profile) * ACTIVITY_MULTIPLIER
}

/// Energy between current and goal weight; negative when losing
pub fn total_delta_kcal(profile: &Profile) -> f64 {
    (profile.goal_weight_kg - profile.current_weight_kg) * KCAL_PER_KG
}

/// One day's share of the total delta
pub fn daily_delta_kcal(profile: &Profile) -> Result<f64, BudgetError> {
    check_preconditions(profile)?;
    Ok(total_delta_kcal(profile) / profile.target_weeks as f64 / DAYS_PER_WEEK)
}

/// Trajectory-adjusted budget, ignoring what was eaten today
pub fn daily_min_calorie(profile: &Profile) -> Result<f64, BudgetError> {
    Ok(maintenance_calories(profile) + daily_delta_kcal(profile)?)
}

impl DailyBudget {
    /// Run the whole chain for a profile and the calories already eaten today
    pub fn compute(profile: &Profile, consumed_today: f64) -> Result<Self, BudgetError> {
        check_preconditions(profile)?;

        let bmr = bmr_for(profile);
        let maintenance_calories = bmr * ACTIVITY_MULTIPLIER;
        let total_delta_kcal = total_delta_kcal(profile);
        let daily_delta_kcal = total_delta_kcal / profile.target_weeks as f64 / DAYS_PER_WEEK;
        let daily_min_calorie = maintenance_calories + daily_delta_kcal;

        Ok(Self {
            bmr,
            maintenance_calories,
            total_delta_kcal,
            daily_delta_kcal,
            daily_min_calorie,
            consumed_today,
            daily_calorie: daily_min_calorie - consumed_today,
        })
    }

    pub fn is_over(&self) -> bool {
        self.daily_calorie < 0.0
    }

    /// "N kcal left" or "N kcal over", always non-negative
    pub fn status(&self) -> BudgetStatus {
        if self.is_over() {
            BudgetStatus::Over(-self.daily_calorie)
        } else {
            BudgetStatus::Left(self.daily_calorie)
        }
    }

    /// Share of the daily budget already eaten, clamped to `0.0..=1.0`
    /// for progress displays. Nothing eaten is always 0.0; with no
    /// positive budget any food fills it.
    pub fn progress(&self) -> f64 {
        if self.consumed_today <= 0.0 {
            return 0.0;
        }
        if self.daily_min_calorie <= 0.0 {
            return 1.0;
        }
        (self.consumed_today / self.daily_min_calorie).clamp(0.0, 1.0)
    }
}

fn bmr_for(profile: &Profile) -> f64 {
    basal_metabolic_rate(
        profile.sex,
        profile.current_weight_kg,
        profile.height_cm as f64,
        profile.age_years as f64,
    )
}

fn check_preconditions(profile: &Profile) -> Result<(), BudgetError> {
    if profile.target_weeks == 0 {
        return Err(BudgetError::ZeroTargetWeeks);
    }
    if profile.goal_weight_kg == profile.current_weight_kg {
        return Err(BudgetError::GoalEqualsCurrent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn female_losing() -> Profile {
        Profile {
            sex: Sex::Female,
            age_years: 25,
            height_cm: 165,
            current_weight_kg: 70.0,
            goal_weight_kg: 60.0,
            target_weeks: 10,
        }
    }

    #[test]
    fn test_end_to_end_female_losing() {
        let budget = DailyBudget::compute(&female_losing(), 0.0).unwrap();

        // 700 + 1031.25 - 125 - 161
        assert!((budget.bmr - 1445.25).abs() < 0.001);
        assert!((budget.maintenance_calories - 1987.21875).abs() < 0.001);
        assert!((budget.total_delta_kcal - -77000.0).abs() < 0.001);
        assert!((budget.daily_delta_kcal - -1100.0).abs() < 0.001);
        assert!((budget.daily_min_calorie - 887.21875).abs() < 0.001);
    }

    #[test]
    fn test_sex_constant_difference_is_166() {
        let male = basal_metabolic_rate(Sex::Male, 80.0, 180.0, 40.0);
        let female = basal_metabolic_rate(Sex::Female, 80.0, 180.0, 40.0);
        assert!((male - female - 166.0).abs() < 1e-9);
    }

    #[test]
    fn test_male_bmr() {
        // 10*80 + 6.25*180 - 5*40 + 5
        let bmr = basal_metabolic_rate(Sex::Male, 80.0, 180.0, 40.0);
        assert!((bmr - 1730.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_sign_follows_goal_direction() {
        let losing = female_losing();
        assert!(daily_delta_kcal(&losing).unwrap() < 0.0);

        let mut gaining = female_losing();
        gaining.current_weight_kg = 55.0;
        assert!(daily_delta_kcal(&gaining).unwrap() > 0.0);
    }

    #[test]
    fn test_equal_goal_is_rejected() {
        let mut p = female_losing();
        p.goal_weight_kg = p.current_weight_kg;
        assert_eq!(daily_delta_kcal(&p), Err(BudgetError::GoalEqualsCurrent));
        assert_eq!(DailyBudget::compute(&p, 0.0), Err(BudgetError::GoalEqualsCurrent));
    }

    #[test]
    fn test_zero_weeks_is_rejected() {
        let mut p = female_losing();
        p.target_weeks = 0;
        assert_eq!(daily_min_calorie(&p), Err(BudgetError::ZeroTargetWeeks));
        assert_eq!(DailyBudget::compute(&p, 500.0), Err(BudgetError::ZeroTargetWeeks));
    }

    #[test]
    fn test_deterministic() {
        let p = female_losing();
        let a = DailyBudget::compute(&p, 420.0).unwrap();
        let b = DailyBudget::compute(&p, 420.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(daily_min_calorie(&p).unwrap(), a.daily_min_calorie);
    }

    #[test]
    fn test_consumed_is_subtracted_from_daily_only() {
        let p = female_losing();
        let budget = DailyBudget::compute(&p, 300.0).unwrap();
        assert!((budget.daily_calorie - (budget.daily_min_calorie - 300.0)).abs() < 1e-9);
        assert_eq!(budget.daily_min_calorie, daily_min_calorie(&p).unwrap());
    }

    #[test]
    fn test_status_left_and_over() {
        let p = female_losing();
        let under = DailyBudget::compute(&p, 800.0).unwrap();
        assert!(!under.is_over());
        match under.status() {
            BudgetStatus::Left(kcal) => assert!((kcal - 87.21875).abs() < 0.001),
            other => panic!("expected Left, got {:?}", other),
        }

        let over = DailyBudget::compute(&p, 1000.0).unwrap();
        assert!(over.is_over());
        match over.status() {
            BudgetStatus::Over(kcal) => assert!((kcal - 112.78125).abs() < 0.001),
            other => panic!("expected Over, got {:?}", other),
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        let p = female_losing();
        assert_eq!(DailyBudget::compute(&p, 0.0).unwrap().progress(), 0.0);
        assert_eq!(DailyBudget::compute(&p, 5000.0).unwrap().progress(), 1.0);
        let half = DailyBudget::compute(&p, 887.21875 / 2.0).unwrap().progress();
        assert!((half - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_without_positive_budget() {
        let mut p = female_losing();
        p.goal_weight_kg = 41.0;
        p.target_weeks = 1;

        let fasting = DailyBudget::compute(&p, 0.0).unwrap();
        assert!(fasting.daily_min_calorie < 0.0);
        assert_eq!(fasting.progress(), 0.0);
        assert_eq!(DailyBudget::compute(&p, 100.0).unwrap().progress(), 1.0);
    }
}
