//! Food diary MCP Tools
//!
//! Logging, listing and deleting food entries, plus totals and the daily
//! report that compares the day against the calorie budget.

use chrono::NaiveDate;
use serde::Serialize;

use super::{parse_date, parse_logged_at};
use crate::db::Database;
use crate::models::{FoodEntry, FoodEntryCreate, FoodFilter, Macros, NutritionTotals, ProfileRecord};
use crate::nutrition::units::parse_quantity;
use crate::nutrition::{parse_description, BudgetStatus, DailyBudget, DayTotals, GoalDirection};
use crate::providers::{FoodLogProvider, ProfileProvider};

/// Food fields as they arrive from a client. Numbers stay text.
#[derive(Debug, Clone, Default)]
pub struct FoodInput {
    pub user_id: String,
    pub meal_label: String,
    pub name: String,
    pub amount: Option<String>,
    pub calories: Option<String>,
    pub carbs: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
    pub logged_at: Option<String>,
}

/// A food entry with its parsed values alongside the stored text
#[derive(Debug, Serialize)]
pub struct FoodEntryView {
    #[serde(flatten)]
    pub entry: FoodEntry,
    pub amount_grams: Option<f64>,
    pub calories_kcal: Option<f64>,
    pub macros: Option<Macros>,
}

impl From<FoodEntry> for FoodEntryView {
    fn from(entry: FoodEntry) -> Self {
        Self {
            amount_grams: entry.amount_grams(),
            calories_kcal: entry.calories_kcal(),
            macros: entry.macros(),
            entry,
        }
    }
}

/// Response for log_food and log_searched_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub entry: FoodEntryView,
    /// Fields that will be skipped by the totals
    pub warnings: Vec<String>,
}

/// Response for list_food_entries
#[derive(Debug, Serialize)]
pub struct ListFoodEntriesResponse {
    pub entries: Vec<FoodEntryView>,
    pub total: usize,
}

/// Response for delete_food_entry
#[derive(Debug, Serialize)]
pub struct DeleteFoodEntryResponse {
    pub success: bool,
    pub id: String,
}

/// Response for get_totals
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub user_id: String,
    pub date: Option<NaiveDate>,
    pub meal_label: Option<String>,
    #[serde(flatten)]
    pub totals: NutritionTotals,
}

/// Everything about one user's day
#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub user_id: String,
    pub date: NaiveDate,
    pub goal: Option<&'static str>,
    pub budget: Option<DailyBudget>,
    /// Why there is no budget
    pub budget_error: Option<String>,
    pub status: Option<BudgetStatus>,
    pub progress: Option<f64>,
    pub totals: DayTotals,
}

impl DailyReport {
    pub fn build(record: &ProfileRecord, entries: &[FoodEntry], date: NaiveDate) -> Self {
        let totals = DayTotals::compute(entries, date, &record.tracking);
        let p = &record.profile;

        let (budget, budget_error) = match DailyBudget::compute(p, totals.day.calories) {
            Ok(b) => (Some(b), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            user_id: record.user_id.clone(),
            date,
            goal: GoalDirection::between(p.current_weight_kg, p.goal_weight_kg).map(|d| d.text()),
            status: budget.as_ref().map(DailyBudget::status),
            progress: budget.as_ref().map(DailyBudget::progress),
            budget,
            budget_error,
            totals,
        }
    }

    /// Plain-text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut out = format!("{} - {}\n", self.user_id, self.date);
        if let Some(goal) = self.goal {
            out.push_str(&format!("Goal: {}\n", goal));
        }

        match (&self.budget, &self.status) {
            (Some(b), Some(status)) => {
                out.push_str(&format!("Daily budget: {:.0} kcal\n", b.daily_min_calorie));
                out.push_str(&format!("Eaten:        {:.0} kcal\n", b.consumed_today));
                match status {
                    BudgetStatus::Left(kcal) => out.push_str(&format!("Left:         {:.0} kcal\n", kcal)),
                    BudgetStatus::Over(kcal) => out.push_str(&format!("Over:         {:.0} kcal\n", kcal)),
                }
            }
            _ => {
                let reason = self.budget_error.as_deref().unwrap_or("unavailable");
                out.push_str(&format!("Daily budget: {}\n", reason));
            }
        }

        out.push('\n');
        for meal in &self.totals.meals {
            let m = &meal.totals.macros;
            out.push_str(&format!(
                "{:<16} {:>6.0} kcal  C {:>5.1}g  P {:>5.1}g  F {:>5.1}g  ({} items){}\n",
                meal.meal_label,
                meal.totals.calories,
                m.carbs,
                m.protein,
                m.fat,
                meal.totals.entry_count,
                if meal.configured { "" } else { " *" },
            ));
        }
        let d = &self.totals.day;
        out.push_str(&format!(
            "{:<16} {:>6.0} kcal  C {:>5.1}g  P {:>5.1}g  F {:>5.1}g  ({} items)\n",
            "Total", d.calories, d.macros.carbs, d.macros.protein, d.macros.fat, d.entry_count
        ));
        out
    }
}

fn field_warnings(data: &FoodEntryCreate) -> Vec<String> {
    let fields = [
        ("amount", &data.amount),
        ("calories", &data.calories),
        ("carbs", &data.carbs),
        ("protein", &data.protein),
        ("fat", &data.fat),
    ];

    fields
        .iter()
        .filter(|(_, value)| value.as_deref().and_then(parse_quantity).is_none())
        .map(|(name, value)| match value {
            Some(v) => format!("{} '{}' is not a number and will not be counted", name, v),
            None => format!("{} is missing and will not be counted", name),
        })
        .collect()
}

fn require_meal(db: &Database, user_id: &str, meal_label: &str) -> Result<(), String> {
    let record = db
        .get_profile(user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user '{}'; call set_profile first", user_id))?;

    if !record.tracking.accepts(meal_label) {
        return Err(format!(
            "Meal '{}' is not in this user's routine ({})",
            meal_label,
            record.tracking.labels().join(", ")
        ));
    }
    Ok(())
}

fn store_entry(db: &Database, data: FoodEntryCreate) -> Result<LogFoodResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    require_meal(db, &data.user_id, &data.meal_label)?;

    let warnings = field_warnings(&data);
    let entry = db
        .with_conn(|conn| FoodEntry::create(conn, &data))
        .map_err(|e| format!("Failed to log food: {}", e))?;

    Ok(LogFoodResponse {
        entry: entry.into(),
        warnings,
    })
}

/// Log a food with values supplied by the caller
pub fn log_food(db: &Database, input: FoodInput) -> Result<LogFoodResponse, String> {
    let logged_at = parse_logged_at(input.logged_at.as_deref())?;

    let data = FoodEntryCreate {
        user_id: input.user_id,
        meal_label: input.meal_label,
        name: input.name.trim().to_string(),
        amount: input.amount,
        calories: input.calories,
        carbs: input.carbs,
        protein: input.protein,
        fat: input.fat,
        logged_at,
    };
    store_entry(db, data)
}

/// Log `amount_grams` of a food search hit, scaling its serving per gram
pub fn log_searched_food(
    db: &Database,
    user_id: &str,
    meal_label: &str,
    name: &str,
    description: &str,
    amount_grams: &str,
    logged_at: Option<&str>,
) -> Result<LogFoodResponse, String> {
    let logged_at = parse_logged_at(logged_at)?;
    let serving = parse_description(description).map_err(|e| e.to_string())?;
    let data = serving
        .to_entry(user_id, meal_label, name.trim(), amount_grams, logged_at)
        .map_err(|e| e.to_string())?;

    store_entry(db, data)
}

fn filter_for(date: Option<&str>, meal_label: Option<&str>) -> Result<FoodFilter, String> {
    let mut filter = FoodFilter::all();
    if let Some(d) = date.filter(|d| !d.trim().is_empty()) {
        filter = filter.with_date(parse_date(Some(d))?);
    }
    if let Some(m) = meal_label.filter(|m| !m.is_empty()) {
        filter = filter.with_meal(m);
    }
    Ok(filter)
}

pub fn list_food_entries<L>(
    store: &L,
    user_id: &str,
    date: Option<&str>,
    meal_label: Option<&str>,
) -> Result<ListFoodEntriesResponse, String>
where
    L: FoodLogProvider + ?Sized,
{
    let filter = filter_for(date, meal_label)?;
    let entries = store
        .get_food_entries(user_id, &filter)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;

    let total = entries.len();
    Ok(ListFoodEntriesResponse {
        entries: entries.into_iter().map(FoodEntryView::from).collect(),
        total,
    })
}

pub fn delete_food_entry(db: &Database, user_id: &str, id: &str) -> Result<DeleteFoodEntryResponse, String> {
    let deleted = db
        .with_conn(|conn| FoodEntry::delete(conn, user_id, id))
        .map_err(|e| format!("Failed to delete food entry: {}", e))?;

    if !deleted {
        return Err(format!("Food entry {} not found for user '{}'", id, user_id));
    }

    tracing::info!(user_id, id, "Food entry deleted");
    Ok(DeleteFoodEntryResponse {
        success: true,
        id: id.to_string(),
    })
}

/// Totals for a date and/or meal; both absent means the whole log
pub fn get_totals<L>(
    store: &L,
    user_id: &str,
    date: Option<&str>,
    meal_label: Option<&str>,
) -> Result<TotalsResponse, String>
where
    L: FoodLogProvider + ?Sized,
{
    let filter = filter_for(date, meal_label)?;
    let entries = store
        .get_food_entries(user_id, &filter)
        .map_err(|e| format!("Failed to get food entries: {}", e))?;

    Ok(TotalsResponse {
        user_id: user_id.to_string(),
        date: filter.date,
        meal_label: filter.meal_label.clone(),
        totals: crate::nutrition::totals(&entries, &filter),
    })
}

/// Budget and per-meal totals for one day (today when `date` is absent)
pub fn get_daily_report<S>(store: &S, user_id: &str, date: Option<&str>) -> Result<DailyReport, String>
where
    S: ProfileProvider + FoodLogProvider + ?Sized,
{
    let date = parse_date(date)?;
    let record = store
        .get_profile(user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user '{}'", user_id))?;

    let entries = store
        .get_food_entries(user_id, &FoodFilter::on(date))
        .map_err(|e| format!("Failed to get food entries: {}", e))?;

    Ok(DailyReport::build(&record, &entries, date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Profile, ProfileUpsert, Sex, TrackingMode};

    fn database() -> Database {
        let db = Database::open_in_memory().unwrap();
        let tracking = TrackingMode::meal_based(&["Breakfast", "Lunch", "Dinner"]).unwrap();
        db.with_conn(|conn| {
            run_migrations(conn)?;
            ProfileRecord::upsert(
                conn,
                &ProfileUpsert {
                    user_id: "u1".to_string(),
                    name: None,
                    profile: Profile {
                        sex: Sex::Female,
                        age_years: 25,
                        height_cm: 165,
                        current_weight_kg: 70.0,
                        goal_weight_kg: 60.0,
                        target_weeks: 10,
                    },
                    tracking: tracking.clone(),
                },
            )?;
            Ok(())
        })
        .unwrap();
        db
    }

    fn food(meal: &str, calories: &str, carbs: &str, logged_at: &str) -> FoodInput {
        FoodInput {
            user_id: "u1".to_string(),
            meal_label: meal.to_string(),
            name: "Food".to_string(),
            amount: Some("100".to_string()),
            calories: Some(calories.to_string()),
            carbs: Some(carbs.to_string()),
            protein: Some("10".to_string()),
            fat: Some("5".to_string()),
            logged_at: Some(logged_at.to_string()),
        }
    }

    #[test]
    fn test_log_food_checks_meal_and_profile() {
        let db = database();

        let resp = log_food(&db, food("Breakfast", "300", "40", "2024-05-01T08:00:00")).unwrap();
        assert!(resp.warnings.is_empty());
        assert_eq!(resp.entry.amount_grams, Some(100.0));
        assert_eq!(resp.entry.calories_kcal, Some(300.0));

        let err = log_food(&db, food("Brunch", "300", "40", "2024-05-01T10:00:00")).unwrap_err();
        assert!(err.contains("Brunch"));

        let mut stranger = food("Breakfast", "300", "40", "2024-05-01T08:00:00");
        stranger.user_id = "u2".to_string();
        assert!(log_food(&db, stranger).unwrap_err().contains("set_profile"));
    }

    #[test]
    fn test_log_food_warns_on_bad_fields() {
        let db = database();
        let resp = log_food(&db, food("Lunch", "250", "lots", "2024-05-01T12:00:00")).unwrap();
        assert_eq!(resp.warnings.len(), 1);
        assert!(resp.warnings[0].starts_with("carbs"));
        assert_eq!(resp.entry.macros, None);
    }

    #[test]
    fn test_log_searched_food() {
        let db = database();
        let resp = log_searched_food(
            &db,
            "u1",
            "Dinner",
            "Chicken Breast",
            "Per 100g - Calories: 165kcal | Fat: 3.57g | Carbs: 0.00g | Protein: 31.02g",
            "200",
            Some("2024-05-01T19:00:00"),
        )
        .unwrap();
        assert_eq!(resp.entry.entry.calories.as_deref(), Some("330"));

        let err = log_searched_food(
            &db,
            "u1",
            "Dinner",
            "Banana",
            "Per 1 medium - Calories: 105kcal | Fat: 0.39g | Carbs: 26.95g | Protein: 1.29g",
            "120",
            None,
        )
        .unwrap_err();
        assert!(err.contains("not a weight"));
    }

    #[test]
    fn test_totals_and_list_filters() {
        let db = database();
        log_food(&db, food("Dinner", "500", "50", "2024-05-01T23:59:00")).unwrap();
        log_food(&db, food("Breakfast", "300", "40", "2024-05-02T00:01:00")).unwrap();
        log_food(&db, food("Lunch", "250", "bad", "2024-05-02T12:00:00")).unwrap();

        let day1 = get_totals(&db, "u1", Some("2024-05-01"), None).unwrap();
        assert_eq!(day1.totals.entry_count, 1);
        assert!((day1.totals.calories - 500.0).abs() < 1e-9);

        let day2 = get_totals(&db, "u1", Some("2024-05-02"), None).unwrap();
        assert!((day2.totals.calories - 550.0).abs() < 1e-9);
        assert!((day2.totals.macros.carbs - 40.0).abs() < 1e-9);

        let breakfasts = list_food_entries(&db, "u1", None, Some("Breakfast")).unwrap();
        assert_eq!(breakfasts.total, 1);

        let all = get_totals(&db, "u1", None, None).unwrap();
        assert_eq!(all.totals.entry_count, 3);

        assert!(get_totals(&db, "u1", Some("May 1st"), None).is_err());
    }

    #[test]
    fn test_delete_food_entry() {
        let db = database();
        let logged = log_food(&db, food("Lunch", "250", "30", "2024-05-01T12:00:00")).unwrap();
        let id = logged.entry.entry.id.clone();

        assert!(delete_food_entry(&db, "u2", &id).is_err());
        assert!(delete_food_entry(&db, "u1", &id).unwrap().success);
        assert!(delete_food_entry(&db, "u1", &id).is_err());
    }

    #[test]
    fn test_daily_report() {
        let db = database();
        log_food(&db, food("Breakfast", "400", "50", "2024-05-01T08:00:00")).unwrap();
        log_food(&db, food("Dinner", "600", "70", "2024-05-01T19:00:00")).unwrap();

        let report = get_daily_report(&db, "u1", Some("2024-05-01")).unwrap();
        assert_eq!(report.goal, Some("Lose Weight"));

        let budget = report.budget.unwrap();
        assert!((budget.consumed_today - 1000.0).abs() < 1e-9);
        assert!((budget.daily_calorie - (887.21875 - 1000.0)).abs() < 0.001);
        assert!(matches!(report.status, Some(BudgetStatus::Over(_))));
        assert_eq!(report.progress, Some(1.0));

        let lunch = report.totals.meal("Lunch").unwrap();
        assert_eq!(lunch.totals.entry_count, 0);

        let text = report.to_text();
        assert!(text.contains("Over:"));
        assert!(text.contains("Breakfast"));

        assert!(get_daily_report(&db, "nobody", None).is_err());
    }
}
