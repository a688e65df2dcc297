//! Weight Manager MCP Server Implementation
//!
//! Exposes profile, goal, diary, search and suggestion tools over MCP.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::search::FatSecretClient;
use crate::tools::diary::{self, FoodInput};
use crate::tools::profile::{self, ProfileInput};
use crate::tools::status::{StatusTracker, DIARY_INSTRUCTIONS};
use crate::tools::{goals, search, suggestions, DecimalInput};

/// Weight Manager MCP Service
#[derive(Clone)]
pub struct WeightManagerService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    fatsecret: Option<FatSecretClient>,
    tool_router: ToolRouter<WeightManagerService>,
}

impl WeightManagerService {
    pub fn new(database_path: PathBuf, database: Database, fatsecret: Option<FatSecretClient>) -> Self {
        let tracker = StatusTracker::new(database_path, fatsecret.is_some());
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            database,
            fatsecret,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub user_id: String,
    pub name: Option<String>,
    /// "male" or "female"
    pub sex: String,
    pub age_years: u32,
    pub height_cm: u32,
    /// kg; number or text, comma accepted as decimal separator
    pub current_weight_kg: DecimalInput,
    /// kg; number or text, comma accepted as decimal separator
    pub goal_weight_kg: DecimalInput,
    pub target_weeks: u32,
    /// Meal-based tracking: Breakfast, Morning Snack, Lunch, Afternoon Snack,
    /// Dinner, Evening Snack (at least two of Breakfast/Lunch/Dinner)
    pub meals: Option<Vec<String>>,
    /// Label for meal-free tracking (default "Meal-Free")
    pub meal_free_label: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanGoalParams {
    /// Load current weight from this user's profile, and the target for `apply`
    pub user_id: Option<String>,
    pub current_weight_kg: Option<f64>,
    pub goal_weight_kg: f64,
    /// kg/week; lose 0.2-1.0, gain 0.2-0.6, default 0.4
    pub rate_kg_per_week: Option<f64>,
    /// Save goal weight and target weeks to the profile
    #[serde(default)]
    pub apply: bool,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    pub user_id: String,
    pub meal_label: String,
    pub name: String,
    /// grams
    pub amount: Option<DecimalInput>,
    /// kcal
    pub calories: Option<DecimalInput>,
    pub carbs: Option<DecimalInput>,
    pub protein: Option<DecimalInput>,
    pub fat: Option<DecimalInput>,
    /// Local time YYYY-MM-DDTHH:MM:SS; now when omitted
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogSearchedFoodParams {
    pub user_id: String,
    pub meal_label: String,
    pub name: String,
    /// The `description` of a search_foods hit
    pub description: String,
    pub amount_grams: DecimalInput,
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodQueryParams {
    pub user_id: String,
    /// YYYY-MM-DD
    pub date: Option<String>,
    pub meal_label: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodEntryParams {
    pub user_id: String,
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyReportParams {
    pub user_id: String,
    /// YYYY-MM-DD; today when omitted
    pub date: Option<String>,
}

// ============================================================================
// Search Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize { 20 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    pub recipe_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckSuggestionsParams {
    pub user_id: String,
    #[serde(default)]
    pub recipe_ids: Vec<String>,
}

#[tool_router]
impl WeightManagerService {
    // --- Status ---

    #[tool(description = "Get the current status of the Weight Manager service including build info, database path and whether food search is configured")]
    async fn wm_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for setting up a profile and keeping the food diary. Call this when starting a session or when unsure how to use the tools.")]
    fn diary_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(DIARY_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Create or replace a user's profile (sex, age, height, weight, goal weight, target weeks, tracking routine). Returns the resulting daily calorie budget.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let input = ProfileInput {
            user_id: p.user_id, name: p.name, sex: p.sex,
            age_years: p.age_years, height_cm: p.height_cm,
            current_weight_kg: p.current_weight_kg, goal_weight_kg: p.goal_weight_kg,
            target_weeks: p.target_weeks, meals: p.meals, meal_free_label: p.meal_free_label,
        };
        let result = profile::set_profile(&self.database, input).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a user's profile, goal direction, meal labels and daily calorie budget")]
    fn get_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &p.user_id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => json_result(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Profile not found", "user_id": "{}"}}"#,
                p.user_id
            ))])),
        }
    }

    #[tool(description = "Compute target weeks from a goal weight and weekly pace. With apply=true the goal is saved to the user's profile.")]
    fn plan_goal(&self, Parameters(p): Parameters<PlanGoalParams>) -> Result<CallToolResult, McpError> {
        let result = goals::plan_goal(
            &self.database, p.user_id.as_deref(), p.current_weight_kg,
            p.goal_weight_kg, p.rate_kg_per_week, p.apply,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Diary ---

    #[tool(description = "Log a food with caller-supplied calories and macros under one of the user's meal labels")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let input = FoodInput {
            user_id: p.user_id, meal_label: p.meal_label, name: p.name,
            amount: p.amount.map(DecimalInput::into_text),
            calories: p.calories.map(DecimalInput::into_text),
            carbs: p.carbs.map(DecimalInput::into_text),
            protein: p.protein.map(DecimalInput::into_text),
            fat: p.fat.map(DecimalInput::into_text),
            logged_at: p.logged_at,
        };
        let result = diary::log_food(&self.database, input).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log grams of a food from search_foods; nutrition is scaled per gram from the hit's description")]
    fn log_searched_food(&self, Parameters(p): Parameters<LogSearchedFoodParams>) -> Result<CallToolResult, McpError> {
        let amount = p.amount_grams.into_text();
        let result = diary::log_searched_food(
            &self.database, &p.user_id, &p.meal_label, &p.name,
            &p.description, &amount, p.logged_at.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List a user's food entries, optionally for one date and/or meal label")]
    fn list_food_entries(&self, Parameters(p): Parameters<FoodQueryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::list_food_entries(&self.database, &p.user_id, p.date.as_deref(), p.meal_label.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete one of the user's food entries by id")]
    fn delete_food_entry(&self, Parameters(p): Parameters<DeleteFoodEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::delete_food_entry(&self.database, &p.user_id, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calorie and macro totals for a date and/or meal label (whole log when both omitted)")]
    fn get_totals(&self, Parameters(p): Parameters<FoodQueryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_totals(&self.database, &p.user_id, p.date.as_deref(), p.meal_label.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Daily report: calorie budget, calories left or over, and per-meal totals for a date (today by default)")]
    fn get_daily_report(&self, Parameters(p): Parameters<DailyReportParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_daily_report(&self.database, &p.user_id, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Search ---

    #[tool(description = "Search the FatSecret food database. Hits marked scalable can be logged by grams with log_searched_food.")]
    async fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = search::search_foods(self.fatsecret.as_ref(), &p.query, p.limit)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a FatSecret recipe with its per-serving calories and macros")]
    async fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = search::get_recipe(self.fatsecret.as_ref(), &p.recipe_id)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Check whether the given recipes together still fit under the user's daily calorie budget")]
    async fn check_suggestions(&self, Parameters(p): Parameters<CheckSuggestionsParams>) -> Result<CallToolResult, McpError> {
        let result = suggestions::check_suggestions(&self.database, self.fatsecret.as_ref(), &p.user_id, &p.recipe_ids)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for WeightManagerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weightmgr".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Weight Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Weight Manager - calorie budget and food diary. \
                 IMPORTANT: Call diary_instructions first. \
                 Profile: set_profile/get_profile, plan_goal. \
                 Diary: log_food, log_searched_food, list_food_entries, delete_food_entry. \
                 Totals: get_totals, get_daily_report. \
                 Search: search_foods, get_recipe, check_suggestions."
                    .into(),
            ),
        }
    }
}
