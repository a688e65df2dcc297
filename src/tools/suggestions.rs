//! Recipe suggestion MCP Tool

use serde::Serialize;

use super::search::require_client;
use crate::db::Database;
use crate::models::Profile;
use crate::nutrition::SuggestionCheck;
use crate::providers::ProfileProvider;
use crate::search::{FatSecretClient, Recipe};

/// Response for check_suggestions
#[derive(Debug, Serialize)]
pub struct CheckSuggestionsResponse {
    pub user_id: String,
    pub recipes: Vec<Recipe>,
    /// Ids that could not be fetched, with the reason
    pub skipped: Vec<SkippedRecipe>,
    #[serde(flatten)]
    pub check: SuggestionCheck,
}

#[derive(Debug, Serialize)]
pub struct SkippedRecipe {
    pub recipe_id: String,
    pub reason: String,
}

/// Fetch the given recipes and compare their calories with the user's budget
pub async fn check_suggestions(
    db: &Database,
    client: Option<&FatSecretClient>,
    user_id: &str,
    recipe_ids: &[String],
) -> Result<CheckSuggestionsResponse, String> {
    let record = db
        .get_profile(user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user '{}'", user_id))?;

    let mut recipes = Vec::with_capacity(recipe_ids.len());
    let mut skipped = Vec::new();

    if !recipe_ids.is_empty() {
        let client = require_client(client)?;
        for id in recipe_ids {
            match client.get_recipe(id).await {
                Ok(recipe) => recipes.push(recipe),
                Err(e) => {
                    tracing::warn!(recipe_id = %id, error = %e, "Skipping recipe");
                    skipped.push(SkippedRecipe {
                        recipe_id: id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    Ok(summarize(user_id, &record.profile, recipes, skipped))
}

fn summarize(
    user_id: &str,
    profile: &Profile,
    recipes: Vec<Recipe>,
    skipped: Vec<SkippedRecipe>,
) -> CheckSuggestionsResponse {
    let check = SuggestionCheck::evaluate(profile, &recipes);
    CheckSuggestionsResponse {
        user_id: user_id.to_string(),
        recipes,
        skipped,
        check,
    }
}
