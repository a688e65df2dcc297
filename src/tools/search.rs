//! Food search MCP Tools

use serde::Serialize;

use crate::nutrition::ServingNutrition;
use crate::search::{FatSecretClient, FoodSearchHit, Recipe, SearchError};

const MAX_HITS: usize = 50;

/// A search hit with its description already parsed
#[derive(Debug, Serialize)]
pub struct FoodSearchItem {
    #[serde(flatten)]
    pub hit: FoodSearchHit,
    pub serving: Option<ServingNutrition>,
    /// Whether log_searched_food can scale this hit by grams
    pub scalable: bool,
}

impl From<FoodSearchHit> for FoodSearchItem {
    fn from(hit: FoodSearchHit) -> Self {
        let serving = hit.serving().ok();
        let scalable = serving.as_ref().map_or(false, |s| s.per_gram().is_ok());
        Self {
            hit,
            serving,
            scalable,
        }
    }
}

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub items: Vec<FoodSearchItem>,
    pub total: usize,
}

pub(crate) fn require_client(client: Option<&FatSecretClient>) -> Result<&FatSecretClient, String> {
    client.ok_or_else(|| SearchError::NotConfigured.to_string())
}

pub async fn search_foods(
    client: Option<&FatSecretClient>,
    query: &str,
    limit: usize,
) -> Result<SearchFoodsResponse, String> {
    let client = require_client(client)?;
    let hits = client
        .search_foods(query)
        .await
        .map_err(|e| format!("Food search failed: {}", e))?;

    let items: Vec<FoodSearchItem> = hits
        .into_iter()
        .take(limit.clamp(1, MAX_HITS))
        .map(FoodSearchItem::from)
        .collect();
    let total = items.len();

    Ok(SearchFoodsResponse {
        query: query.trim().to_string(),
        items,
        total,
    })
}

pub async fn get_recipe(client: Option<&FatSecretClient>, recipe_id: &str) -> Result<Recipe, String> {
    let client = require_client(client)?;
    client
        .get_recipe(recipe_id)
        .await
        .map_err(|e| format!("Failed to get recipe {}: {}", recipe_id, e))
}
