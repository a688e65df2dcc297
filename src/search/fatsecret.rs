use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::FatSecretCredentials;
use crate::nutrition::serving::{parse_description, ServingError, ServingNutrition};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Food search is not configured (set WM_FATSECRET_API_KEY and WM_FATSECRET_TOKEN)")]
    NotConfigured,

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("FatSecret request failed: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// One food from `foods.search`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodSearchHit {
    pub food_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub description: String,
    pub url: Option<String>,
}

impl FoodSearchHit {
    /// Nutrition parsed from the description line
    pub fn serving(&self) -> Result<ServingNutrition, ServingError> {
        parse_description(&self.description)
    }
}

/// A recipe from `recipe.get.v2`. Numbers stay as the API's strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub recipe_id: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub grams_per_portion: Option<String>,
    pub calories: Option<String>,
    pub carbs: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
}

#[derive(Clone)]
pub struct FatSecretClient {
    http: Client,
    credentials: FatSecretCredentials,
}

impl FatSecretClient {
    pub fn new(credentials: FatSecretCredentials) -> Result<Self, SearchError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, credentials })
    }

    fn base_url(&self) -> String {
        format!("https://{}/rest/server.api", self.credentials.host)
    }

    async fn call(&self, query: &[(&str, &str)]) -> Result<Value, SearchError> {
        let resp = self
            .http
            .get(self.base_url())
            .query(query)
            .query(&[("format", "json")])
            .header("X-RapidAPI-Key", &self.credentials.api_key)
            .header("X-RapidAPI-Host", &self.credentials.host)
            .bearer_auth(&self.credentials.bearer_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        Ok(resp.json().await?)
    }

    /// `foods.search`, first page
    pub async fn search_foods(&self, query: &str) -> Result<Vec<FoodSearchHit>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        tracing::debug!(query, "Searching foods");
        let data = self
            .call(&[
                ("method", "foods.search"),
                ("search_expression", query),
                ("page_number", "0"),
            ])
            .await?;

        let hits = parse_search_results(&data)?;
        tracing::info!(query, hits = hits.len(), "Food search complete");
        Ok(hits)
    }

    /// `recipe.get.v2`
    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Recipe, SearchError> {
        let data = self
            .call(&[("method", "recipe.get.v2"), ("recipe_id", recipe_id)])
            .await?;
        parse_recipe(&data)
    }
}

/// Parse a `foods.search` body. `foods.food` is an array, a single object
/// when there is exactly one hit, or absent when there are none.
pub fn parse_search_results(data: &Value) -> Result<Vec<FoodSearchHit>, SearchError> {
    if let Some(err) = api_error(data) {
        return Err(err);
    }

    let foods = data
        .get("foods")
        .ok_or_else(|| SearchError::Shape("missing 'foods'".to_string()))?;

    let items: Vec<&Value> = match foods.get("food") {
        Some(Value::Array(arr)) => arr.iter().collect(),
        Some(obj @ Value::Object(_)) => vec![obj],
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(SearchError::Shape(format!("'foods.food' is {}", other)));
        }
    };

    Ok(items.into_iter().filter_map(parse_food).collect())
}

fn parse_food(food: &Value) -> Option<FoodSearchHit> {
    let hit = FoodSearchHit {
        food_id: text(food, "food_id")?,
        name: text(food, "food_name")?,
        brand: text(food, "brand_name"),
        description: text(food, "food_description")?,
        url: text(food, "food_url"),
    };
    Some(hit)
}

/// Parse a `recipe.get.v2` body
pub fn parse_recipe(data: &Value) -> Result<Recipe, SearchError> {
    if let Some(err) = api_error(data) {
        return Err(err);
    }

    let recipe = data
        .get("recipe")
        .ok_or_else(|| SearchError::Shape("missing 'recipe'".to_string()))?;

    // serving_sizes.serving may also come back as a one-element array
    let serving = recipe
        .get("serving_sizes")
        .and_then(|s| s.get("serving"))
        .and_then(|s| match s {
            Value::Array(arr) => arr.first(),
            other => Some(other),
        });
    let serving_text = |key: &str| serving.and_then(|s| text(s, key));

    Ok(Recipe {
        recipe_id: text(recipe, "recipe_id").unwrap_or_default(),
        name: text(recipe, "recipe_name")
            .ok_or_else(|| SearchError::Shape("recipe has no name".to_string()))?,
        description: text(recipe, "recipe_description"),
        url: text(recipe, "recipe_url"),
        grams_per_portion: text(recipe, "grams_per_portion"),
        calories: serving_text("calories"),
        carbs: serving_text("carbohydrate"),
        protein: serving_text("protein"),
        fat: serving_text("fat"),
    })
}

/// FatSecret reports failures as `{"error": {"code": .., "message": ..}}`
/// with a 200 status.
fn api_error(data: &Value) -> Option<SearchError> {
    let err = data.get("error")?;
    let message = err
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("unknown error");
    Some(SearchError::Shape(format!("API error: {}", message)))
}

/// String field, accepting numbers as well since ids sometimes arrive unquoted
fn text(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
