//! Food and recipe search
//!
//! Thin async client over the FatSecret REST API (reached through RapidAPI).

mod fatsecret;

pub use fatsecret::{
    parse_recipe, parse_search_results, FatSecretClient, FoodSearchHit, Recipe, SearchError,
};
