//! Weight Manager Library
//!
//! Calorie budget and nutrition aggregation, with the stores, food search
//! and MCP tools built around them.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod providers;
pub mod search;
pub mod tools;
