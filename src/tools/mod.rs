//! Weight Manager tools module
//!
//! Tool implementations behind the MCP server. Each returns a serializable
//! response or a user-facing error string.

pub mod diary;
pub mod goals;
pub mod profile;
pub mod search;
pub mod status;
pub mod suggestions;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rmcp::schemars;
use serde::Deserialize;

use crate::models::LOGGED_AT_FORMAT;
use crate::nutrition::units::parse_decimal_input;

/// A number sent either as JSON number or as text ("70.5", "70,5")
#[derive(Debug, Clone, PartialEq, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum DecimalInput {
    Number(f64),
    Text(String),
}

impl DecimalInput {
    pub fn value(&self) -> Option<f64> {
        match self {
            DecimalInput::Number(n) if n.is_finite() => Some(*n),
            DecimalInput::Number(_) => None,
            DecimalInput::Text(s) => parse_decimal_input(s),
        }
    }

    /// Text as it will be stored. Stored numbers never carry a comma, so
    /// "70,5" is written as "70.5". Text that is not a number is kept as is.
    pub fn into_text(self) -> String {
        match self.value() {
            Some(n) => n.to_string(),
            None => match self {
                DecimalInput::Number(n) => n.to_string(),
                DecimalInput::Text(s) => s,
            },
        }
    }

    /// Value or an error naming the field
    pub fn require(&self, field: &str) -> Result<f64, String> {
        self.value()
            .ok_or_else(|| format!("{} must be a number, got {}", field, self))
    }
}

impl std::fmt::Display for DecimalInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecimalInput::Number(n) => write!(f, "{}", n),
            DecimalInput::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// `YYYY-MM-DD`, or today (local) when absent
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", d)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Local timestamp for a new entry. Accepts full timestamps with or without
/// seconds, or a bare date (noon). Now when absent.
pub fn parse_logged_at(logged_at: Option<&str>) -> Result<NaiveDateTime, String> {
    let Some(raw) = logged_at.map(str::trim).filter(|s| !s.is_empty()) else {
        let now = Local::now().naive_local();
        return Ok(now.with_nanosecond(0).unwrap_or(now));
    };

    for format in [LOGGED_AT_FORMAT, "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
        return Ok(date.and_time(noon));
    }

    Err(format!(
        "Invalid logged_at '{}', expected YYYY-MM-DDTHH:MM:SS",
        raw
    ))
}
