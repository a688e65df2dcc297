//! Runtime configuration
//!
//! Everything is read from the environment; there is no config file.

use std::path::PathBuf;

/// Default FatSecret host when going through RapidAPI
pub const DEFAULT_FATSECRET_HOST: &str = "fatsecret4.p.rapidapi.com";

/// Default tracing directive for this crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "weightmgr=info";

/// Credentials for the food search API
#[derive(Debug, Clone)]
pub struct FatSecretCredentials {
    pub host: String,
    pub api_key: String,
    pub bearer_token: String,
}

/// Process settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub log_directive: String,
    pub fatsecret: Option<FatSecretCredentials>,
}

impl Settings {
    /// Load settings from `WM_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("WM_DATABASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let log_directive = lookup("WM_LOG")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string());

        let fatsecret = match (lookup("WM_FATSECRET_API_KEY"), lookup("WM_FATSECRET_TOKEN")) {
            (Some(api_key), Some(bearer_token)) if !api_key.is_empty() && !bearer_token.is_empty() => {
                Some(FatSecretCredentials {
                    host: lookup("WM_FATSECRET_HOST")
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| DEFAULT_FATSECRET_HOST.to_string()),
                    api_key,
                    bearer_token,
                })
            }
            _ => None,
        };

        Self {
            database_path,
            log_directive,
            fatsecret,
        }
    }
}

/// `<project>/data/weightmgr.db`, where the project root is found by
/// walking up out of `target/{debug,release}` when run via cargo
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("weightmgr.db");
    path
}
