//! Configuration management.
//!
//! Resolves the Code Studio home directory (where the three durable records
//! live) and the effective API settings, with environment overrides.
//!
//! Resolution priority for the home directory:
//! 1. Explicit `--home` flag
//! 2. `STUDIO_TEST_HOME` (test isolation, keeps real data safe)
//! 3. `STUDIO_HOME`
//! 4. `~/.codestudio`

use std::path::{Path, PathBuf};

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Resolve the home directory for durable records.
///
/// Returns `None` only when no home directory can be determined at all.
#[must_use]
pub fn resolve_home(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("STUDIO_TEST_HOME") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    if let Ok(path) = std::env::var("STUDIO_HOME") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    directories::BaseDirs::new().map(|b| b.home_dir().join(".codestudio"))
}

/// Non-empty environment variable, if set.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Effective API key: `STUDIO_API_KEY` overrides the stored setting.
#[must_use]
pub fn effective_api_key(stored: Option<&str>) -> Option<String> {
    env_var("STUDIO_API_KEY").or_else(|| stored.map(ToString::to_string))
}

/// Effective API base URL: env override, then stored, then the default.
#[must_use]
pub fn effective_api_url(stored: Option<&str>) -> String {
    env_var("STUDIO_API_URL")
        .or_else(|| stored.map(ToString::to_string))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Effective model name: env override, then stored, then the default.
#[must_use]
pub fn effective_model(stored: Option<&str>) -> String {
    env_var("STUDIO_MODEL")
        .or_else(|| stored.map(ToString::to_string))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}
