//! Config commands for the settings record.

use std::path::Path;

use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::config::{effective_api_key, effective_api_url, effective_model, resolve_home};
use crate::error::{Error, Result};
use crate::storage::{Settings, Store};

#[derive(Serialize)]
struct ConfigOutput {
    api_key_set: bool,
    api_url: String,
    model: String,
}

/// Execute a config subcommand.
///
/// # Errors
///
/// `RequiredField` for an empty key, `Config`/storage errors.
pub fn execute(
    command: &ConfigCommands,
    home: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let dir = resolve_home(home)
        .ok_or_else(|| Error::Config("cannot determine a home directory".to_string()))?;
    let store = Store::open(&dir)?;

    match command {
        ConfigCommands::SetKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::RequiredField { field: "API key".to_string() });
            }
            let mut settings = store.load_settings();
            settings.api_key = Some(key.to_string());
            store.save_settings(&settings)?;
            if json {
                println!("{}", serde_json::json!({ "api_key_set": true }));
            } else if !quiet {
                println!("API key stored.");
            }
            Ok(())
        }

        ConfigCommands::Show => {
            let settings = store.load_settings();
            let output = ConfigOutput {
                api_key_set: effective_api_key(settings.api_key.as_deref()).is_some(),
                api_url: effective_api_url(settings.api_url.as_deref()),
                model: effective_model(settings.model.as_deref()),
            };
            if json {
                println!("{}", serde_json::to_string(&output)?);
            } else if !quiet {
                println!("API key: {}", if output.api_key_set { "set" } else { "not set" });
                println!("API URL: {}", output.api_url);
                println!("Model:   {}", output.model);
            }
            Ok(())
        }

        ConfigCommands::Clear => {
            store.save_settings(&Settings::default())?;
            if json {
                println!("{}", serde_json::json!({ "cleared": true }));
            } else if !quiet {
                println!("Settings cleared.");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_clear_key() {
        let tmp = tempfile::tempdir().unwrap();
        execute(
            &ConfigCommands::SetKey { key: "sk-test".to_string() },
            Some(tmp.path()),
            true,
            true,
        )
        .unwrap();
        let store = Store::open(tmp.path()).unwrap();
        assert_eq!(store.load_settings().api_key.as_deref(), Some("sk-test"));

        execute(&ConfigCommands::Clear, Some(tmp.path()), true, true).unwrap();
        assert!(store.load_settings().api_key.is_none());
    }

    #[test]
    fn test_empty_key_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = execute(
            &ConfigCommands::SetKey { key: " ".to_string() },
            Some(tmp.path()),
            true,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, Error::RequiredField { .. }));
    }
}
