//! Version command implementation.

use std::path::Path;

use crate::config::resolve_home;
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    /// Where the durable records live; `None` if no home resolves.
    data_dir: Option<String>,
}

fn build_output(home: Option<&Path>) -> VersionOutput<'static> {
    VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
        data_dir: resolve_home(home).map(|p| p.display().to_string()),
    }
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(home: Option<&Path>, json: bool) -> Result<()> {
    let output = build_output(home);

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("studio version {} ({})", output.version, output.build);
    if let Some(dir) = &output.data_dir {
        println!("data dir: {dir}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_carries_resolved_home() {
        let tmp = tempfile::tempdir().unwrap();
        let output = build_output(Some(tmp.path()));
        assert_eq!(output.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            output.data_dir.as_deref(),
            Some(tmp.path().display().to_string().as_str())
        );
    }
}
