//! Preview command: assemble the self-contained preview document.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::preview::build_document;

use super::App;

/// Execute the preview command.
///
/// # Errors
///
/// IO errors writing the output file.
pub fn execute(out: Option<&Path>, home: Option<&Path>, quiet: bool) -> Result<()> {
    let app = App::load(home)?;
    let document = build_document(app.workspace.files());

    match out {
        Some(path) => {
            fs::write(path, &document)?;
            if !quiet {
                println!("Preview written to {}", path.display());
            }
        }
        None => println!("{document}"),
    }
    Ok(())
}
