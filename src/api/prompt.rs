//! Request assembly for the chat endpoint.
//!
//! The system instruction teaches the model the file-block protocol: every
//! created or updated file arrives as `<file name="path">...</file>` with the
//! project name as the leading path segment, full content, no markdown
//! fencing, and no ES modules (all scripts share one global scope in the
//! preview).

use crate::model::ChatMessage;
use crate::workspace::FileSet;

/// Build the system instruction for a chat turn.
#[must_use]
pub fn system_instruction(project_name: &str) -> String {
    format!(
        "You are an expert AI coding assistant building complete web applications.\n\
         \n\
         How to write files:\n\
         To create or update a file, write its content inside an XML block:\n\
         <file name=\"{project_name}/folder/filename.ext\">\n\
         ... full content of the file ...\n\
         </file>\n\
         \n\
         Rules:\n\
         1. Always use \"{project_name}\" as the first path segment of every file.\n\
         2. Nested folders are allowed in any depth, organized by functionality.\n\
         3. To overwrite an existing file, use its exact same path.\n\
         4. Always write the complete file content. Never elide with comments \
            like \"// rest of code\".\n\
         5. Do not wrap <file> blocks in markdown code fences.\n\
         6. No ES modules: never use import/export statements. All JavaScript \
            files are concatenated into one shared global scope. Define shared \
            functions and classes globally (window.* when needed).\n\
         7. Load order matters: utility and helper files run before the files \
            that depend on them, and the main application file runs last.\n\
         8. Break logic into small single-purpose files instead of one large one."
    )
}

/// Render the current file collection as inline context for the request.
#[must_use]
pub fn file_context(files: &FileSet) -> String {
    files
        .files()
        .map(|f| {
            format!(
                "File: {}\n```{}\n{}\n```",
                f.name,
                f.language.as_str(),
                f.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The text body of the user message: file context plus the request.
#[must_use]
pub fn user_text(files: &FileSet, prompt: &str) -> String {
    format!(
        "Current File System:\n{}\n\nUser Request: \"{prompt}\"",
        file_context(files)
    )
}

/// Wire role string for a transcript message.
#[must_use]
pub fn wire_role(message: &ChatMessage) -> &'static str {
    match message.role {
        crate::model::Role::User => "user",
        crate::model::Role::Model => "assistant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_names_the_project() {
        let prompt = system_instruction("SpaceGame");
        assert!(prompt.contains("name=\"SpaceGame/"));
        assert!(prompt.contains("No ES modules"));
    }

    #[test]
    fn test_file_context_skips_folders() {
        let mut files = FileSet::new();
        files.upsert_declared("app/src/a.js", "var a;", 1).unwrap();
        let ctx = file_context(&files);
        assert!(ctx.contains("File: a.js"));
        assert!(ctx.contains("var a;"));
        assert!(!ctx.contains("File: src"));
    }

    #[test]
    fn test_user_text_embeds_prompt() {
        let files = FileSet::new();
        let text = user_text(&files, "build a game");
        assert!(text.contains("User Request: \"build a game\""));
    }
}
