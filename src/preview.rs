//! Live preview assembly.
//!
//! Builds one self-contained HTML document from the current file set: the
//! HTML entry point with every CSS file concatenated into its head and every
//! JavaScript file combined into a single shared-scope script before the
//! closing body tag. Callers debounce rebuilds against streaming bursts.

use crate::model::Language;
use crate::workspace::FileSet;

/// Recommended debounce for preview rebuilds during streaming.
pub const PREVIEW_DEBOUNCE_MS: u64 = 800;

/// Assemble the preview document for the given file set.
///
/// Entry-point resolution prefers `index.html`, then any `.html` file, then
/// the first file of any kind; with no file at all a placeholder page is
/// returned rather than an error.
#[must_use]
pub fn build_document(files: &FileSet) -> String {
    let Some(entry) = files
        .get("index.html")
        .filter(|f| f.is_file())
        .or_else(|| files.files().find(|f| f.path.ends_with(".html")))
        .or_else(|| files.first_file())
    else {
        return placeholder();
    };

    let mut content = entry.content.clone();

    // CSS concatenated into the head, one <style> per file.
    let style_tags: String = files
        .files()
        .filter(|f| f.language == Language::Css)
        .map(|f| format!("<style>/* {} */\n{}</style>", f.path, f.content))
        .collect::<Vec<_>>()
        .join("\n");
    if !style_tags.is_empty() {
        if content.contains("</head>") {
            content = content.replace("</head>", &format!("{style_tags}</head>"));
        } else {
            content = format!("{style_tags}{content}");
        }
    }

    // All JS in one script tag so files share a global scope, utilities
    // first and the application entry last.
    let mut js_files: Vec<_> = files
        .files()
        .filter(|f| f.language == Language::Javascript)
        .collect();
    js_files.sort_by(|a, b| (script_rank(&a.path), &a.path).cmp(&(script_rank(&b.path), &b.path)));

    let combined_js: String = js_files
        .iter()
        .filter(|f| !f.content.trim().is_empty())
        .map(|f| format!("\n/* === {} === */\n{}", f.path, f.content.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    if !combined_js.is_empty() {
        let script = format!(
            "<script>\ntry {{\n{combined_js}\n}} catch (e) {{ console.error('JavaScript execution error:', e); }}\n</script>"
        );
        if content.contains("</body>") {
            content = content.replace("</body>", &format!("{script}</body>"));
        } else {
            content.push_str(&script);
        }
    }

    content
}

/// Execution-order rank: helpers load before everything, the application
/// entry loads last, everything else falls back to lexical path order.
fn script_rank(path: &str) -> u8 {
    let lower = path.to_lowercase();
    if lower.contains("util") || lower.contains("helper") || lower.contains("config") {
        0
    } else if lower.contains("main") || lower.contains("app") {
        2
    } else {
        1
    }
}

fn placeholder() -> String {
    "<h1 style=\"font-family:sans-serif; color:#666; text-align:center; margin-top:20%;\">\
     No entry point found</h1>"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(paths: &[(&str, &str)]) -> FileSet {
        let mut fs = FileSet::new();
        for (path, content) in paths {
            fs.upsert_declared(path, content, 1).unwrap();
        }
        fs
    }

    #[test]
    fn test_empty_set_renders_placeholder() {
        let doc = build_document(&FileSet::new());
        assert!(doc.contains("No entry point"));
    }

    #[test]
    fn test_css_injected_into_head() {
        let fs = set_with(&[
            ("app/index.html", "<html><head></head><body></body></html>"),
            ("app/style.css", "body { color: red; }"),
        ]);
        let doc = build_document(&fs);
        let style_at = doc.find("<style>").unwrap();
        let head_close = doc.find("</head>").unwrap();
        assert!(style_at < head_close);
        assert!(doc.contains("color: red"));
    }

    #[test]
    fn test_js_combined_in_one_script_before_body_close() {
        let fs = set_with(&[
            ("app/index.html", "<html><body></body></html>"),
            ("app/a.js", "var a = 1;"),
            ("app/b.js", "var b = 2;"),
        ]);
        let doc = build_document(&fs);
        assert_eq!(doc.matches("<script>").count(), 1);
        let script_at = doc.find("<script>").unwrap();
        let body_close = doc.find("</body>").unwrap();
        assert!(script_at < body_close);
        assert!(doc.contains("var a = 1;"));
        assert!(doc.contains("var b = 2;"));
    }

    #[test]
    fn test_script_order_utils_first_app_last() {
        let fs = set_with(&[
            ("p/index.html", "<html><body></body></html>"),
            ("p/app.js", "APP"),
            ("p/render.js", "RENDER"),
            ("p/utils/format.js", "UTIL"),
        ]);
        let doc = build_document(&fs);
        let util_at = doc.find("UTIL").unwrap();
        let render_at = doc.find("RENDER").unwrap();
        let app_at = doc.find("APP").unwrap();
        assert!(util_at < render_at);
        assert!(render_at < app_at);
    }

    #[test]
    fn test_entry_prefers_root_index() {
        let fs = set_with(&[
            ("p/pages/other.html", "<html><body>other</body></html>"),
            ("p/index.html", "<html><body>root</body></html>"),
        ]);
        let doc = build_document(&fs);
        assert!(doc.contains("root"));
    }

    #[test]
    fn test_any_html_when_no_root_index() {
        let fs = set_with(&[
            ("p/readme.txt", "hi"),
            ("p/pages/one.html", "<html><body>one</body></html>"),
        ]);
        let doc = build_document(&fs);
        assert!(doc.contains("one"));
    }
}
