use std::fs;
use std::path::Path;

use tracing::info;

use super::{CombinationsDocument, PreviewEntry};
use crate::error::Result;

pub const COMBINATIONS_FILE: &str = "combinations.json";
pub const PREVIEW_FILE: &str = "combinations.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Preview</title>
<style type="text/css">
img.question { border: 4px solid black; }
img.answer { width: 150px; border: 4px solid red; }
img.answer.correct { border: 4px solid green; }
div.answers { float: right; max-width: 350px; }
</style>
</head>
<body>
<h1>Preview</h1>
{questions}
</body>
</html>
"#;

/// Writes the combinations document, the system of record for downstream
/// consumers.
pub fn write_combinations(document: &CombinationsDocument, path: &Path) -> Result<()> {
    info!("Writing export file: {}", path.display());
    let data = serde_json::to_vec_pretty(document)?;
    fs::write(path, data)?;
    Ok(())
}

/// Writes a static HTML page showing every question with its answers,
/// correct answers outlined in green.
pub fn write_preview(entries: &[PreviewEntry], path: &Path) -> Result<()> {
    info!("Writing preview file: {}", path.display());
    fs::write(path, render_preview(entries))?;
    Ok(())
}

fn render_preview(entries: &[PreviewEntry]) -> String {
    let questions: String = entries
        .iter()
        .map(|entry| {
            let answers: String = entry
                .answers
                .iter()
                .map(|answer| {
                    let class = if answer.is_correct { "answer correct" } else { "answer" };
                    format!(
                        "    <img src=\"{}\" class=\"{}\" />\n",
                        escape_attr(&answer.filename),
                        class
                    )
                })
                .collect();
            format!(
                "<div>\n  <img class=\"question\" src=\"{}\" />\n  <div class=\"answers\">\n{}  </div>\n</div>\n<hr>\n",
                escape_attr(&entry.question),
                answers
            )
        })
        .collect();

    PAGE_TEMPLATE.replace("{questions}", &questions)
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
