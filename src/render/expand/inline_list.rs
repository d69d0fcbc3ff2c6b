use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static INLINE_LIST_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{inline\(list\)::\n(.*?)\n\}\}").unwrap());

/// Expands `{{inline(list)::` blocks into a single-line `<ul>` element.
///
/// ```text
/// {{inline(list)::
/// - a
/// - b
/// }}
/// ```
///
/// becomes `<ul><li>a</li><li>b</li></ul>`. Blocks missing their closing `}}` line are left as-is.
pub fn inline_lists(source: &str) -> Cow<'_, str> {
    INLINE_LIST_REGEX.replace_all(source, |caps: &Captures| {
        let items: String = caps[1]
            .split('\n')
            .map(|line| format!("<li>{}</li>", list_item(line)))
            .collect();

        format!("<ul>{items}</ul>")
    })
}

/// Strips surrounding whitespace and one leading bullet (`-`, `*` or `+`).
fn list_item(line: &str) -> &str {
    let line = line.trim();
    match line.strip_prefix(|c: char| matches!(c, '-' | '*' | '+')) {
        Some(item) => item.trim_start(),
        None => line,
    }
}
