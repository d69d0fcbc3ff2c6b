use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static COLOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{color\(([^:]+)\)::([^}]+)\}\}").unwrap());

/// Expands `{{color(COLOR)::TEXT}}` into `<font color="COLOR">TEXT</font>`.
/// Neither capture is escaped.
pub fn colorize(source: &str) -> Cow<'_, str> {
    COLOR_REGEX.replace_all(source, r#"<font color="${1}">${2}</font>"#)
}
