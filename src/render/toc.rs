use once_cell::sync::Lazy;
use pulldown_cmark::Event;
use regex::Regex;

use super::escape_html;
use super::slug::{depth, Heading};

static LABEL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*\.\s+").unwrap());

/// Inserts a table of contents after the first heading whose text (section label aside)
/// is `title`. It lists every later heading of depth `max_depth` or shallower.
pub fn insert_toc<'a>(
    mut events: Vec<Event<'a>>,
    headings: &[Heading],
    title: &str,
    max_depth: u8,
) -> Vec<Event<'a>> {
    let title = title.trim();
    if title.is_empty() {
        return events;
    }

    let Some(position) = headings
        .iter()
        .position(|heading| LABEL_REGEX.replace(heading.text.trim(), "") == title)
    else {
        return events;
    };

    let entries: Vec<&Heading> = headings[position + 1..]
        .iter()
        .filter(|heading| depth(heading.level) <= max_depth)
        .collect();

    if entries.is_empty() {
        return events;
    }

    let insert_at = headings[position].end + 1;
    events.insert(insert_at, Event::Html(build_list(&entries).into()));
    events
}

/// Builds a tight, nested `<ul>` of links. Each entry nests under the closest preceding
/// entry of a shallower depth.
fn build_list(entries: &[&Heading]) -> String {
    let mut html = String::new();
    // Depths of the currently open lists, outermost first. The last item's `<li>` stays open.
    let mut open: Vec<u8> = Vec::new();

    for heading in entries {
        let d = depth(heading.level);

        match open.last().copied() {
            None => {
                html.push_str("<ul>");
                open.push(d);
            }
            Some(top) if d > top => {
                html.push_str("<ul>");
                open.push(d);
            }
            Some(_) => {
                html.push_str("</li>");
                while open.len() > 1 && d < open[open.len() - 1] {
                    open.pop();
                    html.push_str("</ul>");

                    if d > open[open.len() - 1] {
                        html.push_str("<ul>");
                        open.push(d);
                        break;
                    }
                    html.push_str("</li>");
                }
            }
        }

        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&heading.id),
            escape_html(heading.text.trim())
        ));
    }

    html.push_str("</li>");
    for _ in 1..open.len() {
        html.push_str("</ul></li>");
    }
    html.push_str("</ul>\n");
    html
}
